//! Wiremock-backed stand-in for the newsdesk backend.

use crate::fixtures;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const LOGIN_PATH: &str = "/admin/auth/login";
const REFRESH_PATH: &str = "/admin/auth/refresh";
const LOGOUT_PATH: &str = "/admin/auth/logout";

/// Access token the backend currently honours. `None` rejects every token.
#[derive(Clone, Default)]
struct AcceptedToken(Arc<Mutex<Option<String>>>);

impl AcceptedToken {
    fn set(&self, token: Option<String>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn matches(&self, request: &Request) -> bool {
        let presented = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let accepted = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        matches!((presented, accepted.as_deref()), (Some(p), Some(a)) if p == a)
    }
}

/// Issues a token pair and makes its access token the accepted one.
struct IssueTokens {
    accepted: AcceptedToken,
    access: String,
    refresh: String,
    calls: Option<Arc<AtomicUsize>>,
    delay: Duration,
}

impl Respond for IssueTokens {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if let Some(calls) = &self.calls {
            calls.fetch_add(1, Ordering::SeqCst);
        }
        self.accepted.set(Some(self.access.clone()));
        ResponseTemplate::new(200)
            .set_body_json(fixtures::jwt_response(&self.access, &self.refresh))
            .set_delay(self.delay)
    }
}

/// Rejects refresh calls with a fixed status.
struct RejectRefresh {
    calls: Arc<AtomicUsize>,
    status: u16,
    delay: Duration,
}

impl Respond for RejectRefresh {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(self.status)
            .set_body_json(fixtures::error("Invalid refresh token"))
            .set_delay(self.delay)
    }
}

/// Serves `body` to requests carrying the accepted bearer token, 401
/// otherwise.
struct TokenGate {
    accepted: AcceptedToken,
    body: Value,
}

impl Respond for TokenGate {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if self.accepted.matches(request) {
            ResponseTemplate::new(200).set_body_json(self.body.clone())
        } else {
            ResponseTemplate::new(401).set_body_json(fixtures::error("Unauthorized"))
        }
    }
}

/// Mock newsdesk backend.
///
/// Protected routes mounted with [`mount_protected`](Self::mount_protected)
/// only accept the most recently issued access token (or the one set with
/// [`accept_token`](Self::accept_token)).
pub struct MockBackend {
    server: MockServer,
    accepted: AcceptedToken,
    refresh_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Start a server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            accepted: AcceptedToken::default(),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server, for custom mounts.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Make `token` the only accepted access token.
    pub fn accept_token(&self, token: &str) {
        self.accepted.set(Some(token.to_string()));
    }

    /// Reject every access token until a new one is issued.
    pub fn revoke_tokens(&self) {
        self.accepted.set(None);
    }

    /// Refresh calls received so far, successful or not.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// `login` issues `access`/`refresh` for these credentials and answers
    /// 401 for any others.
    pub async fn mount_login(&self, username: &str, password: &str, access: &str, refresh: &str) {
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_partial_json(
                serde_json::json!({"username": username, "password": password}),
            ))
            .respond_with(IssueTokens {
                accepted: self.accepted.clone(),
                access: access.to_string(),
                refresh: refresh.to_string(),
                calls: None,
                delay: Duration::ZERO,
            })
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(fixtures::error("Bad credentials")))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// `refresh` with `refresh_token` issues `access`/`refresh`.
    pub async fn mount_refresh(&self, refresh_token: &str, access: &str, refresh: &str) {
        self.mount_refresh_with_delay(refresh_token, access, refresh, Duration::ZERO)
            .await;
    }

    /// Like [`mount_refresh`](Self::mount_refresh), answering after `delay`.
    pub async fn mount_refresh_with_delay(
        &self,
        refresh_token: &str,
        access: &str,
        refresh: &str,
        delay: Duration,
    ) {
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .and(query_param("refreshToken", refresh_token))
            .respond_with(IssueTokens {
                accepted: self.accepted.clone(),
                access: access.to_string(),
                refresh: refresh.to_string(),
                calls: Some(Arc::clone(&self.refresh_calls)),
                delay,
            })
            .mount(&self.server)
            .await;
    }

    /// Every `refresh` call answers `status`, after `delay`.
    pub async fn mount_refresh_failure(&self, status: u16, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(REFRESH_PATH))
            .respond_with(RejectRefresh {
                calls: Arc::clone(&self.refresh_calls),
                status,
                delay,
            })
            .mount(&self.server)
            .await;
    }

    /// `logout` answers 204.
    pub async fn mount_logout(&self) {
        Mock::given(method("POST"))
            .and(path(LOGOUT_PATH))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// A route that serves `body` only to the accepted access token.
    pub async fn mount_protected(&self, http_method: &str, route: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(TokenGate {
                accepted: self.accepted.clone(),
                body,
            })
            .mount(&self.server)
            .await;
    }

    /// A route that always serves `body`.
    pub async fn mount_public(&self, http_method: &str, route: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received on `route`, in arrival order.
    pub async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }

    /// Bearer tokens presented on `route`, in arrival order. Requests
    /// without one yield `None`.
    pub async fn bearer_tokens_to(&self, route: &str) -> Vec<Option<String>> {
        self.requests_to(route)
            .await
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(str::to_string)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gate_follows_issued_token() {
        let backend = MockBackend::start().await;
        backend.mount_refresh("R1", "T2", "R2").await;
        backend
            .mount_protected("GET", "/admin/tags", fixtures::page(vec![], 0))
            .await;
        let http = reqwest::Client::new();
        let url = format!("{}/admin/tags", backend.uri());

        let before = http.get(&url).bearer_auth("T2").send().await.unwrap();
        assert_eq!(before.status().as_u16(), 401);

        http.post(format!("{}/admin/auth/refresh?refreshToken=R1", backend.uri()))
            .send()
            .await
            .unwrap();

        let after = http.get(&url).bearer_auth("T2").send().await.unwrap();
        assert_eq!(after.status().as_u16(), 200);
        assert_eq!(backend.refresh_calls(), 1);
        assert_eq!(
            backend.bearer_tokens_to("/admin/tags").await,
            vec![Some("T2".to_string()), Some("T2".to_string())]
        );
    }
}
