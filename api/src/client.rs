//! Authenticated HTTP client.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::refresh::{Join, RefreshCoordinator, RefreshFailure, RefreshOutcome, SettleGuard};
use crate::request::{ApiRequest, RequestBody};
use crate::resources::{
    AssignmentsApi, AuthApi, CampaignsApi, CategoriesApi, CreativesApi, MediaApi, NewsApi,
    PlacementsApi, PublicApi, TagsApi, UsersApi, auth::JwtResponse,
};
use crate::response::{ApiResponse, Envelope};
use newsdesk_auth::SessionHandle;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// Client for the newsdesk backend.
///
/// Attaches the session's bearer token to protected requests. A 401 on a
/// protected request joins the current refresh wave (at most one refresh
/// call is in flight at any time) and the request is then sent once more
/// with the new token. A second rejection is returned as-is.
///
/// Cheap to clone; clones share the session and the refresh state.
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    config: ClientConfig,
    session: Arc<SessionHandle>,
    refresh: Arc<RefreshCoordinator>,
}

impl std::fmt::Debug for AuthenticatedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("base_url", &self.inner.config.base_url)
            .field("session", &self.inner.session)
            .field("refresh", &self.inner.refresh)
            .finish()
    }
}

impl AuthenticatedHttpClient {
    /// Create a client over `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: Arc<SessionHandle>) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                session,
                refresh: Arc::new(RefreshCoordinator::new()),
            }),
        })
    }

    /// Shared session.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionHandle> {
        &self.inner.session
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// `true` while a token refresh is in flight.
    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.inner.refresh.in_flight()
    }

    /// Send `request`, refreshing the session and retrying once on a 401
    /// if the request is protected.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] if a refresh was needed and failed;
    ///   the session has been cleared
    /// - [`ApiError::Http`] for any other non-2xx answer, including a 401
    ///   on the retry or on a public request
    /// - [`ApiError::Network`] if no response was received
    pub async fn request(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let sent_token = if request.is_protected() {
            self.inner.session.access_token()
        } else {
            None
        };

        match self.dispatch(request, sent_token.as_deref()).await {
            Err(e) if e.is_unauthorized() && request.is_protected() => {
                let label = request.label();
                tracing::info!(request = %label, "Access token rejected, joining refresh");
                let token = self.recover_token(sent_token.as_deref(), &label).await?;
                self.dispatch(request, Some(&token)).await
            }
            other => other,
        }
    }

    /// Send `request` and return the envelope's `data` field.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request); also [`ApiError::ResponseParseFailed`].
    pub async fn data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.request(&request).await?.data()
    }

    /// Send `request` and return the full envelope.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request); also [`ApiError::ResponseParseFailed`].
    pub async fn envelope<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<T>> {
        self.request(&request).await?.envelope()
    }

    /// Send `request` and decode the bare body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request); also [`ApiError::ResponseParseFailed`].
    pub async fn body<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.request(&request).await?.body()
    }

    /// Send `request` and ignore any body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn no_content(&self, request: ApiRequest) -> Result<()> {
        self.request(&request).await.map(|_| ())
    }

    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Operator accounts.
    #[must_use]
    pub const fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Articles.
    #[must_use]
    pub const fn news(&self) -> NewsApi<'_> {
        NewsApi::new(self)
    }

    /// Categories.
    #[must_use]
    pub const fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    /// Tags.
    #[must_use]
    pub const fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }

    /// Ad campaigns.
    #[must_use]
    pub const fn campaigns(&self) -> CampaignsApi<'_> {
        CampaignsApi::new(self)
    }

    /// Ad placements.
    #[must_use]
    pub const fn placements(&self) -> PlacementsApi<'_> {
        PlacementsApi::new(self)
    }

    /// Ad creatives.
    #[must_use]
    pub const fn creatives(&self) -> CreativesApi<'_> {
        CreativesApi::new(self)
    }

    /// Creative-to-placement assignments.
    #[must_use]
    pub const fn assignments(&self) -> AssignmentsApi<'_> {
        AssignmentsApi::new(self)
    }

    /// Media uploads.
    #[must_use]
    pub const fn media(&self) -> MediaApi<'_> {
        MediaApi::new(self)
    }

    /// Public (unauthenticated) news and ads.
    #[must_use]
    pub const fn public(&self) -> PublicApi<'_> {
        PublicApi::new(self)
    }

    /// Send `request` once, with `token` as bearer when it is protected.
    pub(crate) async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let url = self.inner.config.url(request.path());
        let mut builder = self
            .inner
            .http
            .request(request.method().into(), url)
            .query(request.query_pairs());

        if request.is_protected() {
            if let Some(token) = token {
                builder = builder.bearer_auth(token);
            }
        }

        builder = match request.body() {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Multipart(file)) => builder.multipart(file.to_form()?),
            None => builder,
        };

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            let error = ApiError::transport(e);
            tracing::warn!(
                method = %request.method(),
                path = request.path(),
                timeout = error.is_timeout(),
                "Request failed before a response arrived"
            );
            error
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;

        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request completed"
        );

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body: body.to_vec(),
            })
        } else {
            Err(ApiError::from_response(status.as_u16(), &body))
        }
    }

    /// Obtain a token newer than `rejected`, refreshing if needed.
    pub(crate) async fn recover_token(&self, rejected: Option<&str>, label: &str) -> Result<String> {
        let ticket = match self.inner.refresh.join(&self.inner.session, rejected, label) {
            Join::Ready(token) => return Ok(token),
            Join::Started(ticket) => {
                self.spawn_refresh();
                ticket
            }
            Join::Queued(ticket) => ticket,
        };

        ticket.wait().await.map_err(|failure| {
            tracing::debug!(request = label, reason = %failure, "Refresh wave failed");
            ApiError::Unauthenticated
        })
    }

    /// Run the refresh call on its own task so it settles even if the
    /// request that started it is dropped.
    fn spawn_refresh(&self) {
        let client = self.clone();
        let guard = SettleGuard::new(Arc::clone(&self.inner.refresh));

        tokio::spawn(async move {
            let outcome = client.run_refresh().await;
            let succeeded = outcome.is_ok();
            let report = guard.settle(&outcome);
            tracing::info!(
                succeeded,
                waiters = report.delivered,
                abandoned = report.abandoned,
                elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
                "Refresh wave settled"
            );
        });
    }

    /// Exchange the refresh token for a new pair and update the session.
    ///
    /// Any failure expires the session. If the session was signed out or
    /// replaced while the call was in flight, the result is discarded and
    /// waiters get whatever the session holds now.
    async fn run_refresh(&self) -> RefreshOutcome {
        let session = &self.inner.session;
        let expected = session.refresh_token();

        let result = match expected.as_deref() {
            Some(refresh_token) => {
                let request = crate::resources::auth::refresh_request(refresh_token);
                match self.dispatch(&request, None).await {
                    Ok(response) => response
                        .body::<JwtResponse>()
                        .map_err(|_| RefreshFailure::MalformedResponse),
                    Err(ApiError::Http { status, .. }) => Err(RefreshFailure::Rejected { status }),
                    Err(ApiError::Network { timeout, .. }) => {
                        Err(RefreshFailure::Network { timeout })
                    }
                    Err(_) => Err(RefreshFailure::MalformedResponse),
                }
            }
            None => Err(RefreshFailure::MissingRefreshToken),
        };

        match (result, expected.as_deref()) {
            (Ok(jwt), Some(expected)) => {
                let tokens = jwt.token_pair();
                let access_token = tokens.access_token.clone();
                match session.rotate_tokens(expected, tokens) {
                    Ok(true) => {
                        tracing::info!("Access token refreshed");
                        Ok(access_token)
                    }
                    Ok(false) => current_token(session),
                    Err(e) => {
                        tracing::warn!(error = %e, "Refreshed tokens could not be persisted");
                        Ok(access_token)
                    }
                }
            }
            (Ok(_), None) => Err(RefreshFailure::MissingRefreshToken),
            (Err(failure), expected) => match session.expire_if(expected) {
                Ok(true) => {
                    tracing::warn!(reason = %failure, "Token refresh failed, session expired");
                    Err(failure)
                }
                Ok(false) => {
                    tracing::debug!(reason = %failure, "Ignoring failed refresh of a replaced session");
                    current_token(session)
                }
                Err(e) => {
                    tracing::warn!(reason = %failure, "Token refresh failed, session expired");
                    tracing::warn!(error = %e, "Expired session could not be cleared from storage");
                    Err(failure)
                }
            },
        }
    }
}

/// Outcome for waiters of a refresh whose session changed underneath it.
fn current_token(session: &SessionHandle) -> RefreshOutcome {
    let current = session.access_token();
    tracing::debug!(
        authenticated = current.is_some(),
        "Session changed during refresh, discarding result"
    );
    current.ok_or(RefreshFailure::SessionChanged)
}
