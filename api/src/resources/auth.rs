//! Authentication endpoints.

use super::users::UserDto;
use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::{DateTime, Utc};
use newsdesk_auth::{Role, TokenPair, UserSummary};
use serde::{Deserialize, Deserializer, Serialize};

const LOGIN_PATH: &str = "/admin/auth/login";
const REFRESH_PATH: &str = "/admin/auth/refresh";
const LOGOUT_PATH: &str = "/admin/auth/logout";
const CURRENT_USER_PATH: &str = "/admin/auth/user/me";

/// Credentials for `login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token pair issued by `login` and `refresh` (bare body, no envelope).
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token.
    pub refresh_token: String,
    /// Token scheme, normally "Bearer".
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access token expiry.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub access_token_expire_date: Option<DateTime<Utc>>,
    /// Refresh token expiry.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub refresh_token_expire_date: Option<DateTime<Utc>>,
}

impl JwtResponse {
    /// The issued pair.
    #[must_use]
    pub fn token_pair(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

impl std::fmt::Debug for JwtResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtResponse")
            .field("token_type", &self.token_type)
            .field("access_token_expire_date", &self.access_token_expire_date)
            .field("refresh_token_expire_date", &self.refresh_token_expire_date)
            .finish_non_exhaustive()
    }
}

/// Expiry dates arrive either as ISO-8601 strings or epoch milliseconds,
/// depending on the backend's Jackson settings. Anything else is ignored.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// `POST /admin/auth/refresh?refreshToken=...`, public.
pub(crate) fn refresh_request(refresh_token: &str) -> ApiRequest {
    ApiRequest::new(HttpMethod::Post, REFRESH_PATH, Access::Public).query("refreshToken", refresh_token)
}

facade! {
    /// Authentication endpoints.
    AuthApi
}

impl AuthApi<'_> {
    /// Sign in and install the issued session.
    ///
    /// The login response carries no role, so the session starts as
    /// [`Role::Admin`]; call [`sync_profile`](Self::sync_profile) to load the
    /// real one.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`](crate::ApiError::Http) for rejected credentials
    /// (never triggers a refresh), or a credential storage error if the
    /// session could not be persisted; in that case the in-memory session is
    /// still signed in.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserSummary> {
        let request = ApiRequest::new(HttpMethod::Post, LOGIN_PATH, Access::Public).json(
            &LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            },
        )?;

        let jwt: JwtResponse = self.client.body(request).await?;
        let user = UserSummary::new(username, Role::Admin);
        self.client.session().set_auth(user.clone(), jwt.token_pair())?;

        tracing::info!(username, "Signed in");
        Ok(user)
    }

    /// Force a token refresh now.
    ///
    /// Joins an in-flight refresh if there is one.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthenticated`](crate::ApiError::Unauthenticated) if the
    /// refresh failed; the session has been cleared.
    pub async fn refresh(&self) -> Result<()> {
        let current = self.client.session().access_token();
        self.client
            .recover_token(current.as_deref(), "POST /admin/auth/refresh")
            .await
            .map(|_| ())
    }

    /// Sign out.
    ///
    /// The server call is best-effort and never retried; the local session
    /// is cleared whatever it returns.
    ///
    /// # Errors
    ///
    /// Only if the local credentials could not be removed from storage.
    pub async fn logout(&self) -> Result<()> {
        let session = self.client.session();
        if let Some(token) = session.access_token() {
            let request = ApiRequest::new(HttpMethod::Post, LOGOUT_PATH, Access::Protected);
            if let Err(e) = self.client.dispatch(&request, Some(&token)).await {
                tracing::warn!(error = %e, "Server-side logout failed, signing out locally");
            }
        }

        session.sign_out()?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Profile of the signed-in operator.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn current_user(&self) -> Result<UserDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                CURRENT_USER_PATH,
                Access::Protected,
            ))
            .await
    }

    /// Fetch the profile and store its username and role in the session.
    ///
    /// # Errors
    ///
    /// See [`current_user`](Self::current_user); also a credential storage
    /// error if the session cannot be updated.
    pub async fn sync_profile(&self) -> Result<UserSummary> {
        let profile = self.current_user().await?;
        let summary = profile.summary();
        self.client.session().set_user(summary.clone())?;
        tracing::debug!(role = summary.role.as_str(), "Profile synced");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_response_with_iso_dates() {
        let jwt: JwtResponse = serde_json::from_str(
            r#"{"accessToken":"T1","refreshToken":"R1","tokenType":"Bearer",
                "accessTokenExpireDate":"2025-03-01T10:00:00.000+00:00",
                "refreshTokenExpireDate":"2025-03-08T10:00:00.000+00:00"}"#,
        )
        .unwrap();

        assert_eq!(jwt.token_pair(), TokenPair::new("T1", "R1"));
        assert!(jwt.access_token_expire_date.is_some());
    }

    #[test]
    fn test_jwt_response_with_epoch_dates() {
        let jwt: JwtResponse = serde_json::from_str(
            r#"{"accessToken":"T1","refreshToken":"R1","accessTokenExpireDate":1740823200000}"#,
        )
        .unwrap();

        assert_eq!(
            jwt.access_token_expire_date.map(|d| d.timestamp()),
            Some(1_740_823_200)
        );
        assert!(jwt.refresh_token_expire_date.is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let jwt: JwtResponse =
            serde_json::from_str(r#"{"accessToken":"secret-a","refreshToken":"secret-r"}"#).unwrap();
        assert!(!format!("{jwt:?}").contains("secret"));

        let login = LoginRequest {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{login:?}").contains("hunter2"));
    }

    #[test]
    fn test_refresh_request_is_public() {
        let request = refresh_request("R1");
        assert_eq!(request.access(), Access::Public);
        assert_eq!(
            request.query_pairs(),
            &[("refreshToken".to_string(), "R1".to_string())]
        );
    }
}
