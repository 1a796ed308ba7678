//! Operator accounts.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use crate::response::{Envelope, PageRequest};
use chrono::NaiveDateTime;
use newsdesk_auth::{Role, UserSummary};
use serde::{Deserialize, Serialize};

/// Operator account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Account id.
    pub id: Option<i64>,
    /// Display name.
    pub full_name: Option<String>,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: Option<String>,
    /// Role names (e.g. "ADMIN", "ROLE_EDITOR").
    #[serde(default)]
    pub role_names: Vec<String>,
    /// Role ids.
    #[serde(default)]
    pub role_ids: Vec<i64>,
    /// `false` when the account is disabled.
    pub is_active: Option<bool>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

impl UserDto {
    /// Most privileged role held, for the session summary.
    #[must_use]
    pub fn role(&self) -> Role {
        let roles: Vec<Role> = self.role_names.iter().map(|n| Role::from_name(n)).collect();
        if roles.contains(&Role::Admin) {
            Role::Admin
        } else if roles.contains(&Role::Editor) {
            Role::Editor
        } else {
            Role::Unknown
        }
    }

    /// Session summary for this account.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary::new(self.username.clone(), self.role())
    }
}

/// Body of `register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    pub full_name: String,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Roles to grant.
    pub role_ids: Vec<i64>,
    /// Initial password.
    pub password: String,
    /// Whether the account starts enabled.
    pub is_active: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("role_ids", &self.role_ids)
            .finish_non_exhaustive()
    }
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement role set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<i64>>,
}

/// Role definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    /// Role id.
    pub id: Option<i64>,
    /// Role name.
    pub name: Option<String>,
}

facade! {
    /// Operator accounts.
    UsersApi
}

impl UsersApi<'_> {
    /// List accounts. Returns the full envelope for its pagination fields.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self, page: PageRequest) -> Result<Envelope<Vec<UserDto>>> {
        let request = ApiRequest::new(HttpMethod::Get, "/admin/auth/get-all-users", Access::Protected)
            .query("page", page.page)
            .query("size", page.size);
        self.client.envelope(request).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn register(&self, user: &NewUser) -> Result<UserDto> {
        let request =
            ApiRequest::new(HttpMethod::Post, "/admin/auth/register", Access::Protected).json(user)?;
        self.client.data(request).await
    }

    /// Change an account's details.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<UserDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/auth/change-credentials/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.data(request).await
    }

    /// Enable or disable an account.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn toggle_status(&self, id: i64, active: bool) -> Result<UserDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/auth/toggle-status/{id}"),
            Access::Protected,
        )
        .query("status", active);
        self.client.data(request).await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn remove(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/auth/remove-user/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Available roles.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn roles(&self) -> Result<Vec<RoleDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/auth/get-roles",
                Access::Protected,
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> UserDto {
        UserDto {
            id: Some(1),
            full_name: None,
            username: "jane".to_string(),
            email: None,
            role_names: roles.iter().map(ToString::to_string).collect(),
            role_ids: vec![],
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_role_prefers_admin() {
        assert_eq!(user(&["ROLE_EDITOR", "ROLE_ADMIN"]).role(), Role::Admin);
        assert_eq!(user(&["EDITOR"]).role(), Role::Editor);
        assert_eq!(user(&[]).role(), Role::Unknown);
    }

    #[test]
    fn test_user_dto_from_backend_json() {
        let dto: UserDto = serde_json::from_str(
            r#"{"id":3,"fullName":"Jane Doe","username":"jane","email":"j@x.uz",
                "roleNames":["EDITOR"],"roleIds":[2],"isActive":true,
                "createdAt":"2025-01-10T09:30:00.123456"}"#,
        )
        .unwrap();

        assert_eq!(dto.summary(), UserSummary::new("jane", Role::Editor));
        assert!(dto.created_at.is_some());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = UserUpdate {
            email: Some("new@x.uz".to_string()),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"email": "new@x.uz"})
        );
    }
}
