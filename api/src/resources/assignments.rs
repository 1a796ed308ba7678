//! Creative-to-placement assignments.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A creative scheduled into a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsAssignmentDto {
    /// Assignment id.
    pub id: i64,
    /// Placement id.
    pub placement_id: Option<i64>,
    /// Placement code.
    pub placement_code: Option<String>,
    /// Placement title.
    pub placement_title: Option<String>,
    /// Campaign id.
    pub campaign_id: Option<i64>,
    /// Campaign name.
    pub campaign_name: Option<String>,
    /// Creative id.
    pub creative_id: Option<i64>,
    /// Selection weight, 0 to 100.
    pub weight: Option<i32>,
    /// Languages served; all when empty.
    #[serde(default)]
    pub lang_filter: Option<Vec<String>>,
    /// Categories served; all when empty.
    #[serde(default)]
    pub category_filter: Option<Vec<i64>>,
    /// Start of the serving window.
    pub start_at: Option<NaiveDateTime>,
    /// End of the serving window.
    pub end_at: Option<NaiveDateTime>,
    /// `false` when disabled.
    pub is_active: Option<bool>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    /// Placement id.
    pub placement_id: i64,
    /// Campaign id.
    pub campaign_id: i64,
    /// Creative id.
    pub creative_id: i64,
    /// Selection weight, 0 to 100.
    pub weight: i32,
    /// Languages served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_filter: Option<Vec<String>>,
    /// Categories served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<Vec<i64>>,
    /// Start of the serving window.
    pub start_at: NaiveDateTime,
    /// End of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<NaiveDateTime>,
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUpdate {
    /// Selection weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    /// Languages served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_filter: Option<Vec<String>>,
    /// Categories served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<Vec<i64>>,
    /// Start of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<NaiveDateTime>,
    /// End of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<NaiveDateTime>,
    /// Enable or disable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

facade! {
    /// Creative-to-placement assignments.
    AssignmentsApi
}

impl AssignmentsApi<'_> {
    /// All assignments.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self) -> Result<Vec<AdsAssignmentDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/ads/assignments",
                Access::Protected,
            ))
            .await
    }

    /// One assignment.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<AdsAssignmentDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/ads/assignments/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Schedule a creative into a placement.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, assignment: &NewAssignment) -> Result<AdsAssignmentDto> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/ads/assignments", Access::Protected)
            .json(assignment)?;
        self.client.data(request).await
    }

    /// Change an assignment.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &AssignmentUpdate) -> Result<AdsAssignmentDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/ads/assignments/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.data(request).await
    }

    /// Delete an assignment.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/ads/assignments/{id}"),
                Access::Protected,
            ))
            .await
    }
}
