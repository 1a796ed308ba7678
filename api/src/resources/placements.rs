//! Ad placements.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Slot on the public site where ads are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsPlacementDto {
    /// Placement id.
    pub id: i64,
    /// Code used by the public site (e.g. "home-top").
    pub code: String,
    /// Display title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
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
pub struct NewPlacement {
    /// Code: lowercase letters, digits and hyphens.
    pub code: String,
    /// Display title.
    pub title: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementUpdate {
    /// New code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enable or disable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

facade! {
    /// Ad placements.
    PlacementsApi
}

impl PlacementsApi<'_> {
    /// All placements.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self) -> Result<Vec<AdsPlacementDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/ads/placements",
                Access::Protected,
            ))
            .await
    }

    /// One placement.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<AdsPlacementDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/ads/placements/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Create a placement.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, placement: &NewPlacement) -> Result<AdsPlacementDto> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/ads/placements", Access::Protected)
            .json(placement)?;
        self.client.data(request).await
    }

    /// Partially update a placement.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &PlacementUpdate) -> Result<AdsPlacementDto> {
        let request = ApiRequest::new(
            HttpMethod::Patch,
            format!("/admin/ads/placements/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.data(request).await
    }

    /// Delete a placement.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/ads/placements/{id}"),
                Access::Protected,
            ))
            .await
    }
}
