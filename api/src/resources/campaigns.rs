//! Ad campaigns.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a campaign. Transitions are validated server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignStatus {
    /// Not yet serving.
    Draft,
    /// Serving.
    Active,
    /// Temporarily stopped.
    Paused,
    /// Finished.
    Ended,
}

/// Ad campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsCampaignDto {
    /// Campaign id.
    pub id: i64,
    /// Campaign name.
    pub name: String,
    /// Advertiser name.
    pub advertiser: Option<String>,
    /// Lifecycle state.
    pub status: Option<CampaignStatus>,
    /// Start of the serving window.
    pub start_at: Option<NaiveDateTime>,
    /// End of the serving window.
    pub end_at: Option<NaiveDateTime>,
    /// Daily impression cap.
    pub daily_cap_impressions: Option<i32>,
    /// Daily click cap.
    pub daily_cap_clicks: Option<i32>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    /// Campaign name.
    pub name: String,
    /// Advertiser name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser: Option<String>,
    /// Start of the serving window.
    pub start_at: NaiveDateTime,
    /// End of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<NaiveDateTime>,
    /// Daily impression cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_cap_impressions: Option<i32>,
    /// Daily click cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_cap_clicks: Option<i32>,
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignUpdate {
    /// Campaign name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Advertiser name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser: Option<String>,
    /// Start of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<NaiveDateTime>,
    /// End of the serving window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<NaiveDateTime>,
    /// Daily impression cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_cap_impressions: Option<i32>,
    /// Daily click cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_cap_clicks: Option<i32>,
}

#[derive(Serialize)]
struct StatusChange {
    status: CampaignStatus,
}

facade! {
    /// Ad campaigns.
    CampaignsApi
}

impl CampaignsApi<'_> {
    /// All campaigns.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self) -> Result<Vec<AdsCampaignDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/ads/campaigns",
                Access::Protected,
            ))
            .await
    }

    /// One campaign.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<AdsCampaignDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/ads/campaigns/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Create a campaign.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, campaign: &NewCampaign) -> Result<AdsCampaignDto> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/ads/campaigns", Access::Protected)
            .json(campaign)?;
        self.client.data(request).await
    }

    /// Change a campaign's details.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &CampaignUpdate) -> Result<AdsCampaignDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/ads/campaigns/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.data(request).await
    }

    /// Move a campaign to `status`.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update_status(&self, id: i64, status: CampaignStatus) -> Result<AdsCampaignDto> {
        let request = ApiRequest::new(
            HttpMethod::Patch,
            format!("/admin/ads/campaigns/{id}/status"),
            Access::Protected,
        )
        .json(&StatusChange { status })?;
        self.client.data(request).await
    }

    /// Delete a campaign.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/ads/campaigns/{id}"),
                Access::Protected,
            ))
            .await
    }
}
