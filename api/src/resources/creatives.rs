//! Ad creatives.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of creative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CreativeType {
    /// Image banner backed by an uploaded media file.
    Image,
    /// Raw HTML snippet.
    Html,
}

/// Localised text of a creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeTranslation {
    /// Language code ("uz", "ru", "en").
    pub lang: String,
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Image alt text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Ad creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsCreativeDto {
    /// Creative id.
    pub id: i64,
    /// Owning campaign.
    pub campaign_id: Option<i64>,
    /// Owning campaign name.
    pub campaign_name: Option<String>,
    /// Kind.
    #[serde(rename = "type")]
    pub creative_type: Option<CreativeType>,
    /// Click-through URL.
    pub landing_url: Option<String>,
    /// Image media id, for image creatives.
    pub image_media_id: Option<i64>,
    /// Image URL, for image creatives.
    pub image_url: Option<String>,
    /// HTML, for HTML creatives.
    pub html_snippet: Option<String>,
    /// `false` when disabled.
    pub is_active: Option<bool>,
    /// Translations keyed by language code.
    #[serde(default)]
    pub translations: BTreeMap<String, CreativeTranslation>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreative {
    /// Owning campaign.
    pub campaign_id: i64,
    /// Kind.
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    /// Click-through URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_url: Option<String>,
    /// Image media id, for image creatives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_media_id: Option<i64>,
    /// HTML, for HTML creatives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_snippet: Option<String>,
    /// Translations keyed by language code; at least one.
    pub translations: BTreeMap<String, CreativeTranslation>,
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeUpdate {
    /// Click-through URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_url: Option<String>,
    /// Image media id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_media_id: Option<i64>,
    /// HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_snippet: Option<String>,
    /// Enable or disable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Replacement translations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<BTreeMap<String, CreativeTranslation>>,
}

facade! {
    /// Ad creatives.
    CreativesApi
}

impl CreativesApi<'_> {
    /// All creatives.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self) -> Result<Vec<AdsCreativeDto>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/admin/ads/creatives",
                Access::Protected,
            ))
            .await
    }

    /// One creative.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<AdsCreativeDto> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/ads/creatives/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Create a creative.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, creative: &NewCreative) -> Result<AdsCreativeDto> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/ads/creatives", Access::Protected)
            .json(creative)?;
        self.client.data(request).await
    }

    /// Change a creative.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &CreativeUpdate) -> Result<AdsCreativeDto> {
        let request = ApiRequest::new(
            HttpMethod::Put,
            format!("/admin/ads/creatives/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.data(request).await
    }

    /// Delete a creative.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/ads/creatives/{id}"),
                Access::Protected,
            ))
            .await
    }
}
