//! Public site endpoints. None of these carry a token or trigger a refresh.

use super::assignments::AdsAssignmentDto;
use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use crate::response::{Envelope, PageRequest};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Language used when a caller does not pick one.
pub const DEFAULT_LANG: &str = "uz";

/// Published article resolved to one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPublicResponse {
    /// Article id.
    pub id: i64,
    /// Headline.
    pub title: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Lead paragraph.
    pub summary: Option<String>,
    /// Body.
    pub content: Option<String>,
    /// SEO title.
    pub meta_title: Option<String>,
    /// SEO description.
    pub meta_description: Option<String>,
    /// Cover image URL.
    pub cover_image_url: Option<String>,
    /// Category id.
    pub category_id: Option<i64>,
    /// Category title.
    pub category_title: Option<String>,
    /// Category slug.
    pub category_slug: Option<String>,
    /// Tag codes.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Pinned to the front page.
    pub is_featured: Option<bool>,
    /// Publication time.
    pub published_at: Option<NaiveDateTime>,
}

/// Category resolved to one language, for the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPublic {
    /// Category id.
    pub id: i64,
    /// Parent category.
    pub parent_id: Option<i64>,
    /// Language code.
    pub lang: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Search parameters for the public news feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicNewsQuery {
    /// Full-text keyword.
    pub keyword: Option<String>,
    /// Language.
    pub lang: String,
    /// Only articles with this tag code.
    pub tag: Option<String>,
    /// Only this category.
    pub category_id: Option<i64>,
    /// Published on or after.
    pub from: Option<NaiveDate>,
    /// Published on or before.
    pub to: Option<NaiveDate>,
    /// Page.
    pub page: PageRequest,
}

impl Default for PublicNewsQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            lang: DEFAULT_LANG.to_string(),
            tag: None,
            category_id: None,
            from: None,
            to: None,
            page: PageRequest::default(),
        }
    }
}

facade! {
    /// Public site endpoints.
    PublicApi
}

impl PublicApi<'_> {
    /// Published articles. Returns the full envelope for its pagination
    /// fields.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn news(&self, query: &PublicNewsQuery) -> Result<Envelope<Vec<NewsPublicResponse>>> {
        let request = ApiRequest::new(HttpMethod::Get, "/public/news", Access::Public)
            .query_opt("keyword", query.keyword.as_deref())
            .query("lang", &query.lang)
            .query_opt("tag", query.tag.as_deref())
            .query_opt("categoryId", query.category_id)
            .query_opt("from", query.from)
            .query_opt("to", query.to)
            .query("page", query.page.page)
            .query("size", query.page.size);
        self.client.envelope(request).await
    }

    /// One published article (bare body).
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn news_by_slug(&self, slug: &str, lang: &str) -> Result<NewsPublicResponse> {
        let request = ApiRequest::new(
            HttpMethod::Get,
            format!("/public/news/{slug}"),
            Access::Public,
        )
        .query("lang", lang);
        self.client.body(request).await
    }

    /// Active categories in one language.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn categories(&self, lang: &str) -> Result<Vec<CategoryPublic>> {
        let request = ApiRequest::new(HttpMethod::Get, "/public/news/categories", Access::Public)
            .query("lang", lang);
        self.client.data(request).await
    }

    /// Active tag codes.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn tags(&self) -> Result<Vec<String>> {
        self.client
            .data(ApiRequest::new(
                HttpMethod::Get,
                "/public/news/tags",
                Access::Public,
            ))
            .await
    }

    /// The ad chosen for a placement, filtered by language and category.
    ///
    /// # Errors
    ///
    /// [`ApiError::Http`](crate::ApiError::Http) with status 404 when no ad
    /// is active for the placement; see also
    /// [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn ad_for_placement(
        &self,
        placement_code: &str,
        lang: &str,
        category_id: Option<i64>,
    ) -> Result<AdsAssignmentDto> {
        let request = ApiRequest::new(
            HttpMethod::Get,
            format!("/public/ads/{placement_code}"),
            Access::Public,
        )
        .query("lang", lang)
        .query_opt("categoryId", category_id);
        self.client.data(request).await
    }
}
