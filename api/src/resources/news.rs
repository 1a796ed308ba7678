//! Articles.
//!
//! The admin news routes answer with bare bodies: single articles, Spring
//! pages, and lists. Deletes and restore answer with no content.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use crate::response::{Page, PageRequest};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Editorial status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NewsStatus {
    /// Being written.
    Draft,
    /// Awaiting review.
    Review,
    /// Live.
    Published,
    /// Taken down.
    Unpublished,
    /// Archived.
    Archived,
}

impl NewsStatus {
    /// Backend status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Review => "REVIEW",
            Self::Published => "PUBLISHED",
            Self::Unpublished => "UNPUBLISHED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One language version of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsTranslation {
    /// Translation id.
    pub id: Option<i64>,
    /// Language code ("uz", "ru", "en").
    pub lang: Option<String>,
    /// Headline.
    pub title: String,
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
}

/// Article as seen by the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    /// Article id.
    pub id: i64,
    /// Author id.
    pub author_id: Option<i64>,
    /// Author display name.
    pub author_name: Option<String>,
    /// Category id.
    pub category_id: Option<i64>,
    /// Category title.
    pub category_title: Option<String>,
    /// Cover image id.
    pub cover_media_id: Option<i64>,
    /// Cover image URL.
    pub cover_media_url: Option<String>,
    /// Editorial status.
    pub status: Option<NewsStatus>,
    /// Pinned to the front page.
    pub is_featured: Option<bool>,
    /// Soft-deleted.
    pub is_deleted: Option<bool>,
    /// Scheduled publication.
    pub publish_at: Option<NaiveDateTime>,
    /// Scheduled removal.
    pub unpublish_at: Option<NaiveDateTime>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
    /// Translations keyed by language code.
    #[serde(default)]
    pub translations: BTreeMap<String, NewsTranslation>,
    /// Tag codes.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Translation part of [`NewsCreateRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsTranslationRequest {
    /// Headline.
    pub title: String,
    /// URL slug; generated by the backend when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Lead paragraph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Body.
    pub content: String,
    /// SEO title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    /// SEO description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// Body of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsCreateRequest {
    /// Category id.
    pub category_id: i64,
    /// Cover image id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_media_id: Option<i64>,
    /// Initial status.
    pub status: NewsStatus,
    /// Pinned to the front page.
    pub is_featured: bool,
    /// Scheduled publication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<NaiveDateTime>,
    /// Scheduled removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpublish_at: Option<NaiveDateTime>,
    /// Translations keyed by language code; at least one.
    pub translations: BTreeMap<String, NewsTranslationRequest>,
    /// Tag codes.
    pub tag_codes: Vec<String>,
}

/// One status change in an article's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsHistory {
    /// Entry id.
    pub id: Option<i64>,
    /// Status before the change.
    pub from_status: Option<String>,
    /// Status after the change.
    pub to_status: Option<String>,
    /// Field-level diff.
    #[serde(default)]
    pub diff_json: Option<serde_json::Value>,
    /// Time of the change.
    pub created_at: Option<NaiveDateTime>,
}

/// Filters for `list`; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    /// Only this status.
    pub status: Option<NewsStatus>,
    /// Only this author.
    pub author_id: Option<i64>,
    /// Only this category.
    pub category_id: Option<i64>,
    /// Only articles with this tag code.
    pub tag: Option<String>,
    /// Translation language.
    pub lang: Option<String>,
}

#[derive(Serialize)]
struct StatusChange {
    status: NewsStatus,
}

facade! {
    /// Articles.
    NewsApi
}

impl NewsApi<'_> {
    /// One page of articles.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self, filter: &NewsFilter, page: PageRequest) -> Result<Page<NewsResponse>> {
        let request = ApiRequest::new(HttpMethod::Get, "/admin/news", Access::Protected)
            .query_opt("status", filter.status)
            .query_opt("authorId", filter.author_id)
            .query_opt("categoryId", filter.category_id)
            .query_opt("tag", filter.tag.as_deref())
            .query_opt("lang", filter.lang.as_deref())
            .query("page", page.page)
            .query("size", page.size);
        self.client.body(request).await
    }

    /// One article.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn get(&self, id: i64) -> Result<NewsResponse> {
        self.client
            .body(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/news/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Create an article.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, news: &NewsCreateRequest) -> Result<NewsResponse> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/news", Access::Protected).json(news)?;
        self.client.body(request).await
    }

    /// Move an article to `status`.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update_status(&self, id: i64, status: NewsStatus) -> Result<NewsResponse> {
        let request = ApiRequest::new(
            HttpMethod::Patch,
            format!("/admin/news/{id}/status"),
            Access::Protected,
        )
        .json(&StatusChange { status })?;
        self.client.body(request).await
    }

    /// Move an article to the trash.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/news/{id}"),
                Access::Protected,
            ))
            .await
    }

    /// Bring an article back from the trash.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn restore(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Post,
                format!("/admin/news/{id}/restore"),
                Access::Protected,
            ))
            .await
    }

    /// Delete an article permanently.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn hard_delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/news/{id}/hard"),
                Access::Protected,
            ))
            .await
    }

    /// Status history of an article.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn history(&self, id: i64) -> Result<Vec<NewsHistory>> {
        self.client
            .body(ApiRequest::new(
                HttpMethod::Get,
                format!("/admin/news/{id}/history"),
                Access::Protected,
            ))
            .await
    }
}
