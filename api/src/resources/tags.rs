//! Tags.

use crate::error::Result;
use crate::request::{Access, ApiRequest, HttpMethod};
use crate::response::{Page, PageRequest};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag id.
    pub id: i64,
    /// Code: lowercase letters, digits and hyphens.
    pub code: String,
    /// `false` when hidden from the public site.
    pub is_active: Option<bool>,
    /// Creation time.
    pub created_at: Option<NaiveDateTime>,
    /// Last update time.
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `update`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    /// New code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
struct NewTag<'a> {
    code: &'a str,
}

facade! {
    /// Tags.
    TagsApi
}

impl TagsApi<'_> {
    /// One page of tags.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn list(&self, page: PageRequest) -> Result<Page<Tag>> {
        let request = ApiRequest::new(HttpMethod::Get, "/admin/tags", Access::Protected)
            .query("page", page.page)
            .query("size", page.size);
        self.client.body(request).await
    }

    /// Create a tag.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn create(&self, code: &str) -> Result<Tag> {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/tags", Access::Protected)
            .json(&NewTag { code })?;
        self.client.body(request).await
    }

    /// Change a tag's code or visibility.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn update(&self, id: i64, update: &TagUpdate) -> Result<Tag> {
        let request = ApiRequest::new(
            HttpMethod::Patch,
            format!("/admin/tags/{id}"),
            Access::Protected,
        )
        .json(update)?;
        self.client.body(request).await
    }

    /// Delete a tag.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/tags/{id}"),
                Access::Protected,
            ))
            .await
    }
}
