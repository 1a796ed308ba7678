//! Media uploads.

use crate::error::Result;
use crate::request::{Access, ApiRequest, FilePart, HttpMethod};
use serde::{Deserialize, Serialize};

/// Stored media file (bare body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Media id.
    pub id: i64,
    /// Public URL.
    pub url: String,
    /// Storage key.
    pub storage_key: Option<String>,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Image width.
    pub width: Option<i32>,
    /// Image height.
    pub height: Option<i32>,
    /// Reachable without authentication.
    pub is_public: Option<bool>,
}

facade! {
    /// Media uploads.
    MediaApi
}

impl MediaApi<'_> {
    /// Upload a file as the `file` form field.
    ///
    /// The upload is retried once after a token refresh like any other
    /// protected request; the file is held in memory for that.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn upload(
        &self,
        file_name: &str,
        mime_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Media> {
        let mut part = FilePart::new("file", file_name, bytes);
        if let Some(mime_type) = mime_type {
            part = part.with_mime_type(mime_type);
        }
        let request =
            ApiRequest::new(HttpMethod::Post, "/admin/media", Access::Protected).multipart(part);
        self.client.body(request).await
    }

    /// Delete a file.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .no_content(ApiRequest::new(
                HttpMethod::Delete,
                format!("/admin/media/{id}"),
                Access::Protected,
            ))
            .await
    }
}
