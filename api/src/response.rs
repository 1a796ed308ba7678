//! Response shapes.
//!
//! The backend is not uniform: most admin routes wrap their payload in an
//! [`Envelope`], while auth, news and tag routes return bare bodies or
//! Spring [`Page`]s. Every endpoint states which shape it expects.

use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A successful (2xx) raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the whole body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ResponseParseFailed`] if the body does not match.
    pub fn body<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::ResponseParseFailed(format!("body: {e}")))
    }

    /// Decode the body as an [`Envelope`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ResponseParseFailed`] if the body is not an
    /// envelope around `T`.
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::ResponseParseFailed(format!("envelope: {e}")))
    }

    /// Decode the envelope and return its `data` field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ResponseParseFailed`] if the body is not an
    /// envelope or `data` is missing.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        self.envelope::<T>()?
            .data
            .ok_or_else(|| ApiError::ResponseParseFailed("envelope has no `data`".to_string()))
    }

    /// `true` when the body is empty (204, or 200 without content).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Uniform wrapper used by most admin and public routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Application status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP status name (e.g. "OK", "NOT_FOUND").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    /// Extra metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Total element count, on paginated routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<i64>,
    /// Total page count, on paginated routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

/// Spring Data page, returned bare by the news and tag routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Total items across all pages.
    #[serde(default)]
    pub total_elements: i64,
    /// Total page count.
    #[serde(default)]
    pub total_pages: i64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: i64,
    /// Page size.
    #[serde(default)]
    pub size: i64,
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl PageRequest {
    /// Create a page request.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> ApiResponse {
        ApiResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_data_unwraps_envelope() {
        let value: Vec<i64> = response(r#"{"message":"ok","status":"OK","data":[1,2]}"#)
            .data()
            .unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn test_missing_data_is_a_parse_failure() {
        let err = response(r#"{"message":"ok"}"#).data::<i64>().unwrap_err();
        assert!(matches!(err, ApiError::ResponseParseFailed(_)));
    }

    #[test]
    fn test_envelope_keeps_pagination() {
        let envelope: Envelope<Vec<String>> =
            response(r#"{"data":["a"],"elements":31,"pages":4}"#)
                .envelope()
                .unwrap();
        assert_eq!(envelope.elements, Some(31));
        assert_eq!(envelope.pages, Some(4));
    }

    #[test]
    fn test_spring_page() {
        let page: Page<i64> = response(
            r#"{"content":[7],"totalElements":1,"totalPages":1,"number":0,"size":10,"sort":{}}"#,
        )
        .body()
        .unwrap();
        assert_eq!(page.content, vec![7]);
        assert_eq!(page.total_elements, 1);
    }

    #[test]
    fn test_empty_body() {
        assert!(response("").is_empty());
        assert!(!response("{}").is_empty());
    }
}
