//! Request descriptions.
//!
//! An [`ApiRequest`] is a complete, replayable description of one logical
//! call: the client may send it twice (original + one retry after a token
//! refresh), so it owns everything needed to rebuild the wire request.

use crate::error::{ApiError, Result};
use serde::Serialize;
use std::fmt;

/// HTTP methods the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Whether a request carries the session's bearer token.
///
/// Declared at every call site. Paths are never inspected to guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No `Authorization` header, whatever the session holds. A 401 is
    /// returned to the caller without attempting a refresh.
    Public,
    /// Bearer token attached when the session has one; a 401 triggers the
    /// refresh protocol.
    Protected,
}

/// A file sent as one multipart form field.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Create a part for `field` with the given file name and contents.
    #[must_use]
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mut part = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone());
        if let Some(mime_type) = &self.mime_type {
            part = part
                .mime_str(mime_type)
                .map_err(|e| ApiError::InvalidRequest(format!("invalid MIME type: {e}")))?;
        }
        Ok(reqwest::multipart::Form::new().part(self.field.clone(), part))
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document.
    Json(serde_json::Value),
    /// Single-file multipart form.
    Multipart(FilePart),
}

/// Replayable description of one backend call.
///
/// # Examples
///
/// ```
/// use newsdesk_api::{Access, ApiRequest, HttpMethod};
///
/// let request = ApiRequest::new(HttpMethod::Get, "/public/news", Access::Public)
///     .query("lang", "uz")
///     .query_opt("categoryId", None::<i64>);
///
/// assert_eq!(request.query_pairs(), &[("lang".to_string(), "uz".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    access: Access,
}

impl ApiRequest {
    /// Describe a call to `path` (relative to the configured base URL).
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, access: Access) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            access,
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `body` cannot be serialised.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("body serialisation failed: {e}")))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Attach a single-file multipart body.
    #[must_use]
    pub fn multipart(mut self, file: FilePart) -> Self {
        self.body = Some(RequestBody::Multipart(file));
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Backend-relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters, in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Declared access.
    #[must_use]
    pub const fn access(&self) -> Access {
        self.access
    }

    /// `true` if the request carries the bearer token.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self.access, Access::Protected)
    }

    /// `METHOD path` label used in logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_json_body() {
        let request = ApiRequest::new(HttpMethod::Post, "/admin/tags", Access::Protected)
            .json(&serde_json::json!({"code": "sport"}))
            .unwrap();

        assert_eq!(
            request.body(),
            Some(&RequestBody::Json(serde_json::json!({"code": "sport"})))
        );
        assert!(request.is_protected());
        assert_eq!(request.label(), "POST /admin/tags");
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_file_part_debug_hides_contents() {
        let part = FilePart::new("file", "cover.png", vec![1, 2, 3]).with_mime_type("image/png");
        let rendered = format!("{part:?}");
        assert!(rendered.contains("len: 3"));
        assert!(part.to_form().is_ok());
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let part = FilePart::new("file", "x", vec![]).with_mime_type("not a mime");
        assert!(matches!(part.to_form(), Err(ApiError::InvalidRequest(_))));
    }

    proptest! {
        #[test]
        fn prop_query_opt_keeps_only_present_values(values in proptest::collection::vec(proptest::option::of(0i64..1000), 0..8)) {
            let request = values.iter().enumerate().fold(
                ApiRequest::new(HttpMethod::Get, "/admin/news", Access::Protected),
                |request, (i, value)| request.query_opt(format!("k{i}"), *value),
            );

            let expected: Vec<(String, String)> = values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (format!("k{i}"), v.to_string())))
                .collect();
            prop_assert_eq!(request.query_pairs(), expected.as_slice());
        }
    }
}
