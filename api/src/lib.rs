//! # Newsdesk API Client
//!
//! Authenticated REST client for the newsdesk news and ads backend.
//!
//! ## Example
//!
//! ```no_run
//! use newsdesk_api::{AuthenticatedHttpClient, ClientConfig, PageRequest};
//! use newsdesk_auth::{SessionHandle, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Session persisted under ~/.newsdesk/credentials.json
//!     let store = StoreConfig::from_env().open();
//!     let session = Arc::new(SessionHandle::load(Arc::new(store))?);
//!
//!     let client = AuthenticatedHttpClient::new(ClientConfig::from_env()?, session)?;
//!     client.auth().login("admin", "admin").await?;
//!
//!     // Protected call; an expired token is refreshed transparently
//!     let tags = client.tags().list(PageRequest::default()).await?;
//!     println!("{} tags", tags.total_elements);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Bearer token attached to every protected request
//! - Refresh-and-retry on 401, at most one refresh in flight
//! - Queued requests woken in FIFO order when the refresh settles
//! - Explicit access and response shape per endpoint
//! - Typed facades for every admin and public resource

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod client;
pub mod config;
pub mod error;
pub mod refresh;
pub mod request;
pub mod resources;
pub mod response;

// Re-export main types for convenience
pub use client::AuthenticatedHttpClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use refresh::RefreshFailure;
pub use request::{Access, ApiRequest, FilePart, HttpMethod, RequestBody};
pub use response::{ApiResponse, Envelope, Page, PageRequest};
