//! # Newsdesk Session & Credentials
//!
//! Session ownership for the newsdesk admin client.
//!
//! This crate provides:
//! - [`Session`] and [`TokenPair`], the client-side authentication state
//! - [`SessionHandle`], the owned, shareable session with a defined
//!   lifecycle (load → login/refresh → sign-out/expire)
//! - [`CredentialStore`](providers::CredentialStore), the durable key/value
//!   contract, with an on-disk implementation and an in-memory mock
//!
//! ## Example
//!
//! ```
//! use newsdesk_auth::mocks::MockCredentialStore;
//! use newsdesk_auth::{Role, SessionHandle, TokenPair, UserSummary};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), newsdesk_auth::AuthError> {
//! let store = MockCredentialStore::new();
//! let session = SessionHandle::load(Arc::new(store.clone()))?;
//! session.set_auth(UserSummary::new("admin", Role::Admin), TokenPair::new("T1", "R1"))?;
//!
//! // A restart reloads the same session from the store
//! let reloaded = SessionHandle::load(Arc::new(store))?;
//! assert_eq!(reloaded.access_token().as_deref(), Some("T1"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

// Public modules
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod providers;
pub mod session;
pub mod state;
pub mod stores;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{AuthError, Result};
pub use session::SessionHandle;
pub use state::{Role, Session, SessionStatus, TokenPair, UserSummary};
