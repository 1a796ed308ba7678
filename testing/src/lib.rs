//! # Newsdesk Testing
//!
//! Testing utilities for the newsdesk client crates.
//!
//! This crate provides:
//! - [`MockBackend`], a wiremock server that speaks the newsdesk auth
//!   protocol: it issues token pairs, rotates them on refresh, and rejects
//!   stale bearer tokens with 401
//! - JSON [`fixtures`] in the backend's wire shapes
//! - Session helpers built on the in-memory credential store
//!
//! ## Example
//!
//! ```ignore
//! use newsdesk_testing::{MockBackend, fixtures, signed_in_session};
//!
//! #[tokio::test]
//! async fn test_expired_token_is_refreshed() {
//!     let backend = MockBackend::start().await;
//!     backend.mount_refresh("R1", "T2", "R2").await;
//!     backend.mount_protected("GET", "/admin/tags", fixtures::page(vec![], 0)).await;
//!
//!     let (session, _store) = signed_in_session("T1", "R1");
//!     let client = AuthenticatedHttpClient::new(ClientConfig::new(backend.uri()), session)?;
//!
//!     client.tags().list(PageRequest::default()).await?;
//!     assert_eq!(backend.refresh_calls(), 1);
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod backend;
pub mod fixtures;

pub use backend::MockBackend;

use newsdesk_auth::mocks::MockCredentialStore;
use newsdesk_auth::{Role, SessionHandle, TokenPair, UserSummary};
use std::sync::Arc;

/// An empty, signed-out session over a fresh in-memory store.
///
/// # Panics
///
/// Never in practice: the in-memory store cannot fail to load.
#[must_use]
#[allow(clippy::expect_used)]
pub fn anonymous_session() -> (Arc<SessionHandle>, MockCredentialStore) {
    let store = MockCredentialStore::new();
    let session = SessionHandle::load(Arc::new(store.clone()))
        .expect("in-memory store always loads");
    (Arc::new(session), store)
}

/// A session signed in as `admin` holding `access` / `refresh`.
///
/// # Panics
///
/// Never in practice: the in-memory store accepts every write.
#[must_use]
#[allow(clippy::expect_used)]
pub fn signed_in_session(access: &str, refresh: &str) -> (Arc<SessionHandle>, MockCredentialStore) {
    let (session, store) = anonymous_session();
    session
        .set_auth(
            UserSummary::new("admin", Role::Admin),
            TokenPair::new(access, refresh),
        )
        .expect("in-memory store accepts writes");
    (session, store)
}

/// Install a test-scoped tracing subscriber.
///
/// Honours `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk=debug,newsdesk_api=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
