//! Storage providers.
//!
//! The session depends on these traits, never on a concrete backend, so the
//! same code runs against an on-disk store in the CLI and an in-memory mock
//! in tests.

pub mod credential_store;

pub use credential_store::{CredentialKey, CredentialStore};
