//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of the provider traits for use in unit
//! and integration tests across the workspace.

pub mod credential_store;

pub use credential_store::MockCredentialStore;
