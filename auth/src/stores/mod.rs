//! Storage implementations for the session.
//!
//! - **File Store** - JSON document on disk, survives restarts

pub mod file;

// Re-exports
pub use file::FileCredentialStore;
