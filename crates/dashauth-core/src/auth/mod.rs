//! Credential storage for the dashboard bearer token.
//!
//! This module provides:
//! - `CredentialStore`: synchronous get/set/clear of the single active token
//! - `TokenStorage`: the durable storage capability behind it, with
//!   `KeyringStorage`, `FileStorage` and `MemoryStorage` implementations
//!
//! The backend is chosen when the store is built; storage failures never
//! reach callers.

pub mod credentials;
pub mod storage;

pub use credentials::CredentialStore;
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, TokenStorage};
