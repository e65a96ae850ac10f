//! Session management for a token-gated dashboard.
//!
//! A `SessionClient` keeps the dashboard bearer token in a `CredentialStore`,
//! validates it against the backend's `/auth/me` endpoint and publishes the
//! result as a `SessionState` that any number of consumers can watch.

pub mod api;
pub mod auth;
pub mod config;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError, AuthMeResponse, RequestOptions};
pub use auth::{CredentialStore, FileStorage, KeyringStorage, MemoryStorage, TokenStorage};
pub use config::{Config, StorageBackend};
pub use session::{SessionClient, SessionState, SessionWatcher};
