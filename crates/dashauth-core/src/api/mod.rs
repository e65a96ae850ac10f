//! REST client for the dashboard backend.
//!
//! This module provides the `ApiClient`, which decorates every request with
//! the stored bearer token and maps responses onto `ApiError`. A 401 from
//! the backend clears the stored token before the error is returned.

pub mod client;
pub mod error;
pub mod models;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
pub use models::AuthMeResponse;
