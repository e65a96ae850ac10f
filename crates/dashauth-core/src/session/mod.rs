//! Reactive session state for the dashboard.
//!
//! This module provides:
//! - `SessionClient`: login/logout/check_auth and decorated requests
//! - `SessionState`: the observable authentication snapshot
//! - `SessionWatcher`: read-only subscription handed to UI surfaces

pub mod client;
pub mod state;

pub use client::SessionClient;
pub use state::{SessionState, SessionWatcher};
