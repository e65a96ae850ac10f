//! Session client: owns the validation state machine.
//!
//! `check_auth`, `login` and `logout` are the only operations that publish
//! a new `SessionState`. Each await is followed by exactly one state write,
//! so overlapping validations never interleave halfway; when two overlap,
//! whichever settles last wins.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{SessionState, SessionWatcher};
use crate::api::{ApiClient, ApiError, AuthMeResponse, RequestOptions};
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::utils::mask_token;

/// Shared session handle. Clone is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct SessionClient {
    api: ApiClient,
    credentials: Arc<CredentialStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionClient {
    /// Build a session client from configuration, opening the configured token storage
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = CredentialStore::new(config.build_storage()?);
        Self::new(config, Arc::new(store))
    }

    pub fn new(config: &Config, credentials: Arc<CredentialStore>) -> Result<Self> {
        let api = ApiClient::new(&config.api_base, credentials.clone(), config.request_timeout())?;
        Ok(Self::with_api(api))
    }

    /// Wrap an existing API client; the session uses its credential store
    pub fn with_api(api: ApiClient) -> Self {
        let credentials = api.credentials().clone();
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            api,
            credentials,
            state: Arc::new(state),
        }
    }

    /// Latest published state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher::new(self.state.subscribe())
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Decorated request for callers outside the validation flow.
    /// A 401 clears the stored token but does not touch the published state.
    pub async fn authenticated_request<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.api.authenticated_request(endpoint, options).await
    }

    /// Validate the stored token against the backend and publish the outcome.
    ///
    /// Without a stored token this resolves locally, no request is sent. Every
    /// failure kind lands in the same unauthenticated state as "never logged in".
    pub async fn check_auth(&self) -> bool {
        self.state.send_modify(|state| *state = state.loading());

        let Some(token) = self.credentials.get() else {
            debug!("No stored token, skipping validation");
            self.publish(SessionState::unauthenticated());
            return false;
        };

        debug!(token = %mask_token(&token), "Validating token");
        let next = match self.api.auth_status().await {
            Ok(resp) => Self::state_from_response(resp),
            Err(e) => {
                debug!(error = %e, "Token validation failed");
                SessionState::unauthenticated()
            }
        };

        let authenticated = next.is_authenticated;
        self.publish(next);
        authenticated
    }

    /// Store a token and validate it. Never assumes success up front.
    pub async fn login(&self, token: &str) -> bool {
        info!(token = %mask_token(token), "Logging in");
        self.credentials.set(token);
        self.check_auth().await
    }

    /// Drop the token and go straight to the unauthenticated state.
    pub fn logout(&self) {
        info!("Logging out");
        self.credentials.clear();
        self.publish(SessionState::unauthenticated());
    }

    /// The backend's answer, published as-is
    fn state_from_response(resp: AuthMeResponse) -> SessionState {
        SessionState {
            is_authenticated: resp.is_authenticated,
            user_id: Some(resp.user_id),
            is_loading: false,
        }
    }

    fn publish(&self, state: SessionState) {
        debug!(
            authenticated = state.is_authenticated,
            user_id = state.user_id.as_deref().unwrap_or("-"),
            "Session state updated"
        );
        self.state.send_replace(state);
    }
}
