use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[cfg(feature = "ts")]
use ts_rs::TS;

/// Observable authentication snapshot.
///
/// `is_authenticated` implies `user_id.is_some()`. `is_loading` marks a
/// validation in flight; use `SessionWatcher::settled` to wait it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user_id: Option<String>,
    pub is_loading: bool,
}

impl SessionState {
    /// State before the first validation has run
    pub fn initial() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
            is_loading: true,
        }
    }

    /// Terminal "not logged in" state
    pub fn unauthenticated() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
            is_loading: false,
        }
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id.into()),
            is_loading: false,
        }
    }

    /// Same snapshot, marked as in flight
    pub fn loading(&self) -> Self {
        Self {
            is_loading: true,
            ..self.clone()
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Read-only subscription to the session state.
#[derive(Debug, Clone)]
pub struct SessionWatcher {
    rx: watch::Receiver<SessionState>,
}

impl SessionWatcher {
    pub(crate) fn new(rx: watch::Receiver<SessionState>) -> Self {
        Self { rx }
    }

    /// Latest snapshot, without waiting
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next published snapshot.
    /// Returns `None` once the session client has been dropped.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until no validation is in flight and return that snapshot.
    /// Returns `None` if the session client is dropped first.
    pub async fn settled(&mut self) -> Option<SessionState> {
        self.rx
            .wait_for(SessionState::is_settled)
            .await
            .ok()
            .map(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::initial();
        assert!(!state.is_authenticated);
        assert_eq!(state.user_id, None);
        assert!(state.is_loading);
        assert!(!state.is_settled());
        assert_eq!(SessionState::default(), state);
    }

    #[test]
    fn test_loading_keeps_fields() {
        let state = SessionState::authenticated("42").loading();
        assert!(state.is_authenticated);
        assert_eq!(state.user_id.as_deref(), Some("42"));
        assert!(state.is_loading);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(SessionState::authenticated("42")).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"isAuthenticated": true, "userId": "42", "isLoading": false})
        );

        let json = serde_json::to_value(SessionState::unauthenticated()).expect("serialize");
        assert_eq!(json["userId"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_watcher_settled_waits_for_final_state() {
        let (tx, rx) = watch::channel(SessionState::initial());
        let mut watcher = SessionWatcher::new(rx);

        let waiter = tokio::spawn(async move { watcher.settled().await });
        tx.send_replace(SessionState::authenticated("42"));

        let settled = waiter.await.expect("join");
        assert_eq!(settled, Some(SessionState::authenticated("42")));
    }

    #[tokio::test]
    async fn test_watcher_ends_when_sender_dropped() {
        let (tx, rx) = watch::channel(SessionState::initial());
        let mut watcher = SessionWatcher::new(rx);
        drop(tx);
        assert_eq!(watcher.changed().await, None);
        assert_eq!(watcher.settled().await, None);
        // Last value is still readable
        assert_eq!(watcher.current(), SessionState::initial());
    }
}
