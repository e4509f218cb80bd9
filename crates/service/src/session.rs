//! Process-wide session state with a single writer.
//!
//! `SessionStore` owns the mutable `AuthState`; guards and shells observe it
//! through `watch` receivers and re-evaluate on every change. Completions of
//! superseded attempts are dropped by comparing the epoch captured when the
//! attempt began against the store's current epoch.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::auth::domain::AuthUser;

/// Snapshot of the authenticated session as consumers see it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    /// Applications start loading: the stored token (if any) has not been
    /// resolved yet, so nothing may render and nothing may redirect.
    fn default() -> Self {
        Self { user: None, is_loading: true, error: None }
    }
}

impl AuthState {
    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct SessionStore {
    tx: watch::Sender<AuthState>,
    epoch: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx, epoch: AtomicU64::new(0) }
    }

    pub fn snapshot(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Mark a submission as in flight. Returns the epoch token the eventual
    /// completion must present, or `None` when another submission (or the
    /// initial resolution) is still pending — callers drop the attempt.
    pub fn try_begin(&self) -> Option<u64> {
        let mut started = None;
        self.tx.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error = None;
            started = Some(self.epoch());
            true
        });
        started
    }

    /// Epoch token for the initial resolution, which runs against the
    /// store's starting loading state.
    pub fn begin_initial(&self) -> u64 {
        self.epoch()
    }

    /// Publish a resolved user. Returns whether the write was accepted, so
    /// the caller can tie side effects (like storing the credential) to the
    /// same epoch check; completions from superseded attempts are discarded.
    pub fn set_user(&self, epoch: u64, user: AuthUser) -> bool {
        if self.stale(epoch) {
            return false;
        }
        self.tx.send_replace(AuthState { user: Some(user), is_loading: false, error: None });
        true
    }

    /// Resolution finished without a session (no token, expired token).
    pub fn set_absent(&self, epoch: u64) {
        if self.stale(epoch) {
            return;
        }
        self.tx.send_replace(AuthState { user: None, is_loading: false, error: None });
    }

    pub fn set_error(&self, epoch: u64, message: impl Into<String>) {
        if self.stale(epoch) {
            return;
        }
        self.tx.send_replace(AuthState { user: None, is_loading: false, error: Some(message.into()) });
    }

    /// Drop the session and invalidate any in-flight completion.
    pub fn clear_user(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.tx.send_replace(AuthState { user: None, is_loading: false, error: None });
    }

    fn stale(&self, epoch: u64) -> bool {
        let stale = epoch != self.epoch();
        if stale {
            debug!(presented = epoch, current = self.epoch(), "discarding stale session completion");
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::Role;
    use uuid::Uuid;

    fn user(role: Role) -> AuthUser {
        AuthUser { id: Uuid::new_v4(), email: "a@b.com".into(), name: "A".into(), role }
    }

    #[tokio::test]
    async fn starts_loading_with_no_user() {
        let store = SessionStore::new();
        let state = store.snapshot();
        assert!(state.is_loading);
        assert!(state.user.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn initial_resolution_populates_user() {
        let store = SessionStore::new();
        let epoch = store.begin_initial();
        store.set_user(epoch, user(Role::Tenant));
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.user.unwrap().role, Role::Tenant);
    }

    #[tokio::test]
    async fn second_submission_while_loading_is_ignored() {
        let store = SessionStore::new();
        store.set_absent(store.begin_initial());

        let first = store.try_begin();
        assert!(first.is_some());
        assert!(store.try_begin().is_none());

        store.set_user(first.unwrap(), user(Role::Landlord));
        assert!(store.try_begin().is_some());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let store = SessionStore::new();
        store.set_absent(store.begin_initial());

        let epoch = store.try_begin().unwrap();
        // User navigates away / logs out before the call returns
        store.clear_user();
        assert!(!store.set_user(epoch, user(Role::Tenant)));

        assert!(store.snapshot().user.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        let epoch = store.begin_initial();
        store.set_user(epoch, user(Role::Admin));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().user.as_ref().unwrap().role, Role::Admin);

        store.clear_user();
        rx.changed().await.unwrap();
        assert!(rx.borrow().user.is_none());
    }

    #[tokio::test]
    async fn error_clears_user_and_loading() {
        let store = SessionStore::new();
        store.set_absent(store.begin_initial());
        let epoch = store.try_begin().unwrap();
        store.set_error(epoch, "invalid credentials");
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some("invalid credentials"));
    }
}
