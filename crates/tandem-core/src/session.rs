//! Local session state and its single-writer store.
//!
//! The session value is only ever mutated through [`SessionStore`]'s
//! transition entry points; the reconciler reads it and proposes transitions
//! but never writes it directly.

use std::fmt;

use crate::credentials::{CredentialBundle, DEFAULT_SHARE_URL, DEFAULT_SOCKET_URL, DEFAULT_SYS_URL};

/// Lifecycle stage of the local session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Process start, before the first reconciliation pass.
    Initial,
    /// Known to be signed out (guest).
    Unsigned,
    /// Signed in with a credential bundle.
    Signed,
    /// A previously valid token was rejected upstream.
    Expired,
}

/// How the current session was established.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Paired by hand inside this app; never written to the shared store.
    Manually,
    /// Picked up automatically from the shared credential store.
    Auto,
}

/// The locally cached session, mirroring the last applied credential bundle.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    pub stage: Stage,
    pub method: Option<Method>,
    pub access_token: String,
    pub client_key: String,
    pub share_url: String,
    pub socket_url: String,
    pub sys_url: String,
    pub intercom_token: String,
    pub firebase_token: String,
    pub system: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            stage: Stage::Initial,
            method: None,
            access_token: String::new(),
            client_key: String::new(),
            share_url: DEFAULT_SHARE_URL.to_string(),
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            sys_url: DEFAULT_SYS_URL.to_string(),
            intercom_token: String::new(),
            firebase_token: String::new(),
            system: String::new(),
        }
    }
}

impl SessionState {
    pub fn is_signed(&self) -> bool {
        self.stage == Stage::Signed
    }

    /// Identity triple of the cached session, compared against external
    /// bundles during reconciliation.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.access_token, &self.client_key, &self.sys_url)
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionState")
            .field("stage", &self.stage)
            .field("method", &self.method)
            .field("access_token", &"[REDACTED]")
            .field("client_key", &self.client_key)
            .field("sys_url", &self.sys_url)
            .field("system", &self.system)
            .finish_non_exhaustive()
    }
}

/// Single writer of [`SessionState`].
///
/// Transition entry points mirror the four reconciliation intents plus the
/// token-expiry reset; nothing else mutates the state.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply a login or account switch: stage becomes `Signed` and the
    /// bundle's fields replace the cached copies.
    pub fn set_signed_in(&mut self, bundle: &CredentialBundle, method: Method) {
        self.state = SessionState {
            stage: Stage::Signed,
            method: Some(method),
            access_token: bundle.access_token.clone(),
            client_key: bundle.client_key.clone(),
            share_url: bundle.share_url.clone(),
            socket_url: bundle.socket_url.clone(),
            sys_url: bundle.sys_url.clone(),
            intercom_token: bundle.intercom_token.clone(),
            firebase_token: bundle.firebase_token.clone(),
            system: bundle.system.clone(),
        };
    }

    /// Apply a logout or go-guest: back to defaults, stage `Unsigned`.
    pub fn set_signed_out(&mut self) {
        self.state = SessionState {
            stage: Stage::Unsigned,
            ..SessionState::default()
        };
    }

    /// The upstream API rejected the token: defaults with stage `Expired`.
    pub fn set_expired(&mut self) {
        self.state = SessionState {
            stage: Stage::Expired,
            ..SessionState::default()
        };
    }

    /// Full reset to the process-start state.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bundle() -> CredentialBundle {
        CredentialBundle {
            access_token: "token-a".to_string(),
            client_key: "key-k".to_string(),
            share_url: DEFAULT_SHARE_URL.to_string(),
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            sys_url: "acme.base.vn".to_string(),
            intercom_token: String::new(),
            firebase_token: String::new(),
            system: "Acme".to_string(),
        }
    }

    #[test]
    fn starts_in_initial_stage() {
        let store = SessionStore::default();
        assert_eq!(store.state().stage, Stage::Initial);
        assert_eq!(store.state().method, None);
        assert!(!store.state().is_signed());
    }

    #[test]
    fn signed_in_copies_bundle_fields() {
        let mut store = SessionStore::default();
        store.set_signed_in(&bundle(), Method::Auto);
        assert_eq!(store.state().stage, Stage::Signed);
        assert_eq!(store.state().method, Some(Method::Auto));
        assert_eq!(store.state().identity(), ("token-a", "key-k", "acme.base.vn"));
        assert_eq!(store.state().system, "Acme");
    }

    #[test]
    fn signed_out_restores_defaults() {
        let mut store = SessionStore::default();
        store.set_signed_in(&bundle(), Method::Manually);
        store.set_signed_out();
        assert_eq!(store.state().stage, Stage::Unsigned);
        assert_eq!(store.state().method, None);
        assert_eq!(store.state().access_token, "");
        assert_eq!(store.state().sys_url, DEFAULT_SYS_URL);
    }

    #[test]
    fn expired_keeps_only_the_stage() {
        let mut store = SessionStore::default();
        store.set_signed_in(&bundle(), Method::Auto);
        store.set_expired();
        assert_eq!(store.state().stage, Stage::Expired);
        assert_eq!(store.state().access_token, "");
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut store = SessionStore::default();
        store.set_signed_in(&bundle(), Method::Auto);
        store.reset();
        assert_eq!(store.state(), &SessionState::default());
    }

    #[test]
    fn debug_redacts_access_token() {
        let mut store = SessionStore::default();
        store.set_signed_in(&bundle(), Method::Auto);
        let rendered = format!("{:?}", store.state());
        assert!(!rendered.contains("token-a"));
    }
}
