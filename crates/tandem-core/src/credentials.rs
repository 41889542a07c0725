//! Credential bundle published through the platform shared credential store.
//!
//! The master app writes up to eight named string fields; readers normalize
//! whatever subset is present into a [`CredentialBundle`] or decide the store
//! is empty. A bundle only exists with a non-empty access token and client
//! key; the remaining fields fall back to fixed defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field names as stored in the shared credential store.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const CLIENT_KEY_KEY: &str = "client_key";
pub const SHARE_URL_KEY: &str = "share_url";
pub const SOCKET_URL_KEY: &str = "socket_url";
pub const SYS_URL_KEY: &str = "sys_url";
pub const INTERCOM_TOKEN_KEY: &str = "intercom_token";
pub const FIREBASE_TOKEN_KEY: &str = "firebase_token";
pub const SYSTEM_KEY: &str = "system";

pub const DEFAULT_SHARE_URL: &str = "https://share-main.basecdn.net";
pub const DEFAULT_SOCKET_URL: &str = "wss://socket-00.basecdn.net:1310";
pub const DEFAULT_SYS_URL: &str = "base.vn";

/// A normalized credential bundle read from the shared credential store.
///
/// Invariant: `access_token` and `client_key` are non-empty; optional fields
/// hold their documented defaults when the source left them blank.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    pub access_token: String,
    pub client_key: String,
    pub share_url: String,
    pub socket_url: String,
    pub sys_url: String,
    pub intercom_token: String,
    pub firebase_token: String,
    pub system: String,
}

impl CredentialBundle {
    /// The `(access_token, client_key, sys_url)` triple identifying the
    /// logical session. Any single-field drift means a different account or
    /// server and must force a full account switch, not a token refresh.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.access_token, &self.client_key, &self.sys_url)
    }

    pub fn same_identity(&self, access_token: &str, client_key: &str, sys_url: &str) -> bool {
        self.identity() == (access_token, client_key, sys_url)
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CredentialBundle")
            .field("access_token", &"[REDACTED]")
            .field("client_key", &self.client_key)
            .field("share_url", &self.share_url)
            .field("socket_url", &self.socket_url)
            .field("sys_url", &self.sys_url)
            .field("intercom_token", &"[REDACTED]")
            .field("firebase_token", &"[REDACTED]")
            .field("system", &self.system)
            .finish()
    }
}

/// Raw fields as read from a platform source, before normalization.
///
/// Every field is optional; aggregate readers deserialize the native payload
/// straight into this shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredentials {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
    #[serde(default)]
    pub socket_url: Option<String>,
    #[serde(default)]
    pub sys_url: Option<String>,
    #[serde(default)]
    pub intercom_token: Option<String>,
    #[serde(default)]
    pub firebase_token: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
}

impl RawCredentials {
    /// Normalize raw fields into a bundle, or `None` when the store should
    /// be treated as empty (missing/blank access token or client key).
    pub fn normalize(self) -> Option<CredentialBundle> {
        let access_token = non_empty(self.access_token)?;
        let client_key = non_empty(self.client_key)?;

        Some(CredentialBundle {
            access_token,
            client_key,
            share_url: or_default(self.share_url, DEFAULT_SHARE_URL),
            socket_url: or_default(self.socket_url, DEFAULT_SOCKET_URL),
            sys_url: or_default(self.sys_url, DEFAULT_SYS_URL),
            intercom_token: or_default(self.intercom_token, ""),
            firebase_token: or_default(self.firebase_token, ""),
            system: or_default(self.system, ""),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn raw_with_tokens() -> RawCredentials {
        RawCredentials {
            access_token: Some("token-a".to_string()),
            client_key: Some("key-k".to_string()),
            ..RawCredentials::default()
        }
    }

    #[test]
    fn normalize_rejects_missing_access_token() {
        let raw = RawCredentials {
            access_token: None,
            client_key: Some("key-k".to_string()),
            ..RawCredentials::default()
        };
        assert_eq!(raw.normalize(), None);
    }

    #[test]
    fn normalize_rejects_empty_client_key() {
        let raw = RawCredentials {
            access_token: Some("token-a".to_string()),
            client_key: Some(String::new()),
            ..RawCredentials::default()
        };
        assert_eq!(raw.normalize(), None);
    }

    #[test]
    fn normalize_applies_documented_defaults() {
        let bundle = raw_with_tokens().normalize().unwrap();
        assert_eq!(bundle.share_url, DEFAULT_SHARE_URL);
        assert_eq!(bundle.socket_url, DEFAULT_SOCKET_URL);
        assert_eq!(bundle.sys_url, DEFAULT_SYS_URL);
        assert_eq!(bundle.intercom_token, "");
        assert_eq!(bundle.firebase_token, "");
        assert_eq!(bundle.system, "");
    }

    #[test]
    fn normalize_defaults_blank_optional_fields() {
        let raw = RawCredentials {
            share_url: Some(String::new()),
            sys_url: Some("work.example.vn".to_string()),
            ..raw_with_tokens()
        };
        let bundle = raw.normalize().unwrap();
        assert_eq!(bundle.share_url, DEFAULT_SHARE_URL);
        assert_eq!(bundle.sys_url, "work.example.vn");
    }

    #[test]
    fn identity_triple_ignores_other_fields() {
        let mut left = raw_with_tokens().normalize().unwrap();
        let mut right = left.clone();
        right.firebase_token = "push-token".to_string();
        right.system = "Acme".to_string();
        assert_eq!(left.identity(), right.identity());

        left.sys_url = "other.vn".to_string();
        assert_ne!(left.identity(), right.identity());
    }

    #[test]
    fn debug_redacts_tokens() {
        let mut bundle = raw_with_tokens().normalize().unwrap();
        bundle.intercom_token = "intercom-secret".to_string();
        let rendered = format!("{bundle:?}");
        assert!(!rendered.contains("token-a"));
        assert!(!rendered.contains("intercom-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
