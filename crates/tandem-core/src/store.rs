//! Locally persisted credential record.
//!
//! One opaque record under a fixed storage key, holding the authoritative
//! local copy of whatever bundle was last applied. Written only by the
//! intent-applying layer; the reconciler never touches it.

use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialBundle, RawCredentials};
use crate::error::Result;

/// Storage key the record is persisted under.
pub const CREDENTIALS_KEY: &str = "credentials";

/// The persisted record layout. Field names are camelCase on disk for
/// compatibility with records written by earlier app versions.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    pub client_key: String,
    pub client_secret: String,
    pub access_token: String,
    pub sys_url: String,
    pub system_name: String,
    pub intercom_token: String,
}

impl StoredCredentials {
    /// Build the record from an applied bundle, carrying over the client
    /// secret (the shared store never holds it).
    pub fn from_bundle(bundle: &CredentialBundle, client_secret: impl Into<String>) -> Self {
        Self {
            client_key: bundle.client_key.clone(),
            client_secret: client_secret.into(),
            access_token: bundle.access_token.clone(),
            sys_url: bundle.sys_url.clone(),
            system_name: bundle.system.clone(),
            intercom_token: bundle.intercom_token.clone(),
        }
    }

    /// A record is usable only with a non-empty token and client key.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.client_key.is_empty()
    }

    /// Reconstruct a bundle for the manual sign-in fallback. URL fields the
    /// record does not carry take their defaults.
    pub fn to_bundle(&self) -> Option<CredentialBundle> {
        RawCredentials {
            access_token: Some(self.access_token.clone()),
            client_key: Some(self.client_key.clone()),
            intercom_token: Some(self.intercom_token.clone()),
            system: Some(self.system_name.clone()),
            ..RawCredentials::default()
        }
        .normalize()
    }
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StoredCredentials")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("sys_url", &self.sys_url)
            .field("system_name", &self.system_name)
            .field("intercom_token", &"[REDACTED]")
            .finish()
    }
}

/// Persistence for the local credential record.
///
/// Implemented over the OS keyring by the shells; tests use the in-memory
/// store below.
pub trait CredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>>;
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
