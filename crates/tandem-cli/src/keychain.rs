//! OS keyring adapters backing the core storage traits.

use keyring::Entry;

use tandem_core::error::{Error, Result};
use tandem_core::source::SecretReader;
use tandem_core::store::{CredentialStore, StoredCredentials, CREDENTIALS_KEY};

const KEYRING_SERVICE_NAME: &str = "tandem";

/// Reads shared credential fields from the keychain access group the master
/// app writes into.
#[derive(Debug, Clone)]
pub struct KeyringSecretReader {
    access_group: String,
}

impl KeyringSecretReader {
    pub fn new(access_group: impl Into<String>) -> Self {
        Self {
            access_group: access_group.into(),
        }
    }
}

impl SecretReader for KeyringSecretReader {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.access_group, key)
            .map_err(|error| Error::SecureStorage(error.to_string()))?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::SecureStorage(error.to_string())),
        }
    }
}

/// Local credential record persisted in this app's own keyring service.
#[derive(Debug, Clone, Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    fn entry() -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, CREDENTIALS_KEY)
            .map_err(|error| Error::SecureStorage(error.to_string()))
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        match Self::entry()?.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::SecureStorage(error.to_string())),
        }
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        Self::entry()?
            .set_password(&raw)
            .map_err(|error| Error::SecureStorage(error.to_string()))
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::SecureStorage(error.to_string())),
        }
    }
}
