//! Per-key shared credential reader (iOS-style keychain access).

use crate::credentials::{
    CredentialBundle, RawCredentials, ACCESS_TOKEN_KEY, CLIENT_KEY_KEY, FIREBASE_TOKEN_KEY,
    INTERCOM_TOKEN_KEY, SHARE_URL_KEY, SOCKET_URL_KEY, SYSTEM_KEY, SYS_URL_KEY,
};
use crate::error::Result;
use crate::source::AuthSource;

/// Keychain access group shared with the master app.
pub const DEFAULT_ACCESS_GROUP: &str = "ZKH63VCT4Y.share.access.token";

/// One key/value lookup against a secure store scoped by an access group.
///
/// Implemented over the OS keyring by the shells; tests use an in-memory
/// map. A missing key is `Ok(None)`, not an error.
pub trait SecretReader {
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Reads the eight credential fields one key at a time.
#[derive(Debug, Clone)]
pub struct KeyedAuthSource<R: SecretReader> {
    reader: R,
}

impl<R: SecretReader> KeyedAuthSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_raw(&self) -> Result<RawCredentials> {
        Ok(RawCredentials {
            access_token: self.reader.get(ACCESS_TOKEN_KEY)?,
            client_key: self.reader.get(CLIENT_KEY_KEY)?,
            share_url: self.reader.get(SHARE_URL_KEY)?,
            socket_url: self.reader.get(SOCKET_URL_KEY)?,
            sys_url: self.reader.get(SYS_URL_KEY)?,
            intercom_token: self.reader.get(INTERCOM_TOKEN_KEY)?,
            firebase_token: self.reader.get(FIREBASE_TOKEN_KEY)?,
            system: self.reader.get(SYSTEM_KEY)?,
        })
    }
}

impl<R: SecretReader> AuthSource for KeyedAuthSource<R> {
    async fn read(&self) -> Option<CredentialBundle> {
        match self.read_raw() {
            Ok(raw) => raw.normalize(),
            Err(error) => {
                tracing::warn!("Shared credential read failed, treating as empty: {error}");
                None
            }
        }
    }
}
