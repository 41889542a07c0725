//! Aggregate shared credential reader (Android-style native auth module).
//!
//! One native call returns all credential fields as a single JSON payload.
//! The `system` field may itself be an embedded JSON object carrying the
//! workspace descriptor; only its `name` is kept.

use serde::Deserialize;

use crate::credentials::{CredentialBundle, RawCredentials};
use crate::error::Result;
use crate::source::AuthSource;

/// One aggregate fetch of the credential payload.
///
/// `Ok(None)` means the native side reported no signed-in account.
pub trait AggregateReader {
    fn fetch(&self) -> Result<Option<String>>;
}

/// Reads all credential fields through a single aggregate call.
#[derive(Debug, Clone)]
pub struct AggregateAuthSource<R: AggregateReader> {
    reader: R,
}

impl<R: AggregateReader> AggregateAuthSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn parse(payload: &str) -> Result<RawCredentials> {
        let mut raw: RawCredentials = serde_json::from_str(payload)?;
        if let Some(system) = raw.system.take() {
            raw.system = Some(extract_system_name(&system));
        }
        Ok(raw)
    }
}

impl<R: AggregateReader> AuthSource for AggregateAuthSource<R> {
    async fn read(&self) -> Option<CredentialBundle> {
        let payload = match self.reader.fetch() {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!("Aggregate credential fetch failed, treating as empty: {error}");
                return None;
            }
        };

        match Self::parse(&payload) {
            Ok(raw) => raw.normalize(),
            Err(error) => {
                tracing::warn!("Aggregate credential payload unreadable, treating as empty: {error}");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct SystemDescriptor {
    name: String,
}

/// The master app sometimes stores the whole workspace descriptor in the
/// `system` slot. Keep the raw value when it is not such an object.
fn extract_system_name(raw: &str) -> String {
    serde_json::from_str::<SystemDescriptor>(raw)
        .map_or_else(|_| raw.to_string(), |descriptor| descriptor.name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::Error;

    use super::*;

    struct FixedReader(Result<Option<String>>);

    impl AggregateReader for FixedReader {
        fn fetch(&self) -> Result<Option<String>> {
            match &self.0 {
                Ok(payload) => Ok(payload.clone()),
                Err(_) => Err(Error::SecureStorage("native module died".to_string())),
            }
        }
    }

    fn payload(system: &str) -> String {
        format!(
            r#"{{"access_token":"token-a","client_key":"key-k","sys_url":"acme.base.vn","system":{system}}}"#
        )
    }

    #[tokio::test]
    async fn reads_plain_payload() {
        let source = AggregateAuthSource::new(FixedReader(Ok(Some(payload("\"Acme\"")))));
        let bundle = source.read().await.unwrap();
        assert_eq!(bundle.identity(), ("token-a", "key-k", "acme.base.vn"));
        assert_eq!(bundle.system, "Acme");
    }

    #[tokio::test]
    async fn extracts_name_from_embedded_system_descriptor() {
        let embedded = r#""{\"name\":\"Acme Corp\",\"id\":42}""#;
        let source = AggregateAuthSource::new(FixedReader(Ok(Some(payload(embedded)))));
        let bundle = source.read().await.unwrap();
        assert_eq!(bundle.system, "Acme Corp");
    }

    #[tokio::test]
    async fn keeps_raw_system_when_descriptor_unparsable() {
        let source =
            AggregateAuthSource::new(FixedReader(Ok(Some(payload("\"not json at all\"")))));
        let bundle = source.read().await.unwrap();
        assert_eq!(bundle.system, "not json at all");
    }

    #[tokio::test]
    async fn empty_native_result_reads_as_empty_store() {
        let source = AggregateAuthSource::new(FixedReader(Ok(None)));
        assert_eq!(source.read().await, None);
    }

    #[tokio::test]
    async fn malformed_payload_reads_as_empty_store() {
        let source = AggregateAuthSource::new(FixedReader(Ok(Some("{broken".to_string()))));
        assert_eq!(source.read().await, None);
    }

    #[tokio::test]
    async fn native_failure_reads_as_empty_store() {
        let source = AggregateAuthSource::new(FixedReader(Err(Error::SecureStorage(
            "native module died".to_string(),
        ))));
        assert_eq!(source.read().await, None);
    }
}
