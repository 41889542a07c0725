//! Readers for the platform shared credential store.
//!
//! Two incompatible native read strategies exist behind one logical
//! operation: iOS-style keychains serve the eight fields one key at a time
//! ([`keyed::KeyedAuthSource`]), Android's auth module returns them in a
//! single aggregate payload ([`aggregate::AggregateAuthSource`]). The shell
//! picks one at composition time.
//!
//! Reads never surface errors: any underlying fault is logged and treated as
//! an empty store, which fails safe toward "logged out".

pub mod aggregate;
pub mod keyed;

use crate::credentials::CredentialBundle;

pub use aggregate::{AggregateAuthSource, AggregateReader};
pub use keyed::{KeyedAuthSource, SecretReader};

/// One logical read of the shared credential store.
#[allow(async_fn_in_trait)]
pub trait AuthSource {
    /// Returns the normalized bundle, or `None` when the store is empty or
    /// unreadable.
    async fn read(&self) -> Option<CredentialBundle>;
}
