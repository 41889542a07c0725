//! tandem-core - Core library for Tandem
//!
//! This crate contains the credential model, external auth source readers,
//! the reconciliation state machine, and the lifecycle trigger shared by
//! the Tandem shells.
//!
//! The flow: a [`lifecycle::RecheckTrigger`] watches app foreground edges and
//! schedules debounced check requests; a [`checker::AuthChecker`] consumes
//! them, reads the platform shared credential store through an
//! [`source::AuthSource`], runs [`reconcile::reconcile`] against the local
//! [`session::SessionStore`], and applies the resulting
//! [`reconcile::Intent`].

pub mod checker;
pub mod companion;
pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod reconcile;
pub mod session;
pub mod source;
pub mod store;

pub use checker::{AuthChecker, AuthEvent};
pub use credentials::CredentialBundle;
pub use error::{Error, Result};
pub use reconcile::{reconcile, CompanionGate, Intent};
pub use session::{Method, SessionState, SessionStore, Stage};
