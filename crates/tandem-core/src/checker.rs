//! Reconciliation passes and intent application.
//!
//! [`AuthChecker`] owns the session store and wires the external auth
//! source, the companion-app gate, and the persisted credential record into
//! one `run_check` pass: read external state, decide through
//! [`reconcile`], apply the intent, and notify observers.

use tokio::sync::mpsc;

use crate::companion::{CompanionApp, LinkOpener, NoLink};
use crate::credentials::CredentialBundle;
use crate::error::Result;
use crate::lifecycle::CheckRequests;
use crate::reconcile::{reconcile, CompanionGate, Intent};
use crate::session::{Method, SessionState, SessionStore};
use crate::source::AuthSource;
use crate::store::{CredentialStore, StoredCredentials};

/// Notifications emitted while applying intents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// A reconciliation pass is starting.
    StartCheck,
    /// A bundle was applied and the session is now signed in.
    LoggedIn(CredentialBundle),
    /// The session was signed out by reconciliation.
    LoggedOut,
    /// A different account took over; local caches were reset first.
    LoggedInOther(CredentialBundle),
}

/// Owns the session and applies reconciliation intents.
pub struct AuthChecker<A: AuthSource, C: CredentialStore, L: LinkOpener = NoLink> {
    source: A,
    credentials: C,
    companion: Option<CompanionApp<L>>,
    session: SessionStore,
    events: mpsc::UnboundedSender<AuthEvent>,
}

impl<A: AuthSource, C: CredentialStore> AuthChecker<A, C, NoLink> {
    /// Checker for platforms without a companion-app architecture.
    pub fn new(source: A, credentials: C, events: mpsc::UnboundedSender<AuthEvent>) -> Self {
        Self {
            source,
            credentials,
            companion: None,
            session: SessionStore::default(),
            events,
        }
    }
}

impl<A: AuthSource, C: CredentialStore, L: LinkOpener> AuthChecker<A, C, L> {
    /// Checker gated on the companion app's installation state.
    pub fn with_companion(
        source: A,
        credentials: C,
        companion: CompanionApp<L>,
        events: mpsc::UnboundedSender<AuthEvent>,
    ) -> Self {
        Self {
            source,
            credentials,
            companion: Some(companion),
            session: SessionStore::default(),
            events,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    /// Startup pass. With the companion app missing, fall back to the
    /// locally persisted record: a valid record signs in as manually paired,
    /// anything else settles into guest. Otherwise start from a clean slate
    /// and reconcile against the shared store.
    pub async fn start(&mut self) -> Result<()> {
        if let Some(companion) = &self.companion {
            if !companion.is_installed().await {
                let stored = self.credentials.load()?;
                if let Some(bundle) = stored
                    .filter(StoredCredentials::is_valid)
                    .as_ref()
                    .and_then(StoredCredentials::to_bundle)
                {
                    tracing::info!("Companion app missing; restoring manually paired session");
                    self.sign_in(&bundle, Method::Manually, AuthEvent::LoggedIn(bundle.clone()))?;
                    return Ok(());
                }
                self.credentials.clear()?;
                self.session.set_signed_out();
                return Ok(());
            }
        }
        self.credentials.clear()?;
        self.session.reset();
        self.run_check().await?;
        Ok(())
    }

    /// Rebuild the local session from the persisted record without emitting
    /// events, e.g. before an on-demand pass. A valid record restores a
    /// manually paired session; anything else leaves the state untouched.
    pub fn restore(&mut self) -> Result<()> {
        if let Some(bundle) = self
            .credentials
            .load()?
            .filter(StoredCredentials::is_valid)
            .as_ref()
            .and_then(StoredCredentials::to_bundle)
        {
            self.session.set_signed_in(&bundle, Method::Manually);
        }
        Ok(())
    }

    /// One reconciliation pass: read external state, decide, apply.
    pub async fn run_check(&mut self) -> Result<Intent> {
        self.emit(AuthEvent::StartCheck);
        let external = self.source.read().await;
        let gate = match &self.companion {
            Some(companion) => companion.gate().await,
            None => CompanionGate::NotRequired,
        };
        let intent = reconcile(self.session.state(), external.as_ref(), gate);
        tracing::debug!("Reconciliation decided {intent:?} (gate {gate:?})");
        self.apply(&intent)?;
        Ok(intent)
    }

    /// Consume debounced check requests until the trigger is dropped.
    /// Storage failures are logged, not fatal; the worst outcome of a failed
    /// pass is staying in the previous state until the next edge.
    pub async fn run_loop(mut self, mut requests: CheckRequests) {
        while let Some(request) = requests.recv().await {
            tracing::debug!("Reconciliation pass (generation {})", request.generation);
            if let Err(error) = self.run_check().await {
                tracing::warn!("Reconciliation pass failed: {error}");
            }
        }
    }

    fn apply(&mut self, intent: &Intent) -> Result<()> {
        match intent {
            Intent::None => {}
            Intent::GoGuest => {
                self.credentials.clear()?;
                self.session.set_signed_out();
            }
            Intent::Logout => {
                self.credentials.clear()?;
                self.session.set_signed_out();
                self.emit(AuthEvent::LoggedOut);
            }
            Intent::Login(bundle) => {
                self.sign_in(bundle, Method::Auto, AuthEvent::LoggedIn(bundle.clone()))?;
            }
            Intent::SwitchAccount(bundle) => {
                // Another account owns the shared store now: drop every local
                // cache before re-keying to the new bundle.
                self.credentials.clear()?;
                self.session.reset();
                self.sign_in(bundle, Method::Auto, AuthEvent::LoggedInOther(bundle.clone()))?;
            }
        }
        Ok(())
    }

    fn sign_in(&mut self, bundle: &CredentialBundle, method: Method, event: AuthEvent) -> Result<()> {
        self.persist(bundle)?;
        self.session.set_signed_in(bundle, method);
        self.emit(event);
        Ok(())
    }

    /// Persist the applied bundle, carrying over the client secret from the
    /// previous record when one exists.
    fn persist(&self, bundle: &CredentialBundle) -> Result<()> {
        let client_secret = self
            .credentials
            .load()?
            .map(|record| record.client_secret)
            .unwrap_or_default();
        self.credentials
            .save(&StoredCredentials::from_bundle(bundle, client_secret))
    }

    fn emit(&self, event: AuthEvent) {
        // Observers are optional; a closed channel is not an error.
        let _ = self.events.send(event);
    }
}
