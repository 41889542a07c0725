//! The reconciliation state machine.
//!
//! Pure decision logic: compares the locally cached session against whatever
//! the shared credential store currently holds and proposes one transition.
//! Performs no I/O and cannot fail; callers apply the returned [`Intent`]
//! through the session store and credential adapter.

use crate::credentials::CredentialBundle;
use crate::session::{Method, SessionState};

/// Result of the companion-app reachability probe, as seen by the reconciler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanionGate {
    /// Platform without a companion-app architecture; no gating.
    NotRequired,
    /// The companion app answered the URL-scheme probe.
    Installed,
    /// The probe failed or the app is missing; reconciliation must not
    /// destroy session state during this window.
    NotInstalled,
}

/// A proposed session transition. Applied by the caller, never here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Local and external state already agree.
    None,
    /// Nobody is signed in anywhere; settle into guest mode.
    GoGuest,
    /// The shared store was emptied while we were signed in.
    Logout,
    /// The shared store holds credentials and we have none.
    Login(CredentialBundle),
    /// A different account took over the shared store.
    SwitchAccount(CredentialBundle),
}

/// Decide the transition for one reconciliation pass.
///
/// The companion gate is applied first: while the companion app is not
/// installed the shared store is not authoritative (an app-store reinstall
/// or app kill empties it transiently), so no destructive intent is emitted.
///
/// A session paired manually never wrote to the shared store, so an empty
/// store says nothing about it and must not sign it out. A *different*
/// account appearing in the store still wins over a manual session.
pub fn reconcile(
    local: &SessionState,
    external: Option<&CredentialBundle>,
    gate: CompanionGate,
) -> Intent {
    if gate == CompanionGate::NotInstalled {
        return Intent::None;
    }

    match external {
        None => {
            if local.is_signed() {
                if local.method == Some(Method::Manually) {
                    Intent::None
                } else {
                    Intent::Logout
                }
            } else {
                Intent::GoGuest
            }
        }
        Some(bundle) => {
            if !local.is_signed() {
                Intent::Login(bundle.clone())
            } else if local.identity() == bundle.identity() {
                Intent::None
            } else {
                Intent::SwitchAccount(bundle.clone())
            }
        }
    }
}
