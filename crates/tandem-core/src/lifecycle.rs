//! Foreground-edge watcher and debounced recheck trigger.
//!
//! OS resume jitter can deliver several activity flips in quick succession,
//! so the trigger waits out a short platform-tuned delay before requesting a
//! reconciliation pass. A new edge, or leaving the active phase, cancels and
//! replaces the pending timer; at most one request is ever pending.
//!
//! Every request carries a generation id. The consumer side discards
//! requests whose generation is no longer current, so a timer fire that
//! raced with a newer trigger is ignored rather than applied late.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Resume debounce tuned per platform: iOS resumes fast, Android needs
/// longer for the shared store to settle after the master app writes it.
pub const IOS_RECHECK_DELAY: Duration = Duration::from_millis(100);
pub const ANDROID_RECHECK_DELAY: Duration = Duration::from_millis(300);

/// OS-reported app activity phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Inactive,
    Background,
}

/// One scheduled reconciliation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckRequest {
    pub generation: u64,
}

/// Producer half: feed it phase transitions, it emits debounced requests.
#[derive(Debug)]
pub struct RecheckTrigger {
    delay: Duration,
    phase: Phase,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<CheckRequest>,
}

/// Consumer half: receives requests, dropping any that went stale.
#[derive(Debug)]
pub struct CheckRequests {
    rx: mpsc::UnboundedReceiver<CheckRequest>,
    generation: Arc<AtomicU64>,
}

impl RecheckTrigger {
    pub fn new(delay: Duration) -> (Self, CheckRequests) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        let trigger = Self {
            delay,
            phase: Phase::Active,
            generation: Arc::clone(&generation),
            pending: None,
            tx,
        };
        (trigger, CheckRequests { rx, generation })
    }

    /// Feed the next OS activity phase. Only the
    /// {inactive, background} → active edge schedules a check; every other
    /// transition cancels whatever is pending.
    pub fn phase_changed(&mut self, next: Phase) {
        if self.phase != Phase::Active && next == Phase::Active {
            self.schedule();
        } else {
            self.cancel_pending();
        }
        self.phase = next;
    }

    /// Request a check immediately, skipping the debounce. Cancels any
    /// pending timer and supersedes earlier requests.
    pub fn check_now(&mut self) {
        self.cancel_pending();
        let generation = self.bump();
        let _ = self.tx.send(CheckRequest { generation });
    }

    fn schedule(&mut self) {
        self.cancel_pending();
        let generation = self.bump();
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(CheckRequest { generation });
        }));
        tracing::debug!("Scheduled recheck (generation {generation}) in {delay:?}");
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for RecheckTrigger {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl CheckRequests {
    /// Receive the next current request. Requests carrying a superseded
    /// generation are dropped silently; `None` means the trigger is gone.
    pub async fn recv(&mut self) -> Option<CheckRequest> {
        while let Some(request) = self.rx.recv().await {
            if self.is_current(request) {
                return Some(request);
            }
            tracing::debug!(
                "Discarding stale check request (generation {})",
                request.generation
            );
        }
        None
    }

    pub fn is_current(&self, request: CheckRequest) -> bool {
        request.generation == self.generation.load(Ordering::SeqCst)
    }
}
