//! Debounced name validation pipeline
//!
//! Every change of the watched value gets a sequence number. The debouncer
//! collapses bursts of changes; when it fires, a lookup is spawned for the
//! last value. Lookups are never cancelled, but an outcome is only written to
//! the field if its sequence number is still the latest one issued.

use crate::debounce::Debouncer;
use crate::form::{SharedField, OCCUPIED};
use crate::query::{check_name, NameAvailability, NameCheckOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A value change waiting to be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub value: String,
    pub previous: String,
    /// Monotonic sequence captured when the change was observed
    pub seq: u64,
}

/// An outcome that was written to the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub seq: u64,
    pub value: String,
    pub outcome: NameCheckOutcome,
}

struct Shared {
    query: Arc<dyn NameAvailability>,
    field: SharedField,
    /// Latest sequence handed out
    latest: AtomicU64,
    /// Outcomes dropped because a newer change was seen
    discarded: AtomicU64,
    /// Lookups actually dispatched
    lookups: AtomicU64,
    report_tx: watch::Sender<Option<CheckReport>>,
}

impl Shared {
    async fn run_check(&self, request: ValidationRequest) {
        let value = Some(request.value.as_str()).filter(|v| !v.is_empty());
        if value.is_some() {
            self.lookups.fetch_add(1, Ordering::SeqCst);
        }

        let outcome = check_name(self.query.as_ref(), value).await;

        let latest = self.latest.load(Ordering::SeqCst);
        if request.seq != latest {
            self.discarded.fetch_add(1, Ordering::SeqCst);
            debug!(
                "Discarding stale check for '{}' (seq {} < {})",
                request.value, request.seq, latest
            );
            return;
        }

        {
            let mut field = self.field.write();
            field.set_validity(OCCUPIED, outcome.is_valid());
            match &outcome {
                NameCheckOutcome::TransportError(e) => {
                    warn!("Name lookup for '{}' failed, marking invalid: {}", request.value, e);
                    field.set_diagnostic(Some(e.clone()));
                }
                _ => field.set_diagnostic(None),
            }
        }

        debug!("Name '{}' -> {:?}", request.value, outcome);
        self.report_tx.send_replace(Some(CheckReport {
            seq: request.seq,
            value: request.value,
            outcome,
        }));
    }
}

/// Watches a name field and keeps its `occupied` key current
pub struct NameValidator {
    shared: Arc<Shared>,
    debouncer: Debouncer<ValidationRequest>,
}

impl NameValidator {
    /// Must be created and fed from within a Tokio runtime
    pub fn new(query: Arc<dyn NameAvailability>, field: SharedField, delay: Duration) -> Self {
        let (report_tx, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            query,
            field,
            latest: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            report_tx,
        });

        let for_timer = Arc::clone(&shared);
        let debouncer = Debouncer::new(delay, move |request: ValidationRequest| {
            let shared = Arc::clone(&for_timer);
            // Detached: a later debounce restart must not abort a lookup
            tokio::spawn(async move {
                shared.run_check(request).await;
            });
        });

        info!("Name validator ready (debounce {:?})", delay);
        Self { shared, debouncer }
    }

    /// Watched-value handler, called on every change
    ///
    /// Returns the sequence number assigned to this change.
    pub fn on_value_changed(&self, value: &str, previous: &str) -> u64 {
        let seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.debouncer.call(ValidationRequest {
            value: value.to_string(),
            previous: previous.to_string(),
            seq,
        });
        seq
    }

    /// Subscribe to applied outcomes
    pub fn subscribe(&self) -> watch::Receiver<Option<CheckReport>> {
        self.shared.report_tx.subscribe()
    }

    /// Wait until the outcome for the latest change has been applied
    pub async fn settled(&self) -> CheckReport {
        let mut rx = self.subscribe();
        loop {
            {
                let current = rx.borrow_and_update();
                if let Some(report) = current.as_ref() {
                    if report.seq == self.latest_sequence() {
                        return report.clone();
                    }
                }
            }
            // The sender lives in `self`, so this cannot fail while we wait
            let _ = rx.changed().await;
        }
    }

    /// True once the latest change has an applied outcome (or nothing changed yet)
    pub fn is_settled(&self) -> bool {
        let latest = self.latest_sequence();
        latest == 0
            || self
                .shared
                .report_tx
                .borrow()
                .as_ref()
                .is_some_and(|report| report.seq == latest)
    }

    pub fn latest_sequence(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }

    /// Outcomes dropped as stale so far
    pub fn discarded(&self) -> u64 {
        self.shared.discarded.load(Ordering::SeqCst)
    }

    /// Lookups dispatched to the query so far
    pub fn lookups(&self) -> u64 {
        self.shared.lookups.load(Ordering::SeqCst)
    }

    /// Check whether a debounced check is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn field(&self) -> &SharedField {
        &self.shared.field
    }
}
