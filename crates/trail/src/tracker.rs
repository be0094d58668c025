//! Breadcrumb tracker
//!
//! Consumes `navigation-changed` events and keeps the trail consistent with
//! the current route path. Renderers read the trail through a `watch`
//! receiver; they never mutate it.

use crate::channel::{NavigationItem, NavigationSubscription};
use crate::path::PathProvider;
use crate::trail::{BreadcrumbEntry, BreadcrumbTrail, LabelMatchPolicy};
use tokio::sync::watch;
use tracing::{debug, info};

/// Owns the breadcrumb trail for one view scope
pub struct BreadcrumbTracker<P> {
    /// Trail, mutated only by this tracker
    trail: BreadcrumbTrail,

    /// Source of the current route path
    paths: P,

    /// Handling of labels already present in the trail
    policy: LabelMatchPolicy,

    /// Read-only surface for renderers
    snapshot_tx: watch::Sender<Vec<BreadcrumbEntry>>,
}

impl<P: PathProvider> BreadcrumbTracker<P> {
    pub fn new(paths: P) -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            trail: BreadcrumbTrail::new(),
            paths,
            policy: LabelMatchPolicy::default(),
            snapshot_tx,
        }
    }

    pub fn with_policy(mut self, policy: LabelMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Apply one navigation change
    pub fn on_navigation_changed(&mut self, item: Option<&NavigationItem>) {
        match item {
            None => {
                debug!("Clearing breadcrumb trail ({} entries)", self.trail.len());
                self.trail.clear();
            }
            Some(item) => {
                let current_path = self.paths.current_path();
                let change = self.trail.advance(&item.name, &current_path, self.policy);
                debug!(
                    "Breadcrumb '{}' at {}: evicted={} appended={} refreshed={}",
                    item.name, current_path, change.evicted, change.appended, change.refreshed
                );
            }
        }

        self.snapshot_tx.send_replace(self.trail.entries().to_vec());
    }

    /// Apply every event already queued on the subscription
    ///
    /// Returns the number of events applied.
    pub fn drain(&mut self, events: &mut NavigationSubscription) -> usize {
        let mut applied = 0;
        while let Some(event) = events.try_recv() {
            self.on_navigation_changed(event.item.as_ref());
            applied += 1;
        }
        applied
    }

    /// Consume events until every publisher is dropped
    ///
    /// Returns the final trail.
    pub async fn run(mut self, mut events: NavigationSubscription) -> BreadcrumbTrail {
        info!("Breadcrumb tracker started (policy: {:?})", self.policy);

        while let Some(event) = events.recv().await {
            self.on_navigation_changed(event.item.as_ref());
        }

        info!("Breadcrumb tracker stopped with {} entries", self.trail.len());
        self.trail
    }

    /// Current trail
    pub fn trail(&self) -> &BreadcrumbTrail {
        &self.trail
    }

    /// Subscribe to trail snapshots, one per applied event
    pub fn watch(&self) -> watch::Receiver<Vec<BreadcrumbEntry>> {
        self.snapshot_tx.subscribe()
    }

    pub fn policy(&self) -> LabelMatchPolicy {
        self.policy
    }
}
