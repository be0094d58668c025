//! View session: the roundtrip views wired to one breadcrumb tracker
//!
//! The session plays the part of the surrounding application: it owns the
//! route path, delivers `navigation-changed` and `roundtrip-added` events
//! to their consumers and exposes a serializable snapshot for renderers.

pub mod create;
pub mod home;
pub mod list;
pub mod roundtrip;

pub use create::{CreateRoundtripView, DialogVisibility, SaveOutcome};
pub use home::HomeView;
pub use list::RoundtripListView;
pub use roundtrip::{MemoryRoundtrips, Roundtrip, RoundtripRepository};

use crate::system_config::SystemConfig;
use anyhow::{Context, Result};
use namecheck::{CheckReport, NameAvailability};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use trail::{
    navigation_channel, BreadcrumbEntry, BreadcrumbTracker, BreadcrumbTrail, LabelMatchPolicy,
    NavigationItem, NavigationPublisher, NavigationSubscription, SharedPath,
};

/// Session knobs taken from the system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub label_match: LabelMatchPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SystemConfig::default())
    }
}

impl From<&SystemConfig> for SessionSettings {
    fn from(config: &SystemConfig) -> Self {
        Self {
            debounce: config.namecheck.debounce(),
            label_match: config.trail.label_match,
        }
    }
}

/// Everything a renderer needs after a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub path: String,
    pub trail: Vec<BreadcrumbEntry>,
    pub roundtrips: Vec<Roundtrip>,
    pub selected: Option<u64>,
    pub name: String,
    pub occupied: Option<bool>,
    pub error_class: &'static str,
    pub dialog: DialogVisibility,
    pub diagnostic: Option<String>,
}

pub struct ViewSession {
    router: SharedPath,
    nav: NavigationPublisher,
    navigation: NavigationSubscription,
    tracker: BreadcrumbTracker<SharedPath>,
    home: HomeView,
    list: RoundtripListView,
    create: CreateRoundtripView,
    added_rx: mpsc::UnboundedReceiver<Roundtrip>,
}

impl ViewSession {
    /// Open a session at `/`, loading the roundtrip list
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn open(
        settings: SessionSettings,
        query: Arc<dyn NameAvailability>,
        repository: Arc<dyn RoundtripRepository>,
    ) -> Result<Self> {
        let router = SharedPath::new("/");
        let (nav, navigation) = navigation_channel();
        let (added_tx, added_rx) = mpsc::unbounded_channel();

        let roundtrips = repository
            .list()
            .await
            .context("Failed to load roundtrips")?;

        let tracker = BreadcrumbTracker::new(router.clone()).with_policy(settings.label_match);
        let create = CreateRoundtripView::new(
            query,
            repository,
            router.clone(),
            added_tx,
            settings.debounce,
        );

        Ok(Self {
            home: HomeView::new(nav.clone()),
            list: RoundtripListView::new(nav.clone(), roundtrips),
            router,
            nav,
            navigation,
            tracker,
            create,
            added_rx,
        })
    }

    /// Route to `path`, announcing `name` (or no item at all)
    pub fn navigate(&mut self, path: &str, name: Option<&str>) {
        self.router.set(path);
        self.nav.publish(name.map(NavigationItem::new));
        self.pump();
    }

    pub fn go_home(&mut self) {
        self.router.set("/");
        self.home.enter();
        self.pump();
    }

    /// Route to `/roundtrip/<id>` and let the list view announce it
    pub fn select_roundtrip(&mut self, id: &str) -> Option<Roundtrip> {
        self.router.set(format!("/roundtrip/{}", id));
        let selected = self.list.select(Some(id));
        self.pump();
        selected
    }

    pub fn open_create(&mut self) {
        self.create.open();
    }

    pub fn cancel_create(&mut self) {
        self.create.cancel();
    }

    pub fn type_name(&mut self, value: &str) -> u64 {
        self.create.set_name(value)
    }

    /// Save the dialog; a created roundtrip is listed and selected
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        let outcome = self.create.save().await?;

        if let SaveOutcome::Saved(roundtrip) = &outcome {
            self.pump();
            self.list.select(Some(&roundtrip.id.to_string()));
            self.pump();
        }

        Ok(outcome)
    }

    /// Wait for the latest name check to land
    pub async fn settle(&self, timeout: Duration) -> Result<CheckReport> {
        tokio::time::timeout(timeout, self.create.validator().settled())
            .await
            .with_context(|| format!("Name check did not settle within {:?}", timeout))
    }

    /// Deliver queued `roundtrip-added` and `navigation-changed` events
    pub fn pump(&mut self) {
        while let Ok(roundtrip) = self.added_rx.try_recv() {
            self.list.on_roundtrip_added(roundtrip);
        }
        self.tracker.drain(&mut self.navigation);
    }

    pub fn trail(&self) -> &BreadcrumbTrail {
        self.tracker.trail()
    }

    pub fn list(&self) -> &RoundtripListView {
        &self.list
    }

    pub fn create(&self) -> &CreateRoundtripView {
        &self.create
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            path: self.router.get(),
            trail: self.trail().entries().to_vec(),
            roundtrips: self.list.roundtrips().to_vec(),
            selected: self.list.selected(),
            name: self.create.name(),
            occupied: self.create.occupied(),
            error_class: self.create.error_class(),
            dialog: self.create.dialog(),
            diagnostic: self.create.diagnostic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namecheck::TakenNames;

    async fn session(existing: &[&str], label_match: LabelMatchPolicy) -> ViewSession {
        let names = Arc::new(TakenNames::default());
        let repo = Arc::new(MemoryRoundtrips::with_roundtrips(
            Arc::clone(&names),
            existing.iter().copied(),
        ));
        let settings = SessionSettings {
            debounce: Duration::from_millis(200),
            label_match,
        };
        ViewSession::open(settings, names, repo).await.unwrap()
    }

    fn labels(session: &ViewSession) -> Vec<String> {
        session.trail().labels().into_iter().map(str::to_string).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_roundtrip_builds_trail() {
        let mut session = session(&["Invoice", "Billing"], LabelMatchPolicy::Keep).await;

        session.navigate("/roundtrip", Some("Roundtrips"));
        session.select_roundtrip("1");
        assert_eq!(labels(&session), vec!["Roundtrips", "Invoice"]);

        session.select_roundtrip("2");
        assert_eq!(labels(&session), vec!["Roundtrips", "Billing"]);
        assert_eq!(session.list().active_class(2), "active");

        session.go_home();
        assert!(session.trail().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_flow_selects_new_roundtrip() {
        let mut session = session(&["Invoice"], LabelMatchPolicy::Keep).await;
        session.navigate("/roundtrip", Some("Roundtrips"));

        session.open_create();
        session.type_name("Ship");
        session.type_name("Shipping");
        let report = session.settle(Duration::from_secs(5)).await.unwrap();
        assert_eq!(report.value, "Shipping");

        let outcome = session.save().await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved(_)));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.path, "/roundtrip/2");
        assert_eq!(snapshot.selected, Some(2));
        assert_eq!(snapshot.dialog, DialogVisibility::Hidden);
        assert_eq!(snapshot.roundtrips.len(), 2);
        assert_eq!(labels(&session), vec!["Roundtrips", "Shipping"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_name_blocks_save() {
        let mut session = session(&["Invoice"], LabelMatchPolicy::Keep).await;

        session.open_create();
        session.type_name("Invoice");
        session.settle(Duration::from_secs(5)).await.unwrap();

        assert_eq!(session.save().await.unwrap(), SaveOutcome::Invalid);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.occupied, Some(false));
        assert_eq!(snapshot.error_class, "error");
        assert_eq!(snapshot.dialog, DialogVisibility::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_policy_from_settings() {
        let mut session = session(&["Invoice"], LabelMatchPolicy::Refresh).await;

        session.navigate("/roundtrip", Some("Roundtrips"));
        session.select_roundtrip("1");
        session.navigate("/roundtrip/1/details", Some("Roundtrips"));

        assert_eq!(
            session.trail().entries(),
            &[BreadcrumbEntry::new("Roundtrips", "/roundtrip/1/details")]
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = SystemConfig::default();
        config.namecheck.debounce_ms = 300;
        config.trail.label_match = LabelMatchPolicy::Refresh;

        let settings = SessionSettings::from(&config);
        assert_eq!(settings.debounce, Duration::from_millis(300));
        assert_eq!(settings.label_match, LabelMatchPolicy::Refresh);
    }
}
