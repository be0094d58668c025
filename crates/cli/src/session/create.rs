//! Create-roundtrip dialog
//!
//! Owns the name field, the dialog visibility and the name validator. The
//! dialog is never shown or hidden from outside: the view toggles its own
//! [`DialogVisibility`] and renderers read it.

use super::roundtrip::{Roundtrip, RoundtripRepository};
use anyhow::{Context, Result};
use namecheck::{FormState, NameAvailability, NameValidator, SharedField, OCCUPIED};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use trail::SharedPath;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogVisibility {
    #[default]
    Hidden,
    Shown,
}

/// Result of pressing "save"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Roundtrip),
    /// Form is invalid (empty or occupied name); nothing was created
    Invalid,
    /// A name check is still outstanding; nothing was created
    CheckPending,
}

pub struct CreateRoundtripView {
    form: FormState,
    name: SharedField,
    dialog: DialogVisibility,
    validator: NameValidator,
    repository: Arc<dyn RoundtripRepository>,
    router: SharedPath,
    added_tx: mpsc::UnboundedSender<Roundtrip>,
}

impl CreateRoundtripView {
    /// Must be created from within a Tokio runtime
    pub fn new(
        query: Arc<dyn NameAvailability>,
        repository: Arc<dyn RoundtripRepository>,
        router: SharedPath,
        added_tx: mpsc::UnboundedSender<Roundtrip>,
        debounce: Duration,
    ) -> Self {
        let mut form = FormState::new();
        let name = form.field("name");
        let validator = NameValidator::new(query, Arc::clone(&name), debounce);

        Self {
            form,
            name,
            dialog: DialogVisibility::Hidden,
            validator,
            repository,
            router,
            added_tx,
        }
    }

    pub fn open(&mut self) {
        self.dialog = DialogVisibility::Shown;
    }

    pub fn cancel(&mut self) {
        self.dialog = DialogVisibility::Hidden;
    }

    /// Record an edit of the name input and schedule its check
    pub fn set_name(&mut self, value: &str) -> u64 {
        let previous = self.name.write().set_value(value);
        self.validator.on_value_changed(value, &previous)
    }

    /// Create the roundtrip if the form allows it
    ///
    /// On success the route moves to the new roundtrip, `roundtrip-added` is
    /// announced, the name is reset and the dialog hidden. A repository
    /// failure leaves the dialog open.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        if !self.validator.is_settled() {
            debug!("Save refused: name check outstanding");
            return Ok(SaveOutcome::CheckPending);
        }

        let name = self.name.read().value().to_string();
        if name.trim().is_empty() || !self.form.is_valid() {
            debug!("Save refused: form invalid ({:?})", name);
            return Ok(SaveOutcome::Invalid);
        }

        let roundtrip = self
            .repository
            .create(&name)
            .await
            .with_context(|| format!("Failed to create roundtrip '{}'", name))?;

        info!("Created roundtrip {} '{}'", roundtrip.id, roundtrip.name);

        self.router.set(format!("/roundtrip/{}", roundtrip.id));
        if self.added_tx.send(roundtrip.clone()).is_err() {
            debug!("No listener for roundtrip-added");
        }
        self.set_name("");
        self.dialog = DialogVisibility::Hidden;

        Ok(SaveOutcome::Saved(roundtrip))
    }

    pub fn dialog(&self) -> DialogVisibility {
        self.dialog
    }

    pub fn name(&self) -> String {
        self.name.read().value().to_string()
    }

    /// State of the `occupied` key, `None` until the first check lands
    pub fn occupied(&self) -> Option<bool> {
        self.name.read().validity(OCCUPIED)
    }

    pub fn diagnostic(&self) -> Option<String> {
        self.name.read().diagnostic().map(str::to_string)
    }

    pub fn error_class(&self) -> &'static str {
        self.form.error_class()
    }

    pub fn validator(&self) -> &NameValidator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::roundtrip::MemoryRoundtrips;
    use namecheck::TakenNames;

    fn view(existing: &[&str]) -> (CreateRoundtripView, SharedPath, mpsc::UnboundedReceiver<Roundtrip>) {
        let names = Arc::new(TakenNames::default());
        let repo = Arc::new(MemoryRoundtrips::with_roundtrips(Arc::clone(&names), existing.iter().copied()));
        let router = SharedPath::new("/roundtrip");
        let (added_tx, added_rx) = mpsc::unbounded_channel();
        let view = CreateRoundtripView::new(names, repo, router.clone(), added_tx, Duration::from_millis(1000));
        (view, router, added_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_and_cancel_toggle_dialog() {
        let (mut view, _, _) = view(&[]);
        assert_eq!(view.dialog(), DialogVisibility::Hidden);

        view.open();
        assert_eq!(view.dialog(), DialogVisibility::Shown);

        view.cancel();
        assert_eq!(view.dialog(), DialogVisibility::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_refused_while_check_outstanding() {
        let (mut view, _, _) = view(&[]);
        view.open();
        view.set_name("Shipping");

        assert_eq!(view.save().await.unwrap(), SaveOutcome::CheckPending);
        assert_eq!(view.dialog(), DialogVisibility::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_occupied_name_cannot_be_saved() {
        let (mut view, _, _) = view(&["Invoice"]);
        view.open();
        view.set_name("Invoice");
        view.validator().settled().await;

        assert_eq!(view.occupied(), Some(false));
        assert_eq!(view.error_class(), "error");
        assert_eq!(view.save().await.unwrap(), SaveOutcome::Invalid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_name_cannot_be_saved() {
        let (mut view, _, _) = view(&[]);
        view.open();

        assert_eq!(view.save().await.unwrap(), SaveOutcome::Invalid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_save() {
        let (mut view, router, mut added_rx) = view(&["Invoice"]);
        view.open();
        view.set_name("Shipping");
        view.validator().settled().await;
        assert_eq!(view.occupied(), Some(true));

        let outcome = view.save().await.unwrap();

        let expected = Roundtrip { id: 2, name: "Shipping".to_string() };
        assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
        assert_eq!(router.get(), "/roundtrip/2");
        assert_eq!(added_rx.try_recv().unwrap(), expected);
        assert_eq!(view.name(), "");
        assert_eq!(view.dialog(), DialogVisibility::Hidden);

        // The reset to "" is checked too, vacuously valid
        let report = view.validator().settled().await;
        assert_eq!(report.value, "");
        assert_eq!(view.occupied(), Some(true));
    }
}
