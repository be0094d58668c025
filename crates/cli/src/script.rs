//! Scripted view sessions
//!
//! A script is a TOML file listing pre-existing roundtrips, names that are
//! already taken, and a sequence of `[[step]]` tables:
//!
//! ```toml
//! roundtrips = ["Invoice"]
//!
//! [[step]]
//! action = "navigate"
//! path = "/roundtrip"
//! name = "Roundtrips"
//!
//! [[step]]
//! action = "type"
//! value = "Shipping"
//!
//! [[step]]
//! action = "settle"
//! ```

use crate::session::{SaveOutcome, SessionSnapshot, ViewSession};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// Route to `path`; without `name` the trail is cleared
    Navigate {
        path: String,
        #[serde(default)]
        name: Option<String>,
    },
    /// Go to the home view
    Home,
    /// Select a roundtrip by route id
    Select { id: String },
    /// Show the create dialog
    Open,
    /// Replace the name input
    Type { value: String },
    /// Let wall-clock time pass
    Wait { ms: u64 },
    /// Wait for the latest name check to land
    Settle,
    /// Press save in the create dialog
    Save,
    /// Press cancel in the create dialog
    Cancel,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate { path, name: Some(name) } => write!(f, "navigate {} ({})", path, name),
            Step::Navigate { path, name: None } => write!(f, "navigate {}", path),
            Step::Home => write!(f, "home"),
            Step::Select { id } => write!(f, "select {}", id),
            Step::Open => write!(f, "open"),
            Step::Type { value } => write!(f, "type {:?}", value),
            Step::Wait { ms } => write!(f, "wait {}ms", ms),
            Step::Settle => write!(f, "settle"),
            Step::Save => write!(f, "save"),
            Step::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Roundtrips that exist before the first step
    pub roundtrips: Vec<String>,
    /// Additional names the in-memory lookup reports as taken
    pub taken: Vec<String>,
    #[serde(rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// What happened at one step
#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    /// Extra detail (save outcome, settled check)
    pub note: Option<String>,
    pub snapshot: SessionSnapshot,
}

/// Play `script` against `session`, reporting after every step
pub async fn replay<F>(
    script: &Script,
    session: &mut ViewSession,
    settle_timeout: Duration,
    mut on_step: F,
) -> Result<Vec<StepReport>>
where
    F: FnMut(&StepReport),
{
    let mut reports = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let note = match step {
            Step::Navigate { path, name } => {
                session.navigate(path, name.as_deref());
                None
            }
            Step::Home => {
                session.go_home();
                None
            }
            Step::Select { id } => match session.select_roundtrip(id) {
                Some(_) => None,
                None => Some(format!("no roundtrip with id {}", id)),
            },
            Step::Open => {
                session.open_create();
                None
            }
            Step::Type { value } => {
                let seq = session.type_name(value);
                Some(format!("change #{}", seq))
            }
            Step::Wait { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                session.pump();
                None
            }
            Step::Settle => {
                let report = session.settle(settle_timeout).await?;
                Some(format!("{:?} -> {:?}", report.value, report.outcome))
            }
            Step::Save => match session.save().await? {
                SaveOutcome::Saved(roundtrip) => Some(format!("saved #{} {}", roundtrip.id, roundtrip.name)),
                SaveOutcome::Invalid => Some("refused: form invalid".to_string()),
                SaveOutcome::CheckPending => Some("refused: name check pending".to_string()),
            },
            Step::Cancel => {
                session.cancel_create();
                None
            }
        };

        let report = StepReport {
            index,
            step: step.clone(),
            note,
            snapshot: session.snapshot(),
        };
        on_step(&report);
        reports.push(report);
    }

    Ok(reports)
}
