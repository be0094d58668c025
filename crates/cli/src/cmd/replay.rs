//! Replay a scripted view session

use anyhow::{Context, Result};
use cli_lib::session::{MemoryRoundtrips, RoundtripRepository};
use cli_lib::{replay, Script, SessionSettings, StepReport, SystemConfig, ViewSession};
use namecheck::{HttpNameQuery, NameAvailability, TakenNames};
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(config: &SystemConfig, script_path: &Path, offline: bool, json: bool) -> Result<()> {
    let script = Script::load(script_path)?;

    let names = Arc::new(TakenNames::new(script.taken.iter().cloned()));
    let repository: Arc<dyn RoundtripRepository> = Arc::new(MemoryRoundtrips::with_roundtrips(
        Arc::clone(&names),
        script.roundtrips.iter().cloned(),
    ));

    let query: Arc<dyn NameAvailability> = match (&config.namecheck.endpoint, offline) {
        (Some(endpoint), false) => {
            info!("Checking names against {}", endpoint);
            Arc::new(
                HttpNameQuery::new(endpoint, config.namecheck.timeout())
                    .context("Failed to set up name lookup")?,
            )
        }
        _ => {
            info!("Checking names against the script's in-memory set");
            names
        }
    };

    let mut session = ViewSession::open(SessionSettings::from(config), query, repository).await?;
    let settle_timeout = config.namecheck.debounce() + config.namecheck.timeout() * 2;

    replay(&script, &mut session, settle_timeout, |report| {
        if json {
            print_json(report);
        } else {
            print_human(report);
        }
    })
    .await?;

    Ok(())
}

fn print_json(report: &StepReport) {
    let line = serde_json::json!({
        "index": report.index,
        "step": report.step.to_string(),
        "note": report.note,
        "snapshot": report.snapshot,
    });
    println!("{}", line);
}

fn print_human(report: &StepReport) {
    let snapshot = &report.snapshot;

    print!("{} {}", format!("[{}]", report.index).dimmed(), report.step.to_string().bold());
    match &report.note {
        Some(note) => println!("  {}", note.dimmed()),
        None => println!(),
    }

    let trail: Vec<_> = snapshot.trail.iter().map(|e| e.label.as_str()).collect();
    println!("    {:<10} {}", "path".cyan(), snapshot.path);
    println!(
        "    {:<10} {}",
        "trail".cyan(),
        if trail.is_empty() {
            "(empty)".to_string()
        } else {
            trail.join(" › ")
        }
    );

    let validity = match snapshot.occupied {
        Some(true) => "valid".green().to_string(),
        Some(false) => "occupied".red().to_string(),
        None => "unchecked".dimmed().to_string(),
    };
    println!(
        "    {:<10} {:?} {} [dialog {:?}]",
        "name".cyan(),
        snapshot.name,
        validity,
        snapshot.dialog
    );

    if let Some(diagnostic) = &snapshot.diagnostic {
        println!("    {:<10} {}", "lookup".yellow(), diagnostic);
    }
}
