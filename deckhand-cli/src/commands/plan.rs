//! `deckhand plan`: classify changes between two revisions without acting.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use deckhand_core::{CommandRunner, RevisionId, RevisionPair, SystemRunner};
use deckhand_deploy::{plan, AppPlan, GitCli, PlannedAction, SecretAction, Vcs};

use super::ConfigArgs;

/// Arguments for `deckhand plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    pub fleet_root: PathBuf,

    /// Revision to diff from.
    #[arg(long)]
    pub from: String,

    /// Revision to diff to (defaults to the current checkout).
    #[arg(long)]
    pub to: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Serialize)]
struct PlanJson<'a> {
    from: &'a RevisionId,
    to: &'a RevisionId,
    apps: &'a [AppPlan],
}

#[derive(Tabled)]
struct PlanTableRow {
    #[tabled(rename = "app")]
    app: String,
    #[tabled(rename = "changed")]
    changed: usize,
    #[tabled(rename = "verdict")]
    verdict: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "secrets")]
    secrets: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve(&self.fleet_root)?;
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
        let git = GitCli::from_config(&self.fleet_root, &config, runner);

        let to = match self.to {
            Some(rev) => RevisionId::from(rev),
            None => git
                .current_revision()
                .context("failed to read the current revision")?,
        };
        let revisions = RevisionPair::new(RevisionId::from(self.from), to);
        let plans = plan(&git, &self.fleet_root, &revisions)
            .with_context(|| format!("plan failed for {}", self.fleet_root.display()))?;

        if self.json {
            let payload = PlanJson {
                from: &revisions.previous,
                to: &revisions.current,
                apps: &plans,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize plan JSON")?
            );
            return Ok(());
        }

        print_table(&revisions, plans);
        Ok(())
    }
}

fn print_table(revisions: &RevisionPair, plans: Vec<AppPlan>) {
    println!(
        "Deckhand v{} | {} -> {} | {} apps",
        env!("CARGO_PKG_VERSION"),
        revisions.previous.to_string().bold(),
        revisions.current.to_string().bold(),
        plans.len(),
    );
    if plans.is_empty() {
        println!("No compose files found.");
        return;
    }

    let rebuilds = plans
        .iter()
        .filter(|p| p.action == PlannedAction::Rebuild)
        .count();
    let rows: Vec<PlanTableRow> = plans
        .into_iter()
        .map(|p| PlanTableRow {
            app: p.app,
            changed: p.changed.len(),
            verdict: p
                .verdict
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            action: p.action.to_string(),
            secrets: secrets_label(p.secrets).to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if rebuilds > 0 {
        println!("{}", format!("{rebuilds} app(s) would rebuild images.").yellow());
    }
}

fn secrets_label(action: SecretAction) -> &'static str {
    match action {
        SecretAction::None => "-",
        SecretAction::Decrypt => "decrypt",
        SecretAction::RemoveStale => "remove .env",
    }
}
