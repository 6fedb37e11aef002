//! `tandemctl` — plan `distributeShardsLike` repairs from a cluster snapshot.
//!
//! # Usage
//!
//! ```text
//! tandemctl plan --plan plan.json --health health.json           # print the report as JSON
//! tandemctl plan --plan plan.json --health health.json --pretty  # indented
//! tandemctl check --plan plan.json --health health.json          # exit 1 if anything needs repair
//! tandemctl -c tandem.toml --adopt-prototype-factor plan ...     # policy overrides
//! ```
//!
//! The report goes to stdout; logs go to stderr.

mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tandem_repair::{PlanReport, RepairPlanner, RepairPolicy, ReplicationFactorPolicy};
use tandem_types::{HealthSnapshot, PlanSnapshot};
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "tandemctl",
    version,
    about = "Plan shard repairs for collections distributed like a prototype"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Plan dependents whose replication factor differs from the prototype's.
    #[arg(long, global = true)]
    adopt_prototype_factor: bool,

    /// Clear the rename flag on emitted BeginRepairs operations.
    #[arg(long, global = true)]
    no_rename: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the repair report as JSON.
    Plan {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print a one-line summary; exit 1 if any collection needs repair or failed.
    Check {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },
}

#[derive(Args)]
struct SnapshotArgs {
    /// Plan document (JSON).
    #[arg(long, env = "TANDEM_PLAN")]
    plan: PathBuf,

    /// Health document (JSON), captured together with the plan.
    #[arg(long, env = "TANDEM_HEALTH")]
    health: PathBuf,
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    // CLI flags override config file values.
    let mut policy = config.policy();
    if cli.adopt_prototype_factor {
        policy.replication_factor = ReplicationFactorPolicy::AdoptPrototype;
    }
    if cli.no_rename {
        policy.rename_distribute_shards_like = false;
    }
    debug!(?policy, "effective repair policy");

    match cli.command {
        Commands::Plan { snapshot, pretty } => cmd_plan(&snapshot, policy, pretty),
        Commands::Check { snapshot } => cmd_check(&snapshot, policy),
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// -----------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------

fn cmd_plan(snapshot: &SnapshotArgs, policy: RepairPolicy, pretty: bool) -> Result<ExitCode> {
    let report = run(snapshot, policy)?;
    let json = if pretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    }
    .context("failed to encode report")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(snapshot: &SnapshotArgs, policy: RepairPolicy) -> Result<ExitCode> {
    let report = run(snapshot, policy)?;
    let fingerprint = report.fingerprint().context("failed to encode report")?;
    let s = report.summary;
    println!(
        "checked={} repair={} failed={} moves={} fingerprint={fingerprint}",
        s.checked, s.needing_repair, s.failed, s.moves
    );

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Load both documents and run the planner once.
fn run(snapshot: &SnapshotArgs, policy: RepairPolicy) -> Result<PlanReport> {
    let plan = PlanSnapshot::from_json(&read(&snapshot.plan)?)
        .with_context(|| format!("failed to decode {}", snapshot.plan.display()))?;
    let health = HealthSnapshot::from_json(&read(&snapshot.health)?)
        .with_context(|| format!("failed to decode {}", snapshot.health.display()))?;

    info!(
        databases = plan.databases.len(),
        servers = health.servers.len(),
        "snapshot loaded"
    );

    let result = RepairPlanner::new(policy).plan(&plan, &health);
    Ok(PlanReport::from_result(&result))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
