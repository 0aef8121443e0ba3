//! Triage board command-line probe.
//!
//! # Responsibility
//! - Verify `triage_core` linkage (`ping`).
//! - Render a board or a drop plan from a content-store JSON snapshot.
//!
//! Output is JSON on stdout so runs stay diffable.

use clap::{Args, Parser, Subcommand};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use triage_core::{
    board_metrics, default_log_level, derive_triage_event, filter_items, init_logging,
    items_from_snapshot_json, parse_timestamp_text, partition_into_buckets, plan_drop,
    BoardConfig, BoardFilters, DropGesture, EventSource, TriageStatus,
};

#[derive(Debug, Parser)]
#[command(name = "triage", version, about = "Triage board engine probe")]
struct Cli {
    /// Absolute directory for rotating log files. Logging stays off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Board config JSON file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints ping and core version.
    Ping,
    /// Prints filtered columns and metrics.
    Board(BoardArgs),
    /// Prints the drop plan and transition event for one gesture.
    Plan(PlanArgs),
}

#[derive(Debug, Args)]
struct SnapshotArgs {
    /// JSON array of content records.
    snapshot: PathBuf,
    /// Reference instant (epoch ms or ISO-8601). Defaults to wall clock.
    #[arg(long)]
    now: Option<String>,
    #[arg(long)]
    template: Option<String>,
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    tag: Option<String>,
    #[arg(long)]
    text: Option<String>,
}

#[derive(Debug, Args)]
struct BoardArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
}

#[derive(Debug, Args)]
struct PlanArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Moved item id.
    #[arg(long)]
    item: String,
    /// Source column (backlog|in-progress|done).
    #[arg(long)]
    from: TriageStatus,
    /// Destination column (backlog|in-progress|done).
    #[arg(long)]
    to: TriageStatus,
    /// Destination index; out-of-range values are clamped.
    #[arg(long, allow_hyphen_values = true)]
    index: i64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("triage: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }
    let config = match cli.config.as_ref() {
        Some(path) => BoardConfig::from_path(path)?,
        None => BoardConfig::default(),
    };

    match cli.command {
        Command::Ping => {
            println!("triage_core ping={}", triage_core::ping());
            println!("triage_core version={}", triage_core::core_version());
        }
        Command::Board(args) => {
            let (items, now_ms) = load_snapshot(&args.snapshot, &config)?;
            let output = serde_json::json!({
                "now": now_ms,
                "columns": partition_into_buckets(&items),
                "metrics": board_metrics(&items, now_ms, &config),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Plan(args) => {
            let (items, _) = load_snapshot(&args.snapshot, &config)?;
            let buckets = partition_into_buckets(&items);
            let gesture = DropGesture {
                moved_item_id: args.item,
                source: args.from,
                destination: args.to,
                destination_index: args.index,
            };
            let plan = plan_drop(&gesture, &buckets);
            let event = derive_triage_event(&gesture, &buckets, &plan, EventSource::Drag, None);
            info!(
                "event=cli_plan module=cli status=ok updates={}",
                plan.updates.len()
            );
            let output = serde_json::json!({ "plan": plan, "event": event });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn load_snapshot(
    args: &SnapshotArgs,
    config: &BoardConfig,
) -> Result<(Vec<triage_core::TriageItem>, i64), Box<dyn Error>> {
    let json = std::fs::read_to_string(&args.snapshot)?;
    let items = items_from_snapshot_json(&json)?;
    let filters = BoardFilters {
        template_id: args.template.clone(),
        owner_id: args.owner.clone(),
        tag_query: args.tag.clone(),
        text_query: args.text.clone(),
    };
    let now_ms = match args.now.as_deref() {
        Some(text) => parse_now(text)?,
        None => wall_clock_ms()?,
    };
    Ok((filter_items(&items, &filters, config), now_ms))
}

fn parse_now(text: &str) -> Result<i64, String> {
    text.trim()
        .parse::<i64>()
        .ok()
        .or_else(|| parse_timestamp_text(text))
        .ok_or_else(|| format!("cannot parse --now value `{text}`"))
}

fn wall_clock_ms() -> Result<i64, Box<dyn Error>> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(i64::try_from(elapsed.as_millis())?)
}
