//! Stats command: counts, reading time, limit check, and letter density.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use tally_core::{
    CharLimit, Config, DisplayState, LimitStatus, Metrics, build_display_state, compute_metrics,
    limit_status,
};

use super::{print_metrics, read_input, render_density};

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// File to analyze (reads stdin when omitted or `-`).
    pub file: Option<Utf8PathBuf>,

    /// Count characters without whitespace.
    #[arg(long)]
    pub exclude_spaces: bool,

    /// Show every letter instead of the top five.
    #[arg(long)]
    pub all_letters: bool,

    /// Character limit; anything that is not a positive integer means no limit.
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,
}

/// Full result of the `stats` command.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Counts over the raw text.
    pub metrics: Metrics,
    /// Whether whitespace was excluded from the character count.
    pub exclude_spaces: bool,
    /// Character count relative to the configured limit.
    pub limit: LimitStatus,
    /// Density view.
    pub density: DisplayState,
}

impl StatsReport {
    /// Analyze `text` with the given settings.
    pub fn build(
        text: &str,
        exclude_spaces: bool,
        show_all_letters: bool,
        limit: Option<CharLimit>,
    ) -> Self {
        let metrics = compute_metrics(text, exclude_spaces);
        Self {
            metrics,
            exclude_spaces,
            limit: limit_status(metrics.char_count, limit),
            density: build_display_state(text, show_all_letters),
        }
    }
}

/// Compute statistics for a file or stdin.
///
/// Command-line flags override the configured defaults. Reaching the character
/// limit fails the command unless JSON output is requested.
#[instrument(name = "cmd_stats", skip_all, fields(file = ?args.file))]
pub fn cmd_stats(
    args: StatsArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = ?args.file, limit = ?args.limit, "executing stats command");

    let content = read_input(args.file.as_deref(), max_input_bytes)?;

    let exclude_spaces = args.exclude_spaces || config.exclude_spaces;
    let show_all = args.all_letters || config.show_all_letters;
    let limit = match args.limit {
        Some(ref raw) => CharLimit::parse(raw),
        None => config.char_limit,
    };

    let report = StatsReport::build(&content, exclude_spaces, show_all, limit);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_metrics(&report.metrics, exclude_spaces);
    if let LimitStatus::Within { count, limit } = report.limit {
        println!("{}: {count}/{limit}", "Limit".dimmed());
    }
    println!();
    println!("{}", "Letter density".bold().underline());
    for line in render_density(&report.density, config.session_flags().theme()) {
        println!("  {line}");
    }

    if let Some(warning) = report.limit.warning() {
        bail!("{warning}");
    }
    Ok(())
}
