//! Watch command: live, debounced statistics over stdin edits.
//!
//! Each input line is appended to a running buffer and fed to the update
//! scheduler. A few lines are commands instead of text:
//!
//! - `:more` toggles between the top five letters and all of them
//! - `:theme` toggles the dark/light color scheme
//! - `:clear` empties the buffer

use std::time::Duration;

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument, warn};

use tally_core::{
    CharLimit, Config, LimitStatus, SchedulerOptions, SchedulerState, Theme, Update,
    UpdateScheduler, limit_status, would_exceed,
};

use super::{print_metrics, render_density};

const CMD_MORE: &str = ":more";
const CMD_THEME: &str = ":theme";
const CMD_CLEAR: &str = ":clear";

/// Arguments for the `watch` subcommand.
#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    /// Quiet period in milliseconds before statistics are recomputed.
    #[arg(long, value_name = "MS")]
    pub quiet_period: Option<u64>,

    /// Count characters without whitespace.
    #[arg(long)]
    pub exclude_spaces: bool,

    /// Character limit; lines that would exceed it are rejected.
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct WatchEvent<'a> {
    #[serde(flatten)]
    update: &'a Update,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<LimitStatus>,
}

/// Prints scheduler updates as they arrive.
struct Printer {
    json: bool,
    exclude_spaces: bool,
    limit: Option<CharLimit>,
    theme: Theme,
}

impl Printer {
    fn handle(&mut self, update: &Update) {
        if let Update::Redisplay { flags, .. } = update {
            self.theme = flags.theme();
        }
        let limit = match update {
            Update::Settled { metrics, .. } => Some(limit_status(metrics.char_count, self.limit)),
            Update::Empty => Some(limit_status(0, self.limit)),
            Update::Redisplay { .. } => None,
        };

        if self.json {
            let event = WatchEvent { update, limit };
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to serialize update"),
            }
            return;
        }

        match update {
            Update::Empty => {
                println!("{}", "(empty)".dimmed());
            }
            Update::Settled { metrics, display } => {
                print_metrics(metrics, self.exclude_spaces);
                for line in render_density(display, self.theme) {
                    println!("  {line}");
                }
            }
            Update::Redisplay { display, flags } => {
                println!("{}: {}", "Theme".dimmed(), flags.theme().as_str().cyan());
                for line in render_density(display, self.theme) {
                    println!("  {line}");
                }
            }
        }
        if let Some(warning) = limit.and_then(|status| status.warning()) {
            println!("{}", warning.red().bold());
        }
        println!();
    }
}

/// Read lines from stdin and print statistics once typing pauses.
///
/// Returns after stdin closes and the last pending update has been delivered.
#[instrument(name = "cmd_watch", skip_all, fields(json = global_json))]
pub async fn cmd_watch(args: WatchArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let mut options = SchedulerOptions::from(config);
    if let Some(ms) = args.quiet_period {
        options.quiet_period = Duration::from_millis(ms);
    }
    options.exclude_whitespace |= args.exclude_spaces;
    let limit = match args.limit {
        Some(ref raw) => CharLimit::parse(raw),
        None => config.char_limit,
    };

    debug!(
        quiet_period_ms = options.quiet_period.as_millis() as u64,
        limit = ?limit,
        "executing watch command"
    );

    let mut printer = Printer {
        json: global_json,
        exclude_spaces: options.exclude_whitespace,
        limit,
        theme: options.flags.theme(),
    };
    let scheduler = UpdateScheduler::new(options, move |update| printer.handle(&update))?;

    let mut buffer = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            CMD_MORE => {
                scheduler.toggle_show_all_letters();
            }
            CMD_THEME => {
                scheduler.toggle_theme();
            }
            CMD_CLEAR => {
                buffer.clear();
                scheduler.text_changed(buffer.as_str());
            }
            _ => {
                let inserted = format!("{line}\n");
                if would_exceed(&buffer, &inserted, options.exclude_whitespace, limit) {
                    let message = format!(
                        "line rejected: it would exceed the character limit ({})",
                        limit_label(limit)
                    );
                    eprintln!("{}", message.yellow());
                    continue;
                }
                buffer.push_str(&inserted);
                scheduler.text_changed(buffer.as_str());
            }
        }
    }

    debug!("stdin closed, waiting for pending update");
    while scheduler.state() != SchedulerState::Idle {
        tokio::time::sleep(options.quiet_period).await;
    }
    Ok(())
}

fn limit_label(limit: Option<CharLimit>) -> String {
    limit.map_or_else(|| "none".to_string(), |limit| limit.to_string())
}
