//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;
use owo_colors::OwoColorize;
use tally_core::{DisplayState, Metrics, Theme};

pub mod density;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod stats;
pub mod watch;

/// Width of a full density bar, in cells.
const BAR_WIDTH: usize = 20;

/// Read the text to analyze from a file, or from stdin when `path` is `None`
/// or `-`, enforcing the configured size limit.
pub fn read_input(path: Option<&Utf8Path>, max_bytes: Option<usize>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_str() != "-" => read_input_file(path, max_bytes),
        _ => read_stdin(max_bytes),
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut content = String::new();
    let stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            stdin
                .take(max as u64 + 1)
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            if content.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            let mut stdin = stdin;
            stdin
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
        }
    }
    Ok(content)
}

/// Print the four counts as labeled lines.
pub fn print_metrics(metrics: &Metrics, exclude_spaces: bool) {
    let suffix = if exclude_spaces { " (no spaces)" } else { "" };
    println!(
        "{}: {}{}",
        "Characters".dimmed(),
        metrics.char_count.bold(),
        suffix.dimmed()
    );
    println!("{}: {}", "Words".dimmed(), metrics.word_count.bold());
    println!("{}: {}", "Sentences".dimmed(), metrics.sentence_count.bold());
    println!(
        "{}: {} min",
        "Reading time".dimmed(),
        metrics.reading_time_minutes.bold()
    );
}

/// Render the density panel as terminal lines.
pub fn render_density(state: &DisplayState, theme: Theme) -> Vec<String> {
    let DisplayState::Populated { entries, has_more } = state else {
        return vec!["No characters found. Start typing to see letter density.".to_string()];
    };

    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let filled = bar_cells(entry.percentage);
            let bar = format!(
                "{}{}",
                "█".repeat(filled).truecolor(0xD3, 0xA0, 0xFA),
                "░".repeat(BAR_WIDTH - filled).dimmed()
            );
            format!(
                "{}  {bar}  {} ({:.2}%)",
                entry.letter.bold(),
                entry.count,
                entry.percentage
            )
        })
        .collect();

    if *has_more {
        let hint = "(more letters available; toggle with --all-letters or :more)";
        lines.push(match theme {
            Theme::Dark => hint.white().to_string(),
            Theme::Light => hint.black().to_string(),
        });
    }
    lines
}

fn bar_cells(percentage: f64) -> usize {
    let cells = (percentage / 100.0 * BAR_WIDTH as f64).round();
    (cells.max(0.0) as usize).min(BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::build_display_state;

    #[test]
    fn bar_cells_scale_and_clamp() {
        assert_eq!(bar_cells(0.0), 0);
        assert_eq!(bar_cells(50.0), 10);
        assert_eq!(bar_cells(100.0), BAR_WIDTH);
        assert_eq!(bar_cells(140.0), BAR_WIDTH);
    }

    #[test]
    fn render_empty_state_shows_message() {
        let lines = render_density(&DisplayState::Empty, Theme::Dark);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No characters found"));
    }

    #[test]
    fn render_adds_hint_when_more_letters_exist() {
        let state = build_display_state("abcdefg", false);
        let lines = render_density(&state, Theme::Light);
        assert_eq!(lines.len(), 6);
        assert!(lines[5].contains("more letters"));
    }

    #[test]
    fn read_input_file_enforces_limit() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0123456789").unwrap();
        let path = Utf8Path::from_path(tmp.path()).unwrap();

        assert!(read_input_file(path, Some(5)).is_err());
        assert_eq!(read_input_file(path, Some(10)).unwrap(), "0123456789");
        assert_eq!(read_input_file(path, None).unwrap(), "0123456789");
    }
}
