//! Density command implementation

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use tally_core::{Config, Theme, build_display_state};

use super::{read_input, render_density};

/// Arguments for the `density` subcommand.
#[derive(Args, Debug, Default)]
pub struct DensityArgs {
    /// File to analyze (reads stdin when omitted or `-`).
    pub file: Option<Utf8PathBuf>,

    /// Show every letter instead of the top five.
    #[arg(long)]
    pub all_letters: bool,

    /// Color scheme for the hint line.
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,
}

/// Print the ranked letter density of a file or stdin.
#[instrument(name = "cmd_density", skip_all, fields(file = ?args.file))]
pub fn cmd_density(
    args: DensityArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = ?args.file, all_letters = args.all_letters, "executing density command");

    let content = read_input(args.file.as_deref(), max_input_bytes)?;
    let show_all = args.all_letters || config.show_all_letters;
    let state = build_display_state(&content, show_all);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let theme = args.theme.unwrap_or_else(|| config.session_flags().theme());
    println!("{}", "Letter density".bold().underline());
    for line in render_density(&state, theme) {
        println!("  {line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("input.txt");
        std::fs::write(&path, content).unwrap();
        let path = Utf8PathBuf::try_from(path).unwrap();
        (tmp, path)
    }

    #[test]
    fn density_of_file_succeeds() {
        let (_tmp, path) = write_temp("Hello, HELLO!");
        let args = DensityArgs {
            file: Some(path),
            ..Default::default()
        };
        assert!(cmd_density(args, false, &Config::default(), None).is_ok());
    }

    #[test]
    fn density_json_succeeds() {
        let (_tmp, path) = write_temp("abcdefg");
        let args = DensityArgs {
            file: Some(path),
            all_letters: true,
            theme: Some(Theme::Light),
        };
        assert!(cmd_density(args, true, &Config::default(), None).is_ok());
    }

    #[test]
    fn density_respects_input_limit() {
        let (_tmp, path) = write_temp("0123456789");
        let args = DensityArgs {
            file: Some(path),
            ..Default::default()
        };
        assert!(cmd_density(args, false, &Config::default(), Some(4)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = DensityArgs {
            file: Some(Utf8PathBuf::from("/nonexistent/tally/input.txt")),
            ..Default::default()
        };
        assert!(cmd_density(args, false, &Config::default(), None).is_err());
    }
}
