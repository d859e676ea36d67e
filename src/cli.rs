use std::path::PathBuf;

use clap::{value_parser, Args, Parser, Subcommand};
use linebar::{DisplayOptions, Unit};

#[derive(Parser)]
#[command(version, author, about, long_about = None)]
pub struct Cli {
    /// Optional path to a settings JSON file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated job and draw its progress
    Demo(DemoArgs),

    /// Copy a file while drawing a byte progress bar
    Copy(CopyArgs),

    /// Save the default display settings
    Config(ConfigArgs),
}

/// Per-annotation overrides; anything left out keeps the saved default.
#[derive(Args, Debug, Default, Clone)]
pub struct DisplayArgs {
    /// Show `current/total`
    #[arg(long, value_name = "BOOL")]
    pub progress: Option<bool>,

    /// Show the completion percentage
    #[arg(long, value_name = "BOOL")]
    pub percent: Option<bool>,

    /// Show the throughput since the previous redraw
    #[arg(long, value_name = "BOOL")]
    pub speed: Option<bool>,

    /// Show the elapsed time
    #[arg(long, value_name = "BOOL")]
    pub used_time: Option<bool>,

    /// Show the estimated remaining time
    #[arg(long, value_name = "BOOL")]
    pub remaining_time: Option<bool>,
}

impl DisplayArgs {
    pub fn apply(&self, defaults: DisplayOptions) -> DisplayOptions {
        DisplayOptions {
            progress: self.progress.unwrap_or(defaults.progress),
            percent: self.percent.unwrap_or(defaults.percent),
            speed: self.speed.unwrap_or(defaults.speed),
            used_time: self.used_time.unwrap_or(defaults.used_time),
            remaining_time: self.remaining_time.unwrap_or(defaults.remaining_time),
        }
    }
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of steps to simulate
    #[arg(short, long, default_value_t = 10_000)]
    pub total: u64,

    /// How magnitudes are printed (defaults to the saved unit)
    #[arg(short, long, value_enum)]
    pub unit: Option<Unit>,

    /// Pause between two steps, in milliseconds (defaults to the saved delay)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Args)]
pub struct CopyArgs {
    /// File to read
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// File to create or overwrite
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Read buffer size in KiB
    #[arg(long, default_value_t = 64, value_parser = value_parser!(u64).range(1..=65_536))]
    pub buffer_kib: u64,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Default unit for the demo
    #[arg(short, long, value_enum)]
    pub unit: Option<Unit>,

    /// Default pause between two demo steps, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Print the resulting settings
    #[arg(long)]
    pub show: bool,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_demo_overrides() {
        let cli = Cli::try_parse_from([
            "linebar",
            "demo",
            "--total",
            "50",
            "--unit",
            "raw",
            "--speed",
            "false",
        ])
        .unwrap();
        let Commands::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(args.total, 50);
        assert_eq!(args.unit, Some(Unit::Raw));
        assert_eq!(args.delay_ms, None);

        let options = args.display.apply(DisplayOptions::all());
        assert_eq!(options, DisplayOptions::all().with_speed(false));
    }

    #[test]
    fn test_copy_rejects_zero_buffer() {
        let result = Cli::try_parse_from(["linebar", "copy", "a", "b", "--buffer-kib", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_args_keep_defaults() {
        let defaults = DisplayOptions::default().with_percent(true);
        assert_eq!(DisplayArgs::default().apply(defaults), defaults);
    }
}
