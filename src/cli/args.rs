//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{OutputMode, TimingSource};

/// Parse and validate screen size (WIDTHxHEIGHT format)
pub fn parse_screen(s: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid screen size '{}'. Use WIDTHxHEIGHT (e.g., 1920x1080)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in screen size", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in screen size", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Screen width and height must be greater than 0".to_string());
    }
    Ok((width, height))
}

/// Parse and validate smoothing factor (0.0 exclusive to 1.0 inclusive)
fn parse_smoothing(s: &str) -> Result<f64, String> {
    let factor: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(factor > 0.0 && factor <= 1.0) {
        return Err(format!(
            "Smoothing factor must be greater than 0.0 and at most 1.0, got {}",
            factor
        ));
    }
    Ok(factor)
}

/// Parse and validate pinch threshold (0.0-1.0, exclusive of 0)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let threshold: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(format!(
            "Pinch threshold must be greater than 0.0 and at most 1.0, got {}",
            threshold
        ));
    }
    Ok(threshold)
}

/// Control the pointer and editing shortcuts with hand gestures
#[derive(Parser, Debug)]
#[command(name = "hand-pointer")]
#[command(version, about = "Turn hand landmarks into pointer and hotkey actions", long_about = None)]
#[command(after_help = "GESTURES (thumb tip touching):
    index   click (pointer mode) / copy (hotkey mode)
    middle  scroll (pointer mode) / paste (hotkey mode)
    ring    undo (hotkey mode)
    pinky   switch between pointer and hotkey mode

EXAMPLES:
    # Drive the pointer from a landmark detector
    landmark-detector --jsonl | hand-pointer

    # Replay a recorded session and print the actions
    hand-pointer --input session.jsonl --output json --timing stream")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Landmark frames as JSON lines (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where actions go
    #[arg(short, long, default_value = "system")]
    pub output: OutputMode,

    /// Frame timestamp source
    #[arg(long, default_value = "wall")]
    pub timing: TimingSource,

    /// Screen size, overrides config and display detection
    #[arg(long, value_parser = parse_screen)]
    pub screen: Option<(u32, u32)>,

    /// Pinch distance threshold in normalized units
    #[arg(long, value_parser = parse_threshold)]
    pub pinch_threshold: Option<f64>,

    /// Pointer smoothing factor (1.0 disables smoothing)
    #[arg(long, value_parser = parse_smoothing)]
    pub smoothing: Option<f64>,

    /// Scroll amount per pixel of vertical hand motion
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_sensitivity: Option<f64>,

    /// Flip landmarks horizontally (for unmirrored camera images)
    #[arg(long)]
    pub mirror: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["hand-pointer"]);
        assert!(args.command.is_none());
        assert!(args.input.is_none());
        assert_eq!(args.output, OutputMode::System);
        assert_eq!(args.timing, TimingSource::Wall);
        assert!(args.screen.is_none());
        assert!(args.pinch_threshold.is_none());
        assert!(args.smoothing.is_none());
        assert!(args.scroll_sensitivity.is_none());
        assert!(!args.mirror);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_replay_flags() {
        let args = Args::parse_from([
            "hand-pointer",
            "--input",
            "session.jsonl",
            "--output",
            "json",
            "--timing",
            "stream",
            "--screen",
            "2560x1440",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("session.jsonl")));
        assert_eq!(args.output, OutputMode::Json);
        assert_eq!(args.timing, TimingSource::Stream);
        assert_eq!(args.screen, Some((2560, 1440)));
    }

    #[test]
    fn test_args_tuning_flags() {
        let args = Args::parse_from([
            "hand-pointer",
            "--pinch-threshold",
            "0.04",
            "--smoothing",
            "0.5",
            "--scroll-sensitivity",
            "-1.5",
            "--mirror",
        ]);
        assert_eq!(args.pinch_threshold, Some(0.04));
        assert_eq!(args.smoothing, Some(0.5));
        assert_eq!(args.scroll_sensitivity, Some(-1.5));
        assert!(args.mirror);
    }

    #[test]
    fn test_args_rejects_bad_smoothing() {
        assert!(Args::try_parse_from(["hand-pointer", "--smoothing", "0"]).is_err());
        assert!(Args::try_parse_from(["hand-pointer", "--smoothing", "1.5"]).is_err());
    }

    #[test]
    fn test_args_config_subcommand() {
        let args = Args::parse_from(["hand-pointer", "config", "init"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn test_parse_screen_valid() {
        assert_eq!(parse_screen("1920x1080"), Ok((1920, 1080)));
    }

    #[test]
    fn test_parse_screen_invalid() {
        assert!(parse_screen("1920").is_err());
        assert!(parse_screen("0x1080").is_err());
        assert!(parse_screen("wide x tall").is_err());
    }
}
