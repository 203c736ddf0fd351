//! Subcommand handlers and the default run command.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use super::args::{Args, ConfigAction};
use super::enums::OutputMode;
use crate::actions::{ActionSink, JsonSink, SystemSink};
use crate::config::{default_path, Config, DEFAULT_CONFIG};
use crate::error::Error;
use crate::gesture::{GestureConfig, ScreenBounds, Session};
use crate::input::FrameReader;
use crate::run_loop::{self, RunSummary};
use crate::shutdown;

/// Fold CLI overrides into the loaded config.
pub fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(threshold) = args.pinch_threshold {
        config.gesture.pinch_threshold = threshold;
    }
    if let Some(smoothing) = args.smoothing {
        config.gesture.smoothing_factor = smoothing;
    }
    if let Some(sensitivity) = args.scroll_sensitivity {
        config.gesture.scroll_sensitivity = sensitivity;
    }
    if args.mirror {
        config.gesture.mirror = true;
    }
    if let Some((width, height)) = args.screen {
        config.screen.width = Some(width);
        config.screen.height = Some(height);
    }
}

/// Screen size from config/CLI, else queried from the display once.
pub fn resolve_screen(config: &Config) -> Result<ScreenBounds, Error> {
    if let Some(bounds) = config.screen.bounds() {
        return Ok(bounds);
    }
    let (width, height) = rdev::display_size().map_err(|e| Error::DisplaySize(format!("{:?}", e)))?;
    let bounds = ScreenBounds::new(
        u32::try_from(width).unwrap_or(u32::MAX),
        u32::try_from(height).unwrap_or(u32::MAX),
    );
    log::info!("Detected display {}x{}", bounds.width, bounds.height);
    Ok(bounds)
}

/// Run the gesture loop with the given arguments.
pub fn run(args: &Args) -> Result<RunSummary, Error> {
    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(&mut config, args);

    let screen = resolve_screen(&config)?;
    let gesture: GestureConfig = config.gesture_config(screen)?;
    log::debug!("Gesture config: {:?}", gesture);

    if let Err(e) = shutdown::setup_ctrlc_handler() {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let mut session = Session::new(gesture);
    let mut sink: Box<dyn ActionSink> = match args.output {
        OutputMode::System => Box::new(SystemSink::new(config.output.key_delay())),
        OutputMode::Json => Box::new(JsonSink::new(io::stdout())),
    };
    let timing = args.timing.into();

    let summary = match args.input.as_deref() {
        Some(path) => {
            let file = open_input(path)?;
            run_loop::run(
                FrameReader::new(BufReader::new(file)),
                &mut session,
                sink.as_mut(),
                timing,
                shutdown::stop_requested,
            )?
        }
        None => {
            log::info!("Reading landmark frames from stdin");
            run_loop::run(
                FrameReader::new(io::stdin().lock()),
                &mut session,
                sink.as_mut(),
                timing,
                shutdown::stop_requested,
            )?
        }
    };

    Ok(summary)
}

fn open_input(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, args: &Args) -> Result<(), Error> {
    let config_path = args.config.clone().unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let mut config = Config::load(Some(config_path.as_path()))?;
            apply_overrides(&mut config, args);
            let g = &config.gesture;

            println!("Current configuration:");
            println!("  Pinch threshold: {}", g.pinch_threshold);
            println!("  Smoothing factor: {}", g.smoothing_factor);
            println!("  Action cooldown: {}s", g.action_cooldown);
            println!("  Mode toggle cooldown: {}s", g.mode_toggle_cooldown);
            println!("  Scroll sensitivity: {}", g.scroll_sensitivity);
            println!("  Mirror: {}", g.mirror);
            match config.screen.bounds() {
                Some(b) => println!("  Screen: {}x{}", b.width, b.height),
                None => println!("  Screen: detected at startup"),
            }
            println!("  Key delay: {}ms", config.output.key_delay_ms);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(Error::ConfigExists(config_path));
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| Error::WriteConfig {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|source| Error::WriteConfig {
                path: config_path.clone(),
                source,
            })?;

            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}
