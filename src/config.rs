//! Configuration file handling for hand-pointer.
//!
//! Loads configuration from `~/.config/hand-pointer/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gesture::{
    GestureConfig, ScreenBounds, DEFAULT_ACTION_COOLDOWN, DEFAULT_MODE_TOGGLE_COOLDOWN,
    DEFAULT_PINCH_THRESHOLD, DEFAULT_SCROLL_SENSITIVITY, DEFAULT_SMOOTHING_FACTOR,
};

/// Configuration file structure for hand-pointer.
/// Loaded from ~/.config/hand-pointer/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureSection,
    #[serde(default)]
    pub screen: ScreenSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// `[gesture]`: the tunables of the gesture core. Cooldowns are in seconds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GestureSection {
    #[serde(default = "default_pinch_threshold")]
    pub pinch_threshold: f64,
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,
    #[serde(default = "default_action_cooldown")]
    pub action_cooldown: f64,
    #[serde(default = "default_mode_toggle_cooldown")]
    pub mode_toggle_cooldown: f64,
    #[serde(default = "default_scroll_sensitivity")]
    pub scroll_sensitivity: f64,
    /// Flip landmarks horizontally (camera images that are not mirrored)
    #[serde(default)]
    pub mirror: bool,
}

impl Default for GestureSection {
    fn default() -> Self {
        GestureSection {
            pinch_threshold: default_pinch_threshold(),
            smoothing_factor: default_smoothing_factor(),
            action_cooldown: default_action_cooldown(),
            mode_toggle_cooldown: default_mode_toggle_cooldown(),
            scroll_sensitivity: default_scroll_sensitivity(),
            mirror: false,
        }
    }
}

/// `[screen]`: overrides the detected display size when both are set.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScreenSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ScreenSection {
    pub fn bounds(&self) -> Option<ScreenBounds> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(ScreenBounds::new(width, height)),
            _ => None,
        }
    }
}

/// `[output]`: system sink settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
}

impl Default for OutputSection {
    fn default() -> Self {
        OutputSection {
            key_delay_ms: default_key_delay_ms(),
        }
    }
}

impl OutputSection {
    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }
}

fn default_pinch_threshold() -> f64 {
    DEFAULT_PINCH_THRESHOLD
}

fn default_smoothing_factor() -> f64 {
    DEFAULT_SMOOTHING_FACTOR
}

fn default_action_cooldown() -> f64 {
    DEFAULT_ACTION_COOLDOWN.as_secs_f64()
}

fn default_mode_toggle_cooldown() -> f64 {
    DEFAULT_MODE_TOGGLE_COOLDOWN.as_secs_f64()
}

fn default_scroll_sensitivity() -> f64 {
    DEFAULT_SCROLL_SENSITIVITY
}

fn default_key_delay_ms() -> u64 {
    10
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Validate the `[gesture]` section and combine it with the screen size.
    pub fn gesture_config(&self, screen: ScreenBounds) -> Result<GestureConfig, ConfigError> {
        let g = &self.gesture;

        if !(g.pinch_threshold.is_finite() && g.pinch_threshold > 0.0) {
            return Err(invalid("pinch_threshold", g.pinch_threshold, "must be greater than 0"));
        }
        if !(g.smoothing_factor > 0.0 && g.smoothing_factor <= 1.0) {
            return Err(invalid(
                "smoothing_factor",
                g.smoothing_factor,
                "must be in (0, 1]",
            ));
        }
        let action_cooldown = seconds("action_cooldown", g.action_cooldown)?;
        let mode_toggle_cooldown = seconds("mode_toggle_cooldown", g.mode_toggle_cooldown)?;
        if !g.scroll_sensitivity.is_finite() {
            return Err(invalid(
                "scroll_sensitivity",
                g.scroll_sensitivity,
                "must be a finite number",
            ));
        }
        if screen.width == 0 || screen.height == 0 {
            return Err(ConfigError::Invalid {
                field: "screen",
                reason: format!("{}x{} has a zero dimension", screen.width, screen.height),
            });
        }

        Ok(GestureConfig {
            pinch_threshold: g.pinch_threshold,
            smoothing_factor: g.smoothing_factor,
            action_cooldown,
            mode_toggle_cooldown,
            scroll_sensitivity: g.scroll_sensitivity,
            screen,
            mirror: g.mirror,
        })
    }
}

fn invalid(field: &'static str, value: f64, rule: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: format!("{} {}", value, rule),
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| invalid(field, value, "must be a non-negative number of seconds"))
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("hand-pointer").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/hand-pointer/config.toml")
        })
}

/// Commented default config written by `hand-pointer config init`.
pub const DEFAULT_CONFIG: &str = r#"# hand-pointer configuration

[gesture]
# Thumb-to-fingertip distance (normalized image units) that counts as a pinch
pinch_threshold = 0.05
# Pointer smoothing, 0 < factor <= 1 (1 = no smoothing)
smoothing_factor = 0.3
# Seconds between click / copy / paste / undo
action_cooldown = 0.2
# Seconds between pointer/hotkey mode switches
mode_toggle_cooldown = 1.0
# Scroll amount per pixel of vertical hand motion
scroll_sensitivity = 0.5
# Flip landmarks horizontally so the pointer follows the hand on an unmirrored camera
mirror = false

[screen]
# Leave unset to use the detected display size
# width = 1920
# height = 1080

[output]
# Pause between key events of a shortcut, in milliseconds
key_delay_ms = 10
"#;
