//! Configuration loading and validation.
//!
//! The daemon reads an optional TOML file from
//! `$XDG_CONFIG_HOME/auroranotify/auroranotify.toml`; every field has a
//! default matching the shipped stylesheet's animation timings, so a missing
//! file is not an error.
//!
//! ```toml
//! pill_duration_ms = 4000      # collapsed pill lifetime (100-600000)
//! expanded_duration_ms = 8000  # expanded view lifetime (100-600000)
//! animation_duration_ms = 400  # renderer animation length (50-5000)
//! ```
//!
//! `SIGUSR2` reloads this file at runtime; already-armed timers keep their
//! original deadlines, new values apply from the next cycle.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;

/// Raw configuration as read from disk. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub pill_duration_ms: Option<u64>,
    pub expanded_duration_ms: Option<u64>,
    pub animation_duration_ms: Option<u64>,
}

/// Resolved timing values used by the orchestrator.
///
/// The intro/outro step delays are fixed offsets of the animation rhythm
/// rather than user-facing knobs; only the three durations above are
/// configurable.
#[derive(Debug, Clone)]
pub struct Timing {
    pub pill_duration: Duration,
    pub expanded_duration: Duration,
    /// Animation length plus a grace period; gates the re-entrancy lock,
    /// the intro dequeue, and the outro completion check.
    pub settle_delay: Duration,
    pub intro_dot_delay: Duration,
    pub intro_pill_delay: Duration,
    pub outro_dot_delay: Duration,
    pub expanded_content_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Config::default().timing()
    }
}

impl Config {
    /// Load the configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a configuration file at an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Resolve the raw values into orchestrator timing.
    pub fn timing(&self) -> Timing {
        let animation = self
            .animation_duration_ms
            .unwrap_or(DEFAULT_ANIMATION_DURATION_MS);
        Timing {
            pill_duration: Duration::from_millis(
                self.pill_duration_ms.unwrap_or(DEFAULT_PILL_DURATION_MS),
            ),
            expanded_duration: Duration::from_millis(
                self.expanded_duration_ms
                    .unwrap_or(DEFAULT_EXPANDED_DURATION_MS),
            ),
            settle_delay: Duration::from_millis(animation + ANIMATION_SETTLE_GRACE_MS),
            intro_dot_delay: Duration::from_millis(INTRO_DOT_DELAY_MS),
            intro_pill_delay: Duration::from_millis(INTRO_PILL_DELAY_MS),
            outro_dot_delay: Duration::from_millis(OUTRO_DOT_REMOVAL_DELAY_MS),
            expanded_content_delay: Duration::from_millis(EXPANDED_CONTENT_DELAY_MS),
        }
    }

    /// Log the effective configuration at startup.
    pub fn log_config(&self) {
        let timing = self.timing();
        log_block_start!("Loaded configuration");
        log_indented!("Pill duration: {}ms", timing.pill_duration.as_millis());
        log_indented!(
            "Expanded duration: {}ms",
            timing.expanded_duration.as_millis()
        );
        log_indented!(
            "Animation duration: {}ms",
            self.animation_duration_ms
                .unwrap_or(DEFAULT_ANIMATION_DURATION_MS)
        );
    }
}

/// Default config file path, `None` when no config directory can be
/// determined (e.g. stripped-down service environments).
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("auroranotify").join("auroranotify.toml"))
}

/// Validate configured values against their accepted ranges.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(ms) = config.pill_duration_ms
        && !(MIN_DISPLAY_DURATION_MS..=MAX_DISPLAY_DURATION_MS).contains(&ms)
    {
        anyhow::bail!(
            "pill_duration_ms must be between {MIN_DISPLAY_DURATION_MS} and {MAX_DISPLAY_DURATION_MS}, got {ms}"
        );
    }
    if let Some(ms) = config.expanded_duration_ms
        && !(MIN_DISPLAY_DURATION_MS..=MAX_DISPLAY_DURATION_MS).contains(&ms)
    {
        anyhow::bail!(
            "expanded_duration_ms must be between {MIN_DISPLAY_DURATION_MS} and {MAX_DISPLAY_DURATION_MS}, got {ms}"
        );
    }
    if let Some(ms) = config.animation_duration_ms
        && !(MIN_ANIMATION_DURATION_MS..=MAX_ANIMATION_DURATION_MS).contains(&ms)
    {
        anyhow::bail!(
            "animation_duration_ms must be between {MIN_ANIMATION_DURATION_MS} and {MAX_ANIMATION_DURATION_MS}, got {ms}"
        );
    }
    Ok(())
}
