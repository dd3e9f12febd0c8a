//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{CalmError, Result};

/// Full calmkit configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub tui: TuiConfig,
}

/// Sequencer and overlay transition durations, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub body_scan_tense_ms: u64,
    pub body_scan_relax_ms: u64,
    pub inhale_ms: u64,
    pub hold_ms: u64,
    pub exhale_ms: u64,
    /// Delay before the overlay gets its `active` class (one frame).
    pub overlay_activate_ms: u64,
    /// Fade-out duration before the overlay is hidden.
    pub overlay_close_ms: u64,
}

/// Filesystem paths used by calmkit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    /// Where the single resumable quiz index is stored.
    pub progress_file: PathBuf,
    pub activity_log: PathBuf,
}

/// Activity log behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
    pub channel_capacity: usize,
}

/// Terminal front-end knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TuiConfig {
    /// Upper bound on the wait between redraws.
    pub frame_ms: u64,
    pub color: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            body_scan_tense_ms: 4_000,
            body_scan_relax_ms: 4_000,
            inhale_ms: 4_000,
            hold_ms: 7_000,
            exhale_ms: 8_000,
            overlay_activate_ms: 10,
            overlay_close_ms: 300,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[CALM-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("calmkit").join("config.toml");
        let data = home_dir.join(".local").join("share").join("calmkit");
        Self {
            config_file: cfg,
            progress_file: data.join("quiz-progress.json"),
            activity_log: data.join("activity.jsonl"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
            channel_capacity: 256,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            frame_ms: 100,
            color: true,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn body_scan_tense(&self) -> Duration {
        Duration::from_millis(self.body_scan_tense_ms)
    }

    #[must_use]
    pub const fn body_scan_relax(&self) -> Duration {
        Duration::from_millis(self.body_scan_relax_ms)
    }

    #[must_use]
    pub const fn inhale(&self) -> Duration {
        Duration::from_millis(self.inhale_ms)
    }

    #[must_use]
    pub const fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    #[must_use]
    pub const fn exhale(&self) -> Duration {
        Duration::from_millis(self.exhale_ms)
    }

    #[must_use]
    pub const fn overlay_activate(&self) -> Duration {
        Duration::from_millis(self.overlay_activate_ms)
    }

    #[must_use]
    pub const fn overlay_close(&self) -> Duration {
        Duration::from_millis(self.overlay_close_ms)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| CalmError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(CalmError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let timing = &mut self.timing;
        for (name, slot) in [
            ("CALMKIT_TIMING_BODY_SCAN_TENSE_MS", &mut timing.body_scan_tense_ms),
            ("CALMKIT_TIMING_BODY_SCAN_RELAX_MS", &mut timing.body_scan_relax_ms),
            ("CALMKIT_TIMING_INHALE_MS", &mut timing.inhale_ms),
            ("CALMKIT_TIMING_HOLD_MS", &mut timing.hold_ms),
            ("CALMKIT_TIMING_EXHALE_MS", &mut timing.exhale_ms),
            ("CALMKIT_TIMING_OVERLAY_ACTIVATE_MS", &mut timing.overlay_activate_ms),
            ("CALMKIT_TIMING_OVERLAY_CLOSE_MS", &mut timing.overlay_close_ms),
        ] {
            if let Some(raw) = lookup(name) {
                *slot = parse_env_u64(name, &raw)?;
            }
        }

        if let Some(raw) = lookup("CALMKIT_PATHS_PROGRESS_FILE") {
            self.paths.progress_file = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("CALMKIT_PATHS_ACTIVITY_LOG") {
            self.paths.activity_log = PathBuf::from(raw);
        }

        if let Some(raw) = lookup("CALMKIT_LOGGING_ENABLED") {
            self.logging.enabled = parse_env_bool("CALMKIT_LOGGING_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("CALMKIT_LOGGING_MAX_SIZE_BYTES") {
            self.logging.max_size_bytes = parse_env_u64("CALMKIT_LOGGING_MAX_SIZE_BYTES", &raw)?;
        }

        if let Some(raw) = lookup("CALMKIT_TUI_FRAME_MS") {
            self.tui.frame_ms = parse_env_u64("CALMKIT_TUI_FRAME_MS", &raw)?;
        }
        if let Some(raw) = lookup("CALMKIT_TUI_COLOR") {
            self.tui.color = parse_env_bool("CALMKIT_TUI_COLOR", &raw)?;
        }
        // NO_COLOR wins over everything else.
        if lookup("NO_COLOR").is_some() {
            self.tui.color = false;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let t = &self.timing;
        for (name, val) in [
            ("body_scan_tense_ms", t.body_scan_tense_ms),
            ("body_scan_relax_ms", t.body_scan_relax_ms),
            ("inhale_ms", t.inhale_ms),
            ("hold_ms", t.hold_ms),
            ("exhale_ms", t.exhale_ms),
        ] {
            if val == 0 {
                return Err(CalmError::InvalidConfig {
                    details: format!("timing.{name} must be > 0"),
                });
            }
            if val > 60_000 {
                return Err(CalmError::InvalidConfig {
                    details: format!("timing.{name} must be <= 60000, got {val}"),
                });
            }
        }

        // The close fade must finish before a human can plausibly reopen.
        if t.overlay_close_ms > 5_000 {
            return Err(CalmError::InvalidConfig {
                details: format!(
                    "timing.overlay_close_ms must be <= 5000, got {}",
                    t.overlay_close_ms
                ),
            });
        }
        if t.overlay_activate_ms > t.overlay_close_ms.max(1_000) {
            return Err(CalmError::InvalidConfig {
                details: "timing.overlay_activate_ms is longer than a close transition".to_string(),
            });
        }

        if !(16..=1_000).contains(&self.tui.frame_ms) {
            return Err(CalmError::InvalidConfig {
                details: format!("tui.frame_ms must be in [16, 1000], got {}", self.tui.frame_ms),
            });
        }

        if self.logging.enabled {
            if self.logging.channel_capacity == 0 {
                return Err(CalmError::InvalidConfig {
                    details: "logging.channel_capacity must be >= 1".to_string(),
                });
            }
            if self.logging.max_size_bytes < 1024 {
                return Err(CalmError::InvalidConfig {
                    details: format!(
                        "logging.max_size_bytes ({}) must be >= 1024",
                        self.logging.max_size_bytes
                    ),
                });
            }
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| CalmError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CalmError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected boolean"),
        }),
    }
}
