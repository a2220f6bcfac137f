//! Editor configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CutlineError, CutlineResult};

/// Global editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Defaults for newly created projects.
    pub project: ProjectDefaults,

    /// Playback loop settings.
    pub playback: PlaybackDefaults,

    /// Timeline grid geometry.
    pub timeline: TimelineGridDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters used when a new project is provisioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Project display name.
    pub name: String,

    /// Fixed timeline length in seconds.
    pub total_duration_secs: f64,

    /// Horizontal zoom in pixels per second.
    pub zoom_level: f64,
}

/// Playback loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackDefaults {
    /// Target frame callback rate (Hz). Not guaranteed by the host.
    pub frame_rate_hz: u32,

    /// What playback does when the playhead reaches the end.
    pub end_behavior: EndOfTimeline,
}

/// Playback behavior when the playhead reaches `total_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfTimeline {
    /// Stop and rewind the playhead to zero.
    #[default]
    RewindAndStop,
    /// Stop with the playhead parked at the end.
    StopAtEnd,
    /// Wrap around and keep playing.
    Loop,
}

/// Timeline grid layout constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineGridDefaults {
    /// Width of the track header column left of the track area (pixels).
    pub track_header_width_px: f64,

    /// Seconds between labelled ruler ticks.
    pub ruler_step_secs: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cutline=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            name: "New Project".to_string(),
            total_duration_secs: 30.0,
            zoom_level: 20.0,
        }
    }
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            end_behavior: EndOfTimeline::default(),
        }
    }
}

impl Default for TimelineGridDefaults {
    fn default() -> Self {
        Self {
            track_header_width_px: 256.0,
            ruler_step_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl EditorConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> CutlineResult<Self> {
        if !path.exists() {
            return Err(CutlineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> CutlineResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> CutlineResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the timeline cannot operate with.
    pub fn validate(&self) -> CutlineResult<()> {
        let p = &self.project;
        if !(p.total_duration_secs.is_finite() && p.total_duration_secs > 0.0) {
            return Err(CutlineError::config(format!(
                "project.total_duration_secs must be > 0, got {}",
                p.total_duration_secs
            )));
        }
        if !(p.zoom_level.is_finite() && p.zoom_level > 0.0) {
            return Err(CutlineError::config(format!(
                "project.zoom_level must be > 0, got {}",
                p.zoom_level
            )));
        }
        if self.playback.frame_rate_hz == 0 {
            return Err(CutlineError::config("playback.frame_rate_hz must be > 0"));
        }
        if self.timeline.ruler_step_secs == 0 {
            return Err(CutlineError::config("timeline.ruler_step_secs must be > 0"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cutline").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.playback.frame_rate_hz, 60);
        assert!((config.project.zoom_level - 20.0).abs() < 1e-9);
        assert!((config.project.total_duration_secs - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"playback":{"frame_rate_hz":30}}"#).unwrap();
        assert_eq!(config.playback.frame_rate_hz, 30);
        assert_eq!(config.playback.end_behavior, EndOfTimeline::RewindAndStop);
        assert_eq!(config.project.name, "New Project");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_end_behavior_json() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"playback":{"end_behavior":"stop_at_end"}}"#).unwrap();
        assert_eq!(config.playback.end_behavior, EndOfTimeline::StopAtEnd);
        assert_eq!(config.playback.frame_rate_hz, 60);
    }

    #[test]
    fn test_validate_rejects_zero_zoom() {
        let mut config = EditorConfig::default();
        config.project.zoom_level = 0.0;
        assert!(matches!(
            config.validate(),
            Err(CutlineError::Config { .. })
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("cutline_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = EditorConfig::default();
        config.project.name = "Trailer".to_string();
        config.save_to(&path).unwrap();

        let loaded = EditorConfig::load_from(&path).unwrap();
        assert_eq!(loaded.project.name, "Trailer");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("cutline_missing_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            EditorConfig::load_from(&path),
            Err(CutlineError::FileNotFound { .. })
        ));
    }
}
