pub mod config;
pub mod generate;
pub mod info;
pub mod play;
pub mod replay;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use cutline_common::clock::{Clock, MonotonicClock};
use cutline_common::config::EditorConfig;
use cutline_project_model::sample::sample_project;
use cutline_project_model::{format_timecode, ProjectState};
use cutline_timeline_engine::{parse_commands, EditorCommand, EditorSession};

/// Where the starting project comes from.
pub struct ProjectSource {
    pub empty: bool,
    pub script: Option<PathBuf>,
}

impl ProjectSource {
    /// Build the starting project and apply the setup script, if any.
    pub fn open(&self, config: &EditorConfig) -> anyhow::Result<EditorSession> {
        let state = if self.empty {
            ProjectState::new(
                "proj_new",
                config.project.name.clone(),
                config.project.total_duration_secs,
                config.project.zoom_level,
                ProjectState::default_tracks(),
            )
            .context("Failed to create empty project")?
        } else {
            sample_project()
        };

        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::start());
        let mut session = EditorSession::new(state, clock, config.playback.end_behavior);

        if let Some(path) = &self.script {
            let commands = load_script(path)?;
            let changed = session.apply_all(commands);
            tracing::debug!(path = %path.display(), changed, "Setup script applied");
        }
        Ok(session)
    }
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<EditorCommand>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_commands(&content).with_context(|| format!("Failed to parse script {}", path.display()))
}

/// One-line playhead summary.
pub fn status_line(state: &ProjectState) -> String {
    format!(
        "{} / {} {}",
        format_timecode(state.current_time),
        format_timecode(state.total_duration),
        if state.is_playing { "playing" } else { "stopped" }
    )
}
