//! Edit requests accepted by the editor session.

use serde::{Deserialize, Serialize};

use cutline_project_model::{ClipId, ClipPatch, MediaKind, TrackId};

/// A request to change the project. Commands are applied one at a time,
/// in arrival order, against the latest snapshot.
///
/// JSON form is internally tagged, e.g.
/// `{"type":"update_clip","id":"clip_1","patch":{"scale":2.0}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Add a clip of `kind` at the playhead (asset browser, text tools).
    AddClip {
        kind: MediaKind,
        #[serde(default)]
        src: Option<String>,
        /// Display name; the kind default when absent.
        #[serde(default)]
        name: Option<String>,
    },

    /// Merge fields into a clip (properties panel).
    UpdateClip { id: ClipId, patch: ClipPatch },

    /// Relocate a clip in time and/or onto another track of its kind.
    MoveClip {
        id: ClipId,
        track_id: TrackId,
        start_time: f64,
    },

    DeleteClip { id: ClipId },

    /// Set or clear the selection.
    SelectClip {
        #[serde(default)]
        id: Option<ClipId>,
    },

    /// Move the playhead.
    Seek { time: f64 },

    TogglePlay,

    Play,

    Stop,
}

impl EditorCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::AddClip { .. } => "add_clip",
            EditorCommand::UpdateClip { .. } => "update_clip",
            EditorCommand::MoveClip { .. } => "move_clip",
            EditorCommand::DeleteClip { .. } => "delete_clip",
            EditorCommand::SelectClip { .. } => "select_clip",
            EditorCommand::Seek { .. } => "seek",
            EditorCommand::TogglePlay => "toggle_play",
            EditorCommand::Play => "play",
            EditorCommand::Stop => "stop",
        }
    }
}

/// Parse a JSON array of commands.
pub fn parse_commands(json: &str) -> Result<Vec<EditorCommand>, serde_json::Error> {
    serde_json::from_str(json)
}
