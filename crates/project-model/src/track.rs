//! Tracks: ordered lanes of clips sharing one media kind.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clip::{Clip, ClipId, MediaKind};

/// Track identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A lane on the timeline.
///
/// Clip order is stacking order within the track: it decides which clip
/// wins when several overlap the playhead.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub kind: MediaKind,
    /// Hidden tracks never contribute active clips.
    pub is_visible: bool,
    /// Reserved for edit protection; not enforced by the engine.
    pub is_locked: bool,
    pub clips: Vec<Arc<Clip>>,
}

impl Track {
    /// Create an empty, visible, unlocked track.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: TrackId::new(id),
            name: name.into(),
            kind,
            is_visible: true,
            is_locked: false,
            clips: Vec::new(),
        }
    }

    /// Builder-style clip list replacement. Clips are re-homed onto this track.
    pub fn with_clips(mut self, clips: impl IntoIterator<Item = Clip>) -> Self {
        self.clips = clips
            .into_iter()
            .map(|mut clip| {
                clip.track_id = self.id.clone();
                Arc::new(clip)
            })
            .collect();
        self
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Arc<Clip>> {
        self.clips.iter().find(|c| &c.id == id)
    }

    pub fn contains_clip(&self, id: &ClipId) -> bool {
        self.clips.iter().any(|c| &c.id == id)
    }

    /// First clip in stored order whose interval contains `time`.
    pub fn active_clip_at(&self, time: f64) -> Option<&Arc<Clip>> {
        self.clips.iter().find(|c| c.contains(time))
    }

    /// Last clip in stored order containing `time` (the one drawn on top
    /// in the timeline grid, and therefore the one a pointer lands on).
    pub fn topmost_clip_at(&self, time: f64) -> Option<&Arc<Clip>> {
        self.clips.iter().rev().find(|c| c.contains(time))
    }

    /// Clip a pointer at `time` lands on. The selected clip is raised
    /// above the others, so it wins whenever it contains `time`.
    pub fn clip_under_pointer(&self, time: f64, selected: Option<&ClipId>) -> Option<&Arc<Clip>> {
        selected
            .and_then(|id| self.clip(id))
            .filter(|c| c.contains(time))
            .or_else(|| self.topmost_clip_at(time))
    }

    /// End of the latest clip on this track (0 when empty).
    pub fn content_end(&self) -> f64 {
        self.clips
            .iter()
            .map(|c| c.end_time())
            .fold(0.0, f64::max)
    }
}
