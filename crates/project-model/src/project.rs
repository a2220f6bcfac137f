//! The project snapshot.
//!
//! A `ProjectState` is the single source of truth for one editing
//! session. It is never mutated after construction: every edit produces
//! a new snapshot, so a reader holding an older one keeps a consistent
//! view.

use std::collections::HashSet;
use std::sync::Arc;

use crate::clip::{Clip, ClipId, MediaKind};
use crate::track::{Track, TrackId};

/// Root aggregate of an editing session.
#[derive(Debug, Clone)]
pub struct ProjectState {
    pub id: String,

    /// Human-readable project name.
    pub name: String,

    /// Playhead position in seconds, within `[0, total_duration]`.
    pub current_time: f64,

    /// Timeline length in seconds. Fixed for a session.
    pub total_duration: f64,

    pub is_playing: bool,

    /// Horizontal zoom in pixels per second.
    pub zoom_level: f64,

    /// Tracks in display order.
    pub tracks: Arc<[Arc<Track>]>,

    /// Selected clip, if any. May dangle after external edits; see
    /// [`ProjectState::selected_clip`].
    pub selected_clip_id: Option<ClipId>,

    /// Next candidate sequence number for `clip_<n>` ids.
    pub next_clip_seq: u64,
}

impl ProjectState {
    /// Build and validate a stopped project with the playhead at zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        total_duration: f64,
        zoom_level: f64,
        tracks: Vec<Track>,
    ) -> Result<Self, ProjectError> {
        let tracks: Arc<[Arc<Track>]> = tracks.into_iter().map(Arc::new).collect();
        let next_clip_seq = tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .filter_map(|c| c.id.sequence())
            .max()
            .map_or(1, |n| n.saturating_add(1));
        let state = Self {
            id: id.into(),
            name: name.into(),
            current_time: 0.0,
            total_duration,
            is_playing: false,
            zoom_level,
            next_clip_seq,
            tracks,
            selected_clip_id: None,
        };
        state.validate()?;
        Ok(state)
    }

    /// One empty track per media kind.
    pub fn default_tracks() -> Vec<Track> {
        vec![
            Track::new("track_1", "Video Track 1", MediaKind::Video),
            Track::new("track_2", "Text Overlay", MediaKind::Text),
            Track::new("track_3", "Music", MediaKind::Audio),
            Track::new("track_4", "Effects", MediaKind::Effect),
        ]
    }

    /// Iterate every clip with its owning track, in track then stored order.
    pub fn clips(&self) -> impl Iterator<Item = (&Arc<Track>, &Arc<Clip>)> {
        self.tracks
            .iter()
            .flat_map(|track| track.clips.iter().map(move |clip| (track, clip)))
    }

    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    pub fn find_clip(&self, id: &ClipId) -> Option<&Arc<Clip>> {
        self.tracks.iter().find_map(|t| t.clip(id))
    }

    pub fn has_clip(&self, id: &ClipId) -> bool {
        self.find_clip(id).is_some()
    }

    pub fn track(&self, id: &TrackId) -> Option<&Arc<Track>> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    /// Index of the track holding clip `id`.
    pub fn track_index_of(&self, id: &ClipId) -> Option<usize> {
        self.tracks.iter().position(|t| t.contains_clip(id))
    }

    /// The selected clip. A dangling selection reads as nothing selected.
    pub fn selected_clip(&self) -> Option<&Arc<Clip>> {
        self.selected_clip_id
            .as_ref()
            .and_then(|id| self.find_clip(id))
    }

    /// Whether `selected_clip_id` names a clip that does not exist.
    pub fn selection_is_dangling(&self) -> bool {
        self.selected_clip_id.is_some() && self.selected_clip().is_none()
    }

    /// Allocate a fresh `clip_<n>` id that no clip in this snapshot uses.
    ///
    /// Returns the id and the sequence value to store for the next call.
    pub fn fresh_clip_id(&self) -> (ClipId, u64) {
        let taken: HashSet<&ClipId> = self.clips().map(|(_, c)| &c.id).collect();
        let mut seq = self.next_clip_seq.max(1);
        loop {
            let candidate = ClipId::from_sequence(seq);
            seq += 1;
            if !taken.contains(&candidate) {
                return (candidate, seq);
            }
        }
    }

    /// Whether `other` is the same snapshot content, using pointer
    /// identity for the track list.
    pub fn is_unchanged_from(&self, other: &ProjectState) -> bool {
        Arc::ptr_eq(&self.tracks, &other.tracks)
            && self.current_time.to_bits() == other.current_time.to_bits()
            && self.is_playing == other.is_playing
            && self.selected_clip_id == other.selected_clip_id
            && self.next_clip_seq == other.next_clip_seq
            && self.zoom_level.to_bits() == other.zoom_level.to_bits()
            && self.total_duration.to_bits() == other.total_duration.to_bits()
            && self.id == other.id
            && self.name == other.name
    }

    /// Check every structural invariant of the snapshot.
    ///
    /// A dangling selection is tolerated; readers go through
    /// [`ProjectState::selected_clip`].
    pub fn validate(&self) -> Result<(), ProjectError> {
        if !(self.total_duration.is_finite() && self.total_duration > 0.0) {
            return Err(ProjectError::InvalidDuration {
                total_duration: self.total_duration,
            });
        }
        if !(self.zoom_level.is_finite() && self.zoom_level > 0.0) {
            return Err(ProjectError::InvalidZoom {
                zoom_level: self.zoom_level,
            });
        }
        if !(self.current_time >= 0.0 && self.current_time <= self.total_duration) {
            return Err(ProjectError::TimeOutOfRange {
                current_time: self.current_time,
                total_duration: self.total_duration,
            });
        }

        let mut seen = HashSet::new();
        for (track, clip) in self.clips() {
            if !seen.insert(&clip.id) {
                return Err(ProjectError::DuplicateClipId {
                    id: clip.id.clone(),
                });
            }
            if clip.track_id != track.id {
                return Err(ProjectError::MisplacedClip {
                    id: clip.id.clone(),
                    track: track.id.clone(),
                    claimed: clip.track_id.clone(),
                });
            }
            if clip.kind != track.kind {
                return Err(ProjectError::KindMismatch {
                    id: clip.id.clone(),
                    clip_kind: clip.kind,
                    track_kind: track.kind,
                });
            }
            check_clip(clip)?;
        }
        Ok(())
    }
}

fn check_clip(clip: &Clip) -> Result<(), ProjectError> {
    let invalid = |message: &str| ProjectError::InvalidClip {
        id: clip.id.clone(),
        message: message.to_string(),
    };
    if !(clip.start_time.is_finite() && clip.start_time >= 0.0) {
        return Err(invalid("start_time must be >= 0"));
    }
    if !(clip.duration.is_finite() && clip.duration > 0.0) {
        return Err(invalid("duration must be > 0"));
    }
    if !(clip.transform.scale.is_finite() && clip.transform.scale > 0.0) {
        return Err(invalid("scale must be > 0"));
    }
    if !(0.0..=1.0).contains(&clip.transform.opacity) {
        return Err(invalid("opacity must be within [0, 1]"));
    }
    if clip.volume.is_some_and(|v| !(v.is_finite() && v >= 0.0)) {
        return Err(invalid("volume must be >= 0"));
    }
    Ok(())
}

/// Invariant violations reported by [`ProjectState::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("total duration must be > 0, got {total_duration}")]
    InvalidDuration { total_duration: f64 },

    #[error("zoom level must be > 0, got {zoom_level}")]
    InvalidZoom { zoom_level: f64 },

    #[error("current time {current_time} outside [0, {total_duration}]")]
    TimeOutOfRange {
        current_time: f64,
        total_duration: f64,
    },

    #[error("duplicate clip id {id}")]
    DuplicateClipId { id: ClipId },

    #[error("clip {id} lives on track {track} but claims track {claimed}")]
    MisplacedClip {
        id: ClipId,
        track: TrackId,
        claimed: TrackId,
    },

    #[error("clip {id} is {clip_kind} but its track holds {track_kind}")]
    KindMismatch {
        id: ClipId,
        clip_kind: MediaKind,
        track_kind: MediaKind,
    },

    #[error("invalid clip {id}: {message}")]
    InvalidClip { id: ClipId, message: String },
}
