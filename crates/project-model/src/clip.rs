//! Clip types: identity, media kind, transform, and partial updates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::track::TrackId;

/// Default length of a newly added clip, in seconds.
pub const DEFAULT_CLIP_DURATION_SECS: f64 = 5.0;

/// Stable, project-unique clip identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the n-th allocated clip (`clip_<n>`).
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("clip_{n}"))
    }

    /// The `n` of a `clip_<n>` id.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("clip_")?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Semantic kind shared by tracks and the clips they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Text,
    Effect,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Video,
        MediaKind::Audio,
        MediaKind::Text,
        MediaKind::Effect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Text => "text",
            MediaKind::Effect => "effect",
        }
    }

    /// Name given to a freshly added clip of this kind.
    pub fn default_clip_name(self) -> &'static str {
        match self {
            MediaKind::Text => "New Text",
            MediaKind::Effect => "New Effect",
            MediaKind::Video | MediaKind::Audio => "New Clip",
        }
    }

    /// Timeline color given to a freshly added clip of this kind.
    pub fn default_color(self) -> &'static str {
        match self {
            MediaKind::Video => "#3b82f6",
            MediaKind::Audio => "#10b981",
            MediaKind::Text => "#ec4899",
            MediaKind::Effect => "#a855f7",
        }
    }

    /// Whether clips of this kind draw anything on the preview canvas.
    pub fn is_visual(self) -> bool {
        !matches!(self, MediaKind::Audio)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Placement of a clip on the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal offset from canvas center (percent).
    pub x: f64,
    /// Vertical offset from canvas center (percent).
    pub y: f64,
    /// Uniform scale factor, > 0.
    pub scale: f64,
    /// Rotation in degrees. Any real value; see [`Transform::display_rotation`].
    pub rotation: f64,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        opacity: 1.0,
    };

    /// Rotation folded into `[0, 360)`.
    pub fn display_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A media or text segment placed on a track.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    /// Owning track.
    pub track_id: TrackId,
    /// Display name; the rendered text for text clips.
    pub name: String,
    pub kind: MediaKind,
    /// Start on the timeline in seconds, >= 0.
    pub start_time: f64,
    /// Length in seconds, > 0.
    pub duration: f64,
    /// Opaque media reference (URL or identifier).
    pub src: Option<String>,
    pub transform: Transform,
    /// Gain, >= 0. `None` means unity.
    pub volume: Option<f64>,
    /// Timeline display color.
    pub color: Option<String>,
}

impl Clip {
    /// Exclusive end of the active interval.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` falls in `[start_time, start_time + duration)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }

    /// Volume with the unity default applied.
    pub fn effective_volume(&self) -> f64 {
        self.volume.unwrap_or(1.0)
    }
}

/// Field-wise partial update for a clip. `None` leaves a field untouched.
///
/// Values that would break a clip invariant are sanitized on merge:
/// non-finite numbers are ignored, `start_time` is floored at zero,
/// non-positive `duration`/`scale` are ignored, `opacity` is clamped to
/// `[0, 1]` and `volume` is floored at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub src: Option<String>,
    pub color: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub volume: Option<f64>,
}

impl ClipPatch {
    pub fn is_empty(&self) -> bool {
        *self == ClipPatch::default()
    }

    /// Merge this patch over `clip`, returning the updated clip.
    pub fn apply(&self, clip: &Clip) -> Clip {
        let mut out = clip.clone();

        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(src) = &self.src {
            out.src = Some(src.clone());
        }
        if let Some(color) = &self.color {
            out.color = Some(color.clone());
        }
        if let Some(start) = finite(self.start_time) {
            out.start_time = start.max(0.0);
        }
        if let Some(duration) = finite(self.duration).filter(|d| *d > 0.0) {
            out.duration = duration;
        }
        if let Some(x) = finite(self.x) {
            out.transform.x = x;
        }
        if let Some(y) = finite(self.y) {
            out.transform.y = y;
        }
        if let Some(scale) = finite(self.scale).filter(|s| *s > 0.0) {
            out.transform.scale = scale;
        }
        if let Some(rotation) = finite(self.rotation) {
            out.transform.rotation = rotation;
        }
        if let Some(opacity) = finite(self.opacity) {
            out.transform.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(volume) = finite(self.volume) {
            out.volume = Some(volume.max(0.0));
        }

        out
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
