//! Pointer interaction on the timeline grid.
//!
//! The inverse of the time model: turns pointer coordinates into seek
//! times, and pointer hits into selection. A hit on a clip selects it and
//! never also seeks.

use cutline_project_model::{pixels_to_seconds, ClipId, ProjectState};

use crate::command::EditorCommand;

/// Time under a pointer at `pointer_x`, given where the track area starts
/// on screen and how far it is scrolled. Never negative; the upper bound
/// is applied by the seek itself.
pub fn pointer_to_seek_time(
    pointer_x: f64,
    track_area_origin_x: f64,
    scroll_offset: f64,
    zoom: f64,
) -> f64 {
    if !(zoom.is_finite() && zoom > 0.0) {
        return 0.0;
    }
    let seconds = pixels_to_seconds(pointer_x - track_area_origin_x + scroll_offset, zoom);
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// Screen placement of the timeline grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// Screen x where second zero sits when unscrolled.
    pub track_area_origin_x: f64,
    /// Horizontal scroll of the track area in pixels.
    pub scroll_offset: f64,
    /// Pixels per second.
    pub zoom: f64,
}

impl TimelineGeometry {
    pub fn new(track_area_origin_x: f64, zoom: f64) -> Self {
        Self {
            track_area_origin_x,
            scroll_offset: 0.0,
            zoom,
        }
    }

    pub fn scrolled(self, scroll_offset: f64) -> Self {
        Self {
            scroll_offset,
            ..self
        }
    }

    pub fn time_at(&self, pointer_x: f64) -> f64 {
        pointer_to_seek_time(
            pointer_x,
            self.track_area_origin_x,
            self.scroll_offset,
            self.zoom,
        )
    }
}

/// What received a pointer press on the timeline grid.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Empty track area or ruler at screen x.
    TrackArea { x: f64 },
    /// A rendered clip block.
    Clip { id: ClipId },
}

/// Command for a pointer press. Clip hits select and stop there.
pub fn map_pointer(target: &PointerTarget, geometry: &TimelineGeometry) -> EditorCommand {
    match target {
        PointerTarget::Clip { id } => EditorCommand::SelectClip { id: Some(id.clone()) },
        PointerTarget::TrackArea { x } => EditorCommand::Seek {
            time: geometry.time_at(*x),
        },
    }
}

/// Resolve a press at `pointer_x` on track row `track_index` to its
/// target. The selected clip wins when it is under the pointer, then the
/// clip drawn on top (last in stored order).
pub fn hit_test(
    state: &ProjectState,
    geometry: &TimelineGeometry,
    track_index: Option<usize>,
    pointer_x: f64,
) -> PointerTarget {
    let time = geometry.time_at(pointer_x);
    track_index
        .and_then(|i| state.tracks.get(i))
        .and_then(|track| track.clip_under_pointer(time, state.selected_clip_id.as_ref()))
        .map(|clip| PointerTarget::Clip {
            id: clip.id.clone(),
        })
        .unwrap_or(PointerTarget::TrackArea { x: pointer_x })
}
