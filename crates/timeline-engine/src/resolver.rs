//! Active-clip resolution at the playhead.

use std::sync::Arc;

use cutline_project_model::{Clip, ClipId, ProjectState, Track};

/// The clip shown on each visible track at `state.current_time`, in track
/// order.
///
/// Per track, the first clip in stored order whose half-open interval
/// contains the playhead wins. Tracks with no such clip contribute
/// nothing.
pub fn resolve_active_clips(state: &ProjectState) -> Vec<Arc<Clip>> {
    resolve_at(&state.tracks, state.current_time)
}

fn resolve_at(tracks: &[Arc<Track>], time: f64) -> Vec<Arc<Clip>> {
    tracks
        .iter()
        .filter(|t| t.is_visible)
        .filter_map(|t| t.active_clip_at(time).cloned())
        .collect()
}

/// One drawable layer of the preview composite.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub clip: Arc<Clip>,
    /// Index of the owning track; later tracks draw on top.
    pub track_index: usize,
    /// Whether the selection overlay belongs on this layer.
    pub selected: bool,
}

impl RenderLayer {
    /// Audio layers are resolved for mixing but draw nothing.
    pub fn is_visual(&self) -> bool {
        self.clip.kind.is_visual()
    }
}

/// Everything the preview renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub time: f64,
    pub layers: Vec<RenderLayer>,
    /// The selection, only if it names an existing clip.
    pub selected: Option<ClipId>,
}

impl RenderFrame {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn visual_layers(&self) -> impl Iterator<Item = &RenderLayer> {
        self.layers.iter().filter(|l| l.is_visual())
    }
}

/// Build the render frame for the current playhead.
pub fn render_frame(state: &ProjectState) -> RenderFrame {
    let selected = state.selected_clip().map(|c| c.id.clone());
    let layers = state
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_visible)
        .filter_map(|(track_index, t)| {
            t.active_clip_at(state.current_time).map(|clip| RenderLayer {
                selected: selected.as_ref() == Some(&clip.id),
                clip: Arc::clone(clip),
                track_index,
            })
        })
        .collect();

    RenderFrame {
        time: state.current_time,
        layers,
        selected,
    }
}

/// Memoizes [`resolve_active_clips`] on `(current_time, tracks)`.
///
/// Track lists are compared by pointer, so any edit that rebuilt the list
/// invalidates the entry. The cache holds a reference to the list it was
/// computed from, so the pointer cannot be reused while cached.
#[derive(Debug, Default)]
pub struct ActiveClipCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CacheEntry {
    time_bits: u64,
    tracks: Arc<[Arc<Track>]>,
    clips: Vec<Arc<Clip>>,
}

impl ActiveClipCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, state: &ProjectState) -> &[Arc<Clip>] {
        let time_bits = state.current_time.to_bits();
        let fresh = matches!(
            &self.entry,
            Some(e) if e.time_bits == time_bits && Arc::ptr_eq(&e.tracks, &state.tracks)
        );
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = Some(CacheEntry {
                time_bits,
                tracks: Arc::clone(&state.tracks),
                clips: resolve_active_clips(state),
            });
        }
        match &self.entry {
            Some(entry) => &entry.clips,
            None => &[],
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
