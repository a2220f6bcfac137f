//! Clip store transitions.
//!
//! Every function takes a snapshot and returns the next one. The input is
//! never modified. Only the tracks an edit touches are rebuilt; every
//! other track (and every untouched clip) is shared with the input by
//! `Arc`, so readers can detect change by pointer comparison.
//!
//! References to clips or tracks that do not exist are absorbed: the
//! transition returns the input unchanged.

use std::sync::Arc;

use cutline_project_model::{
    Clip, ClipId, ClipPatch, MediaKind, ProjectState, Track, TrackId, Transform,
    DEFAULT_CLIP_DURATION_SECS,
};

/// Append a new clip of `kind` at the playhead and select it.
///
/// The clip goes on the first track of the same kind. Without one, the
/// state is returned unchanged.
pub fn add_clip(state: &ProjectState, kind: MediaKind, src: Option<String>) -> ProjectState {
    add_named_clip(state, kind, src, None)
}

/// [`add_clip`] with an explicit display name instead of the kind default.
pub fn add_named_clip(
    state: &ProjectState,
    kind: MediaKind,
    src: Option<String>,
    name: Option<String>,
) -> ProjectState {
    let Some(index) = state.tracks.iter().position(|t| t.kind == kind) else {
        tracing::debug!(%kind, "No track accepts clip kind; add ignored");
        return state.clone();
    };

    let (id, next_clip_seq) = state.fresh_clip_id();
    let target = &state.tracks[index];
    let clip = Clip {
        id: id.clone(),
        track_id: target.id.clone(),
        name: name.unwrap_or_else(|| kind.default_clip_name().to_string()),
        kind,
        start_time: state.current_time,
        duration: DEFAULT_CLIP_DURATION_SECS,
        src,
        transform: Transform::IDENTITY,
        volume: None,
        color: Some(kind.default_color().to_string()),
    };

    tracing::debug!(clip_id = %id, track_id = %target.id, start = state.current_time, "Clip added");

    let mut track = Track::clone(target);
    track.clips.push(Arc::new(clip));

    ProjectState {
        tracks: replace_track(&state.tracks, index, track),
        selected_clip_id: Some(id),
        next_clip_seq,
        ..state.clone()
    }
}

/// Merge `patch` over every clip whose id is `id`.
pub fn update_clip(state: &ProjectState, id: &ClipId, patch: &ClipPatch) -> ProjectState {
    let mut changed = false;

    let tracks: Arc<[Arc<Track>]> = state
        .tracks
        .iter()
        .map(|track| {
            if !track.contains_clip(id) {
                return Arc::clone(track);
            }
            let mut track_changed = false;
            let clips = track
                .clips
                .iter()
                .map(|clip| {
                    if &clip.id != id {
                        return Arc::clone(clip);
                    }
                    let merged = patch.apply(clip);
                    if merged == **clip {
                        Arc::clone(clip)
                    } else {
                        track_changed = true;
                        Arc::new(merged)
                    }
                })
                .collect();
            if !track_changed {
                return Arc::clone(track);
            }
            changed = true;
            Arc::new(Track {
                clips,
                ..Track::clone(track)
            })
        })
        .collect();

    if !changed {
        tracing::debug!(clip_id = %id, "Update matched nothing or changed nothing");
        return state.clone();
    }

    tracing::debug!(clip_id = %id, "Clip updated");
    ProjectState {
        tracks,
        ..state.clone()
    }
}

/// Remove clip `id` and clear the selection if it pointed at it.
pub fn delete_clip(state: &ProjectState, id: &ClipId) -> ProjectState {
    let Some(index) = state.track_index_of(id) else {
        tracing::debug!(clip_id = %id, "Delete of unknown clip ignored");
        return state.clone();
    };

    let source = &state.tracks[index];
    let track = Track {
        clips: source
            .clips
            .iter()
            .filter(|c| &c.id != id)
            .cloned()
            .collect(),
        ..Track::clone(source)
    };

    let selected_clip_id = match &state.selected_clip_id {
        Some(selected) if selected == id => None,
        other => other.clone(),
    };

    tracing::debug!(clip_id = %id, "Clip deleted");
    ProjectState {
        tracks: replace_track(&state.tracks, index, track),
        selected_clip_id,
        ..state.clone()
    }
}

/// Select clip `id`. Existence is not checked; readers treat a dangling
/// selection as nothing selected.
pub fn select_clip(state: &ProjectState, id: Option<ClipId>) -> ProjectState {
    if state.selected_clip_id == id {
        return state.clone();
    }
    ProjectState {
        selected_clip_id: id,
        ..state.clone()
    }
}

/// Move clip `id` to `start_time` on track `target`.
///
/// Within the same track the clip keeps its stacking position. Across
/// tracks it is appended (drawn on top) and its `track_id` follows. A
/// target track of a different kind, or an unknown clip or track, leaves
/// the state unchanged.
pub fn move_clip(
    state: &ProjectState,
    id: &ClipId,
    target: &TrackId,
    start_time: f64,
) -> ProjectState {
    let (Some(src_index), Some(dst_index)) = (
        state.track_index_of(id),
        state.tracks.iter().position(|t| &t.id == target),
    ) else {
        tracing::debug!(clip_id = %id, track_id = %target, "Move with unknown clip or track ignored");
        return state.clone();
    };
    if !start_time.is_finite() {
        return state.clone();
    }

    let source = &state.tracks[src_index];
    let destination = &state.tracks[dst_index];
    let Some(clip) = source.clip(id) else {
        return state.clone();
    };
    if clip.kind != destination.kind {
        tracing::debug!(
            clip_id = %id,
            clip_kind = %clip.kind,
            track_kind = %destination.kind,
            "Move onto track of another kind ignored"
        );
        return state.clone();
    }

    let moved = Arc::new(Clip {
        track_id: destination.id.clone(),
        start_time: start_time.max(0.0),
        ..Clip::clone(clip)
    });
    if *moved == **clip {
        return state.clone();
    }

    let tracks = if src_index == dst_index {
        let track = Track {
            clips: source
                .clips
                .iter()
                .map(|c| {
                    if &c.id == id {
                        Arc::clone(&moved)
                    } else {
                        Arc::clone(c)
                    }
                })
                .collect(),
            ..Track::clone(source)
        };
        replace_track(&state.tracks, src_index, track)
    } else {
        let stripped = Track {
            clips: source
                .clips
                .iter()
                .filter(|c| &c.id != id)
                .cloned()
                .collect(),
            ..Track::clone(source)
        };
        let mut grown = Track::clone(destination);
        grown.clips.push(moved);
        let tracks = replace_track(&state.tracks, src_index, stripped);
        replace_track(&tracks, dst_index, grown)
    };

    tracing::debug!(clip_id = %id, track_id = %target, start = start_time, "Clip moved");
    ProjectState {
        tracks,
        ..state.clone()
    }
}

/// Copy of `tracks` with slot `index` replaced and the rest shared.
fn replace_track(tracks: &[Arc<Track>], index: usize, track: Track) -> Arc<[Arc<Track>]> {
    let mut replacement = Some(Arc::new(track));
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if i == index {
                replacement.take().unwrap_or_else(|| Arc::clone(t))
            } else {
                Arc::clone(t)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_project_model::sample::sample_project;

    fn id(s: &str) -> ClipId {
        ClipId::new(s)
    }

    #[test]
    fn test_add_text_clip_at_playhead() {
        let mut state = sample_project();
        state.current_time = 12.5;
        let next = add_clip(&state, MediaKind::Text, None);

        let new_id = next.selected_clip_id.clone().unwrap();
        let clip = next.find_clip(&new_id).unwrap();
        assert_eq!(clip.start_time, 12.5);
        assert_eq!(clip.duration, 5.0);
        assert_eq!(clip.name, "New Text");
        assert_eq!(clip.color.as_deref(), Some("#ec4899"));
        assert_eq!(clip.transform, Transform::IDENTITY);
        assert_eq!(clip.track_id.as_str(), "track_2");
        assert_eq!(next.tracks[1].clips.last().unwrap().id, new_id);

        // Untouched tracks are shared, the input is intact.
        assert!(Arc::ptr_eq(&state.tracks[0], &next.tracks[0]));
        assert!(Arc::ptr_eq(&state.tracks[2], &next.tracks[2]));
        assert_eq!(state.clip_count(), 4);
        assert_eq!(next.clip_count(), 5);
    }

    #[test]
    fn test_add_without_matching_track_is_noop() {
        let state = sample_project();
        let next = add_clip(&state, MediaKind::Effect, None);
        assert!(next.is_unchanged_from(&state));
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let mut state = sample_project();
        for _ in 0..5 {
            state = add_clip(&state, MediaKind::Video, Some("asset://x".to_string()));
        }
        assert!(state.validate().is_ok());
        assert_eq!(state.clip_count(), 9);
    }

    #[test]
    fn test_add_named_clip() {
        let state = sample_project();
        let next = add_named_clip(&state, MediaKind::Text, None, Some("Hello".to_string()));
        assert_eq!(next.selected_clip().unwrap().name, "Hello");
    }

    #[test]
    fn test_update_only_touches_target() {
        let state = sample_project();
        let patch = ClipPatch {
            scale: Some(2.0),
            ..Default::default()
        };
        let next = update_clip(&state, &id("clip_2"), &patch);

        let before = state.find_clip(&id("clip_2")).unwrap();
        let after = next.find_clip(&id("clip_2")).unwrap();
        assert_eq!(after.transform.scale, 2.0);
        assert_eq!(
            Clip {
                transform: before.transform,
                ..Clip::clone(after)
            },
            **before
        );

        assert!(Arc::ptr_eq(
            &state.tracks[0].clips[0],
            &next.tracks[0].clips[0]
        ));
        for i in 1..state.tracks.len() {
            assert!(Arc::ptr_eq(&state.tracks[i], &next.tracks[i]));
        }
        assert_eq!(before.transform.scale, 1.0);
    }

    #[test]
    fn test_update_unknown_or_noop_patch_keeps_snapshot() {
        let state = sample_project();
        let patch = ClipPatch {
            opacity: Some(0.5),
            ..Default::default()
        };
        assert!(update_clip(&state, &id("missing"), &patch).is_unchanged_from(&state));

        let same = ClipPatch {
            scale: Some(1.0),
            ..Default::default()
        };
        assert!(update_clip(&state, &id("clip_1"), &same).is_unchanged_from(&state));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let state = sample_project();
        assert_eq!(state.selected_clip_id, Some(id("clip_1")));
        let next = delete_clip(&state, &id("clip_1"));
        assert!(next.selected_clip_id.is_none());
        assert!(!next.has_clip(&id("clip_1")));
        assert!(Arc::ptr_eq(&state.tracks[1], &next.tracks[1]));
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let state = sample_project();
        let next = delete_clip(&state, &id("clip_4"));
        assert_eq!(next.selected_clip_id, Some(id("clip_1")));
        assert!(next.tracks[2].clips.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let state = sample_project();
        assert!(delete_clip(&state, &id("nope")).is_unchanged_from(&state));
    }

    #[test]
    fn test_select_does_not_validate() {
        let state = sample_project();
        let next = select_clip(&state, Some(id("ghost")));
        assert_eq!(next.selected_clip_id, Some(id("ghost")));
        assert!(next.selected_clip().is_none());
        assert!(Arc::ptr_eq(&state.tracks, &next.tracks));

        let cleared = select_clip(&next, None);
        assert!(cleared.selected_clip_id.is_none());
    }

    #[test]
    fn test_move_within_track_keeps_order() {
        let state = sample_project();
        let next = move_clip(&state, &id("clip_1"), &TrackId::new("track_1"), 20.0);
        let track = &next.tracks[0];
        assert_eq!(track.clips[0].id, id("clip_1"));
        assert_eq!(track.clips[0].start_time, 20.0);
        assert!(Arc::ptr_eq(&state.tracks[0].clips[1], &track.clips[1]));
    }

    #[test]
    fn test_move_across_tracks_rehomes_clip() {
        let tracks = vec![
            Track::new("v1", "V1", MediaKind::Video),
            Track::new("v2", "V2", MediaKind::Video),
        ];
        let state = ProjectState::new("p", "Move", 30.0, 20.0, tracks).unwrap();
        let state = add_clip(&state, MediaKind::Video, None);
        let clip_id = state.selected_clip_id.clone().unwrap();

        let next = move_clip(&state, &clip_id, &TrackId::new("v2"), -3.0);
        assert!(next.tracks[0].clips.is_empty());
        let moved = &next.tracks[1].clips[0];
        assert_eq!(moved.track_id.as_str(), "v2");
        assert_eq!(moved.start_time, 0.0);
        next.validate().unwrap();
    }

    #[test]
    fn test_move_onto_other_kind_is_noop() {
        let state = sample_project();
        let next = move_clip(&state, &id("clip_1"), &TrackId::new("track_3"), 2.0);
        assert!(next.is_unchanged_from(&state));
    }
}
