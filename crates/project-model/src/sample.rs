//! Built-in sample project shown on first launch.

use crate::clip::{Clip, ClipId, MediaKind, Transform};
use crate::project::ProjectState;
use crate::track::{Track, TrackId};

/// The starter project: two video clips with a gap, a title card, and a
/// music bed, with the first clip selected.
pub fn sample_project() -> ProjectState {
    let video = Track::new("track_1", "Video Track 1", MediaKind::Video).with_clips([
        clip(
            "clip_1",
            "Nature Footage",
            MediaKind::Video,
            0.0,
            8.0,
            Some("https://picsum.photos/id/10/800/450"),
        ),
        clip(
            "clip_2",
            "City Vibe",
            MediaKind::Video,
            9.0,
            5.0,
            Some("https://picsum.photos/id/12/800/450"),
        ),
    ]);

    let mut title = clip("clip_3", "Title Card", MediaKind::Text, 1.0, 3.0, None);
    title.transform.y = 50.0;
    title.transform.scale = 1.5;
    let text = Track::new("track_2", "Text Overlay", MediaKind::Text).with_clips([title]);

    let mut beat = clip("clip_4", "LoFi Beat", MediaKind::Audio, 0.0, 15.0, None);
    beat.volume = Some(0.8);
    let music = Track::new("track_3", "Music", MediaKind::Audio).with_clips([beat]);

    let tracks = [video, text, music].into_iter().map(std::sync::Arc::new).collect();

    ProjectState {
        id: "proj_001".to_string(),
        name: "New Project".to_string(),
        current_time: 0.0,
        total_duration: 30.0,
        is_playing: false,
        zoom_level: 20.0,
        tracks,
        selected_clip_id: Some(ClipId::new("clip_1")),
        next_clip_seq: 5,
    }
}

fn clip(
    id: &str,
    name: &str,
    kind: MediaKind,
    start_time: f64,
    duration: f64,
    src: Option<&str>,
) -> Clip {
    Clip {
        id: ClipId::new(id),
        track_id: TrackId::new(""),
        name: name.to_string(),
        kind,
        start_time,
        duration,
        src: src.map(str::to_string),
        transform: Transform::IDENTITY,
        volume: None,
        color: Some(kind.default_color().to_string()),
    }
}
