use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cutline_common::clock::{ManualClock, MonotonicClock};
use cutline_common::config::EndOfTimeline;
use cutline_project_model::sample::sample_project;
use cutline_project_model::{
    Clip, ClipId, ClipPatch, MediaKind, ProjectState, Track, TrackId, Transform,
};
use cutline_timeline_engine::command::parse_commands;
use cutline_timeline_engine::resolver::render_frame;
use cutline_timeline_engine::{resolve_active_clips, seek, EditorCommand, EditorSession};

fn load_fixture_script(name: &str) -> Vec<EditorCommand> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("scripts")
        .join(name);

    let content = std::fs::read_to_string(path).expect("fixture script should be readable");
    parse_commands(&content).expect("fixture script should parse")
}

fn manual_session(state: ProjectState) -> (EditorSession, ManualClock) {
    let clock = ManualClock::new();
    let session = EditorSession::new(state, Arc::new(clock.clone()), EndOfTimeline::RewindAndStop);
    (session, clock)
}

fn active_ids(state: &ProjectState) -> Vec<String> {
    resolve_active_clips(state)
        .iter()
        .map(|c| c.id.as_str().to_string())
        .collect()
}

#[test]
fn gap_between_clips_leaves_track_empty() {
    let (mut session, _) = manual_session(sample_project());
    session.apply(EditorCommand::Seek { time: 8.5 });

    let active = resolve_active_clips(session.state());
    assert!(active.iter().all(|c| c.track_id.as_str() != "track_1"));
}

#[test]
fn add_text_clip_lands_at_playhead_and_is_selected() {
    let (mut session, _) = manual_session(sample_project());
    session.apply(EditorCommand::Seek { time: 6.0 });
    session.apply(EditorCommand::AddClip {
        kind: MediaKind::Text,
        src: None,
        name: None,
    });

    let state = session.state();
    let clip = state.selected_clip().expect("new clip should be selected");
    assert_eq!(clip.kind, MediaKind::Text);
    assert_eq!(clip.start_time, 6.0);
    assert_eq!(clip.duration, 5.0);
    assert_eq!(clip.name, "New Text");
    assert!(state.validate().is_ok());
}

#[test]
fn deleting_selected_clip_clears_selection() {
    let (mut session, _) = manual_session(sample_project());
    let selected = session.state().selected_clip_id.clone().unwrap();
    session.apply(EditorCommand::DeleteClip { id: selected });
    assert!(session.state().selected_clip_id.is_none());
}

#[test]
fn playback_from_28_rewinds_after_three_seconds_of_frames() {
    let (mut session, clock) = manual_session(sample_project());
    session.apply(EditorCommand::Seek { time: 28.0 });
    session.apply(EditorCommand::TogglePlay);

    // Uneven frame deltas summing to 3 s.
    for ms in [16, 17, 16, 951, 500, 500, 500, 500] {
        clock.advance(Duration::from_millis(ms));
        session.tick();
    }

    let state = session.state();
    assert!(!state.is_playing);
    assert_eq!(state.current_time, 0.0);
    assert!(session.scheduler().pending().is_none());
}

#[test]
fn scale_update_shares_everything_else() {
    let (mut session, _) = manual_session(sample_project());
    let before = Arc::clone(session.state());
    session.apply(EditorCommand::UpdateClip {
        id: ClipId::new("clip_2"),
        patch: ClipPatch {
            scale: Some(2.0),
            ..Default::default()
        },
    });
    let after = session.state();

    for (old_track, new_track) in before.tracks.iter().zip(after.tracks.iter()) {
        for (old, new) in old_track.clips.iter().zip(new_track.clips.iter()) {
            if old.id.as_str() == "clip_2" {
                assert_eq!(new.transform.scale, 2.0);
                let restored = cutline_project_model::Clip {
                    transform: old.transform,
                    ..cutline_project_model::Clip::clone(new)
                };
                assert_eq!(&restored, &**old);
            } else {
                assert!(Arc::ptr_eq(old, new));
            }
        }
        if old_track.id.as_str() != "track_1" {
            assert!(Arc::ptr_eq(old_track, new_track));
        }
    }
}

#[test]
fn fixture_script_replays_in_order() {
    let (mut session, _) = manual_session(sample_project());
    let changed = session.apply_all(load_fixture_script("title-sequence.json"));

    assert_eq!(changed, 8);
    let state = session.state();
    assert!(state.validate().is_ok());
    assert_eq!(state.current_time, 5.5);
    assert_eq!(state.selected_clip_id, Some(ClipId::new("clip_5")));
    assert!(!state.has_clip(&ClipId::new("clip_3")));

    let title = state.find_clip(&ClipId::new("clip_5")).unwrap();
    assert_eq!(title.name, "Opening Title");
    assert_eq!(title.transform.scale, 1.25);

    let moved = state.find_clip(&ClipId::new("clip_6")).unwrap();
    assert_eq!(moved.start_time, 14.0);

    assert_eq!(active_ids(state), vec!["clip_1", "clip_5", "clip_4"]);
    let frame = render_frame(state);
    assert_eq!(frame.visual_layers().count(), 2);
    assert!(frame.layers[1].selected);
}

#[test]
fn readers_keep_their_snapshot_while_playing() {
    let (mut session, clock) = manual_session(sample_project());
    let reader = session.subscribe();
    session.apply(EditorCommand::Play);
    let held = reader.borrow().clone();

    clock.advance(Duration::from_secs(2));
    session.tick();

    assert_eq!(held.state.current_time, 0.0);
    assert!((reader.borrow().state.current_time - 2.0).abs() < 1e-9);
    assert!(reader.borrow().version > held.version);
}

#[test]
fn deleted_clip_id_is_not_handed_out_again() {
    let existing = Clip {
        id: ClipId::new("clip_2"),
        track_id: TrackId::new("track_1"),
        name: "Imported".to_string(),
        kind: MediaKind::Video,
        start_time: 0.0,
        duration: 4.0,
        src: None,
        transform: Transform::IDENTITY,
        volume: None,
        color: None,
    };
    let tracks = vec![Track::new("track_1", "Video", MediaKind::Video).with_clips([existing])];
    let state = ProjectState::new("proj_import", "Imported", 30.0, 20.0, tracks).unwrap();
    let (mut session, _) = manual_session(state);

    let add = EditorCommand::AddClip {
        kind: MediaKind::Video,
        src: None,
        name: None,
    };
    assert!(session.apply(add.clone()));
    assert_eq!(session.state().selected_clip_id, Some(ClipId::new("clip_3")));

    assert!(session.apply(EditorCommand::DeleteClip {
        id: ClipId::new("clip_2"),
    }));
    assert!(session.apply(add));
    let fresh = session.state().selected_clip_id.clone().unwrap();
    assert_ne!(fresh.as_str(), "clip_2");

    let stale = EditorCommand::UpdateClip {
        id: ClipId::new("clip_2"),
        patch: ClipPatch {
            opacity: Some(0.5),
            ..Default::default()
        },
    };
    assert!(!session.apply(stale));
}

#[test]
fn seek_while_playing_continues_from_new_position() {
    let (mut session, clock) = manual_session(sample_project());
    session.apply(EditorCommand::Play);
    clock.advance(Duration::from_millis(500));
    session.tick();

    session.apply(EditorCommand::Seek { time: 20.0 });
    clock.advance(Duration::from_millis(250));
    session.tick();

    let state = session.state();
    assert!(state.is_playing);
    assert!((state.current_time - 20.25).abs() < 1e-9);
}

#[tokio::test]
async fn spawned_session_applies_commands_then_returns_on_close() {
    let session = EditorSession::new(
        sample_project(),
        Arc::new(MonotonicClock::start()),
        EndOfTimeline::RewindAndStop,
    );
    let (handle, task) = session.spawn(120);

    handle.send(EditorCommand::Seek { time: 4.0 }).unwrap();
    handle
        .send(EditorCommand::AddClip {
            kind: MediaKind::Audio,
            src: None,
            name: Some("Voiceover".to_string()),
        })
        .unwrap();

    let snap = handle
        .wait_for(Duration::from_secs(5), |s| s.clip_count() == 5)
        .await
        .unwrap();
    assert_eq!(snap.state.selected_clip().unwrap().name, "Voiceover");

    drop(handle);
    let session = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("session should stop once senders are gone")
        .unwrap();
    assert_eq!(session.state().current_time, 4.0);
    assert_eq!(session.version(), 2);
}

#[tokio::test]
async fn real_time_playback_reaches_end_and_rewinds() {
    let mut state = seek(&sample_project(), 29.9);
    state.is_playing = true;
    let session = EditorSession::new(
        state,
        Arc::new(MonotonicClock::start()),
        EndOfTimeline::RewindAndStop,
    );
    let (handle, _task) = session.spawn(200);

    let snap = handle
        .wait_for(Duration::from_secs(5), |s| !s.is_playing)
        .await
        .unwrap();
    assert_eq!(snap.state.current_time, 0.0);
}

#[tokio::test]
async fn stop_freezes_playhead() {
    let mut state = sample_project();
    state.is_playing = true;
    let session = EditorSession::new(
        state,
        Arc::new(MonotonicClock::start()),
        EndOfTimeline::RewindAndStop,
    );
    let (handle, _task) = session.spawn(200);

    handle
        .wait_for(Duration::from_secs(5), |s| s.current_time > 0.05)
        .await
        .unwrap();
    handle.send(EditorCommand::Stop).unwrap();
    let stopped = handle
        .wait_for(Duration::from_secs(5), |s| !s.is_playing)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let later = handle.snapshot();
    assert_eq!(later.version, stopped.version);
    assert_eq!(later.state.current_time, stopped.state.current_time);
}

#[tokio::test]
async fn send_after_session_ends_reports_closed() {
    let session = EditorSession::new(
        sample_project(),
        Arc::new(MonotonicClock::start()),
        EndOfTimeline::RewindAndStop,
    );
    let (handle, task) = session.spawn(60);
    task.abort();
    let _ = task.await;

    assert!(handle.send(EditorCommand::TogglePlay).is_err());
}
