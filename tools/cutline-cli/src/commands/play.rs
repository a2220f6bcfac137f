//! Real-time playback in the terminal.

use std::time::Duration;

use cutline_common::clock::{Clock, FrameRateController, MonotonicClock};
use cutline_common::config::EditorConfig;
use cutline_timeline_engine::{ActiveClipCache, EditorCommand};

use super::{status_line, ProjectSource};

pub async fn run(
    config: &EditorConfig,
    source: &ProjectSource,
    from: f64,
    limit: Option<f64>,
    report_ms: u64,
) -> anyhow::Result<()> {
    let mut session = source.open(config)?;
    session.apply(EditorCommand::Seek { time: from });
    session.apply(EditorCommand::Play);

    let (handle, task) = session.spawn(config.playback.frame_rate_hz);
    let mut snapshots = handle.subscribe();

    let wall = MonotonicClock::start();
    let limit = limit
        .filter(|l| l.is_finite() && *l >= 0.0)
        .map(Duration::from_secs_f64);
    let mut pacer = FrameRateController::with_interval(Duration::from_millis(report_ms.max(1)));
    let mut active = ActiveClipCache::new();
    let mut stop_sent = false;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                let finished = !snap.state.is_playing;
                if finished || pacer.should_tick(wall.now()) {
                    let names: Vec<&str> = active
                        .resolve(&snap.state)
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect();
                    println!("{}  [{}]", status_line(&snap.state), names.join(", "));
                }
                if finished {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c(), if !stop_sent => {
                println!("Interrupted.");
                handle.send(EditorCommand::Stop)?;
                stop_sent = true;
            }
        }

        if !stop_sent && limit.is_some_and(|l| wall.now() >= l) {
            handle.send(EditorCommand::Stop)?;
            stop_sent = true;
        }
    }

    drop(snapshots);
    drop(handle);
    let session = task.await?;
    println!("Finished at {}", status_line(session.state()));
    tracing::debug!(
        hits = active.hits(),
        misses = active.misses(),
        "Active clip cache"
    );
    Ok(())
}
