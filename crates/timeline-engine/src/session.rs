//! The editor session: the single writer of project state.
//!
//! The session owns the current snapshot slot. Commands and advance steps
//! are applied one at a time against the latest snapshot, and each
//! resulting snapshot is published whole over a `watch` channel. Readers
//! only ever hold `Arc<ProjectState>` values and never a mutation handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cutline_common::clock::{frame_interval, Clock};
use cutline_common::config::EndOfTimeline;
use cutline_common::error::{CutlineError, CutlineResult};
use cutline_project_model::ProjectState;

use crate::command::EditorCommand;
use crate::scheduler::{seek, PlaybackScheduler, StepOutcome, StepTicket};
use crate::store;

/// A published project snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Increments on every published change.
    pub version: u64,
    pub state: Arc<ProjectState>,
}

pub struct EditorSession {
    current: Arc<ProjectState>,
    version: u64,
    scheduler: PlaybackScheduler,
    clock: Arc<dyn Clock>,
    publisher: watch::Sender<Snapshot>,
}

impl EditorSession {
    /// Start a session over `state`. A state that claims to be playing
    /// starts the scheduler with the current clock reading as baseline.
    pub fn new(state: ProjectState, clock: Arc<dyn Clock>, end_behavior: EndOfTimeline) -> Self {
        let mut scheduler = PlaybackScheduler::new(end_behavior);
        let state = if state.is_playing {
            scheduler.play(&ProjectState { is_playing: false, ..state }, clock.now())
        } else {
            state
        };
        let current = Arc::new(state);
        let (publisher, _) = watch::channel(Snapshot {
            version: 0,
            state: Arc::clone(&current),
        });
        tracing::info!(
            project = %current.name,
            tracks = current.tracks.len(),
            clips = current.clip_count(),
            epoch = clock.epoch_wall().unwrap_or("manual"),
            "Editor session opened"
        );
        Self {
            current,
            version: 0,
            scheduler,
            clock,
            publisher,
        }
    }

    pub fn state(&self) -> &Arc<ProjectState> {
        &self.current
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            state: Arc::clone(&self.current),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    /// Apply one command. Returns whether a new snapshot was published.
    pub fn apply(&mut self, command: EditorCommand) -> bool {
        tracing::debug!(command = command.name(), "Applying command");
        let state = &*self.current;
        let next = match command {
            EditorCommand::AddClip { kind, src, name } => {
                store::add_named_clip(state, kind, src, name)
            }
            EditorCommand::UpdateClip { id, patch } => store::update_clip(state, &id, &patch),
            EditorCommand::MoveClip {
                id,
                track_id,
                start_time,
            } => store::move_clip(state, &id, &track_id, start_time),
            EditorCommand::DeleteClip { id } => store::delete_clip(state, &id),
            EditorCommand::SelectClip { id } => store::select_clip(state, id),
            EditorCommand::Seek { time } => seek(state, time),
            EditorCommand::TogglePlay => self.scheduler.toggle_play(state, self.clock.now()),
            EditorCommand::Play => self.scheduler.play(state, self.clock.now()),
            EditorCommand::Stop => self.scheduler.stop(state),
        };
        self.publish(next)
    }

    /// Apply commands in order. Returns how many published a change.
    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = EditorCommand>) -> usize {
        commands
            .into_iter()
            .map(|c| self.apply(c))
            .filter(|changed| *changed)
            .count()
    }

    /// Fire the pending advance step, if playing.
    pub fn tick(&mut self) -> bool {
        match self.scheduler.pending() {
            Some(ticket) => self.fire_step(ticket),
            None => false,
        }
    }

    /// Fire a specific advance step. Stale tickets do nothing.
    pub fn fire_step(&mut self, ticket: StepTicket) -> bool {
        let now = self.clock.now();
        match self.scheduler.advance(ticket, &self.current, now) {
            StepOutcome::Advanced(next) | StepOutcome::ReachedEnd(next) => self.publish(next),
            StepOutcome::Stale => false,
        }
    }

    fn publish(&mut self, next: ProjectState) -> bool {
        if next.is_unchanged_from(&self.current) {
            return false;
        }
        self.version += 1;
        self.current = Arc::new(next);
        self.publisher.send_replace(self.snapshot());
        true
    }

    /// Drive the session until every command sender is dropped.
    ///
    /// Commands are applied as they arrive; while playing, one advance
    /// step fires per frame interval. Returns the session so the final
    /// state can be inspected.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<EditorCommand>,
        frame_rate_hz: u32,
    ) -> Self {
        let mut frames = tokio::time::interval(frame_interval(frame_rate_hz));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        let was_playing = self.scheduler.is_playing();
                        self.apply(command);
                        if !was_playing && self.scheduler.is_playing() {
                            frames.reset();
                        }
                    }
                    None => break,
                },
                _ = frames.tick(), if self.scheduler.is_playing() => {
                    self.tick();
                }
            }
        }

        tracing::info!(version = self.version, "Editor session closed");
        self
    }

    /// Spawn [`EditorSession::run`] on the current tokio runtime.
    pub fn spawn(self, frame_rate_hz: u32) -> (SessionHandle, JoinHandle<EditorSession>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SessionHandle {
            commands: tx,
            snapshots: self.subscribe(),
        };
        let task = tokio::spawn(self.run(rx, frame_rate_hz));
        (handle, task)
    }
}

/// Producer/reader side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<EditorCommand>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    /// Queue a command for the session.
    pub fn send(&self, command: EditorCommand) -> CutlineResult<()> {
        self.commands
            .send(command)
            .map_err(|_| CutlineError::SessionClosed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A fresh receiver for change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `pred`, or `timeout`
    /// elapses.
    pub async fn wait_for(
        &self,
        timeout: Duration,
        mut pred: impl FnMut(&ProjectState) -> bool,
    ) -> CutlineResult<Snapshot> {
        let mut rx = self.subscribe();
        let wait = async {
            loop {
                {
                    let snap = rx.borrow_and_update();
                    if pred(&snap.state) {
                        return Ok(snap.clone());
                    }
                }
                if rx.changed().await.is_err() {
                    return Err(CutlineError::SessionClosed);
                }
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {timeout:?} waiting for snapshot"))?
    }
}
