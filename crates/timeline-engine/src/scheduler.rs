//! Playback scheduling.
//!
//! Playback is an explicit two-state machine. While playing, exactly one
//! advance step is pending, identified by a [`StepTicket`]. Each step
//! moves the playhead by the wall-clock time since the previous step, so
//! late or missing frames change the step size, never the total.
//!
//! Stopping invalidates the pending ticket before the stop returns; a
//! step that fires with an invalidated ticket is a no-op.

use std::time::Duration;

use cutline_common::clock::secs_between;
use cutline_common::config::EndOfTimeline;
use cutline_project_model::ProjectState;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Stopped,
    Playing,
}

/// Handle for the one pending advance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTicket {
    /// Bumped on every start/stop; older tickets are stale.
    run: u64,
    step: u64,
}

/// Result of firing an advance step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Playhead moved; the next step is pending.
    Advanced(ProjectState),
    /// The end of the timeline was reached; playback has stopped (or
    /// wrapped, under [`EndOfTimeline::Loop`]).
    ReachedEnd(ProjectState),
    /// The ticket was cancelled or superseded. Nothing happened.
    Stale,
}

#[derive(Debug)]
pub struct PlaybackScheduler {
    phase: PlaybackPhase,
    /// Clock reading at the previous step (or at start).
    last_tick: Duration,
    pending: Option<StepTicket>,
    run: u64,
    step: u64,
    end_behavior: EndOfTimeline,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(EndOfTimeline::default())
    }
}

impl PlaybackScheduler {
    pub fn new(end_behavior: EndOfTimeline) -> Self {
        Self {
            phase: PlaybackPhase::Stopped,
            last_tick: Duration::ZERO,
            pending: None,
            run: 0,
            step: 0,
            end_behavior,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// The pending step, present exactly while playing.
    pub fn pending(&self) -> Option<StepTicket> {
        self.pending
    }

    pub fn end_behavior(&self) -> EndOfTimeline {
        self.end_behavior
    }

    /// Flip between playing and stopped.
    pub fn toggle_play(&mut self, state: &ProjectState, now: Duration) -> ProjectState {
        match self.phase {
            PlaybackPhase::Stopped => self.play(state, now),
            PlaybackPhase::Playing => self.stop(state),
        }
    }

    /// Start playing from the current playhead, using `now` as the delta
    /// baseline. No-op while already playing.
    pub fn play(&mut self, state: &ProjectState, now: Duration) -> ProjectState {
        if self.is_playing() {
            return state.clone();
        }
        self.phase = PlaybackPhase::Playing;
        self.last_tick = now;
        self.run += 1;
        self.schedule();
        tracing::info!(time_secs = state.current_time, "Playback started");
        ProjectState {
            is_playing: true,
            ..state.clone()
        }
    }

    /// Stop playing, cancelling the pending step. The playhead stays put.
    pub fn stop(&mut self, state: &ProjectState) -> ProjectState {
        if !self.is_playing() {
            return ProjectState {
                is_playing: false,
                ..state.clone()
            };
        }
        self.halt();
        tracing::info!(time_secs = state.current_time, "Playback stopped");
        ProjectState {
            is_playing: false,
            ..state.clone()
        }
    }

    /// Fire the advance step identified by `ticket` at clock reading `now`.
    pub fn advance(
        &mut self,
        ticket: StepTicket,
        state: &ProjectState,
        now: Duration,
    ) -> StepOutcome {
        if self.pending != Some(ticket) {
            tracing::trace!(?ticket, "Stale advance step ignored");
            return StepOutcome::Stale;
        }
        self.pending = None;

        let delta = secs_between(self.last_tick, now);
        self.last_tick = now;
        let next_time = state.current_time + delta;
        tracing::trace!(delta_secs = delta, time_secs = next_time, "Advance step");

        if next_time < state.total_duration {
            self.schedule();
            return StepOutcome::Advanced(ProjectState {
                current_time: next_time,
                ..state.clone()
            });
        }

        let next = match self.end_behavior {
            EndOfTimeline::RewindAndStop => {
                self.halt();
                ProjectState {
                    current_time: 0.0,
                    is_playing: false,
                    ..state.clone()
                }
            }
            EndOfTimeline::StopAtEnd => {
                self.halt();
                ProjectState {
                    current_time: state.total_duration,
                    is_playing: false,
                    ..state.clone()
                }
            }
            EndOfTimeline::Loop => {
                self.schedule();
                ProjectState {
                    current_time: next_time.rem_euclid(state.total_duration),
                    ..state.clone()
                }
            }
        };
        tracing::info!(
            behavior = ?self.end_behavior,
            time_secs = next.current_time,
            "Reached end of timeline"
        );
        StepOutcome::ReachedEnd(next)
    }

    fn schedule(&mut self) {
        self.step += 1;
        self.pending = Some(StepTicket {
            run: self.run,
            step: self.step,
        });
    }

    fn halt(&mut self) {
        self.phase = PlaybackPhase::Stopped;
        self.pending = None;
        self.run += 1;
    }
}

/// Move the playhead to `time`, clamped to `[0, total_duration]`.
///
/// Play state is untouched. Non-finite input is ignored.
pub fn seek(state: &ProjectState, time: f64) -> ProjectState {
    if !time.is_finite() {
        tracing::debug!("Seek to non-finite time ignored");
        return state.clone();
    }
    let current_time = time.clamp(0.0, state.total_duration);
    if current_time.to_bits() == state.current_time.to_bits() {
        return state.clone();
    }
    ProjectState {
        current_time,
        ..state.clone()
    }
}
