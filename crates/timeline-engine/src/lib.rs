//! Cutline Timeline Engine
//!
//! Owns project time and every edit to the project snapshot:
//! - **Store:** Pure clip transitions (add, update, move, delete, select)
//! - **Resolver:** The active clip per visible track at the playhead
//! - **Scheduler:** Frame-driven playback with drift-free delta accumulation
//! - **Interaction:** Pointer coordinates to seek/select commands
//! - **Session:** The single writer that applies commands and publishes
//!   snapshots to readers
//!
//! Everything except the session is pure computation over
//! `ProjectState` snapshots.

pub mod command;
pub mod generate;
pub mod interaction;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod store;

pub use command::{parse_commands, EditorCommand};
pub use generate::{FallbackGenerator, MediaGenerator, PlaceholderGenerator};
pub use resolver::{resolve_active_clips, ActiveClipCache, RenderFrame};
pub use scheduler::{seek, PlaybackPhase, PlaybackScheduler, StepOutcome, StepTicket};
pub use session::{EditorSession, SessionHandle, Snapshot};
