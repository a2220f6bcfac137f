//! Cutline Project Model
//!
//! Defines the core data contracts for Cutline projects:
//! - **Clips:** Time-bounded placements of media or text with a transform
//! - **Tracks:** Ordered lanes holding clips of one media kind
//! - **Project:** The root snapshot (`ProjectState`) shared by every reader
//! - **Time model:** Seconds/pixel mapping and timecode formatting
//!
//! Snapshots are immutable once built. Tracks and clips sit behind `Arc`
//! so a transition that touches one clip shares everything else with the
//! previous snapshot.

pub mod clip;
pub mod project;
pub mod sample;
pub mod timecode;
pub mod track;

pub use clip::*;
pub use project::*;
pub use timecode::*;
pub use track::*;
