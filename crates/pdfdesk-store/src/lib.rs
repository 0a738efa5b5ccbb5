//! Temporary artifact storage.
//!
//! Generated output files live in a single directory until their retention
//! window runs out. Two independent paths remove them: a per-artifact
//! scheduled deletion ([`DeletionScheduler`]) and a periodic sweep that
//! catches anything whose scheduled job was lost (for example across a
//! process restart). Both paths tolerate the artifact already being gone.

mod scheduler;
mod store;

pub use scheduler::DeletionScheduler;
pub use store::{content_type_for, spawn_sweeper, LocalArtifactStore, StoreError};
