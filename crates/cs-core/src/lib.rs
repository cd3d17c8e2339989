//! Core domain logic for clocksync.
//!
//! This crate contains the fundamental types and logic for:
//! - Project mapping: renaming source projects before they reach the destination
//! - Project cache: the in-memory view of destination projects for one run
//! - Reconciliation: walking a window of days and pushing each entry

mod cache;
pub mod engine;
pub mod mapping;
mod types;

pub use cache::{ProjectCache, ProjectLookup};
pub use engine::{Clock, SyncError, SyncOptions, SyncReport, SystemClock, TimeSink, TimeSource, sync};
pub use mapping::{MappingError, ProjectMapping};
pub use types::{DurationSummary, NewTimeEntry, Project, TimeEntryRecord, Workspace, describe_entry};
