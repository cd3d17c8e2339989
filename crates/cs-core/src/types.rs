//! Records exchanged between the source, the engine and the destination.

use chrono::{DateTime, TimeDelta, Utc};

/// A destination workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

/// A destination project.
///
/// An empty `id` marks a placeholder recorded locally for a project that
/// does not exist remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub id: String,
}

impl Project {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// One contiguous stretch of activity reported by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryRecord {
    pub project: String,
    pub start: DateTime<Utc>,
    pub duration: TimeDelta,
}

impl TimeEntryRecord {
    pub fn new(project: impl Into<String>, start: DateTime<Utc>, duration_secs: i64) -> Self {
        Self {
            project: project.into(),
            start,
            duration: TimeDelta::seconds(duration_secs),
        }
    }

    /// Start plus duration, with no calendar adjustment.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration
    }
}

/// All activity the source reported for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationSummary {
    pub entries: Vec<TimeEntryRecord>,
}

/// A time entry ready to be created in the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub billable: bool,
    pub description: String,
    pub project_id: Option<String>,
}

/// Description attached to every pushed entry.
///
/// Always built from the source project name, never the mapped one.
pub fn describe_entry(source_project: &str) -> String {
    format!("Coding on {source_project}")
}
