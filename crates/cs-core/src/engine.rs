//! The reconciliation pass.
//!
//! One run resolves the destination workspace, snapshots its projects, then
//! walks `[now - days, now)` one calendar day at a time. Every entry the source
//! reports for a day is mapped to a destination project and pushed as a new
//! time entry. Calls happen strictly one after another.
//!
//! Nothing is remembered between runs, so overlapping windows push the same
//! activity again.

use std::error::Error as StdError;
use std::future::Future;

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate};
use thiserror::Error;

use crate::cache::{ProjectCache, ProjectLookup};
use crate::mapping::ProjectMapping;
use crate::types::{DurationSummary, NewTimeEntry, Project, Workspace, describe_entry};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The destination refused to list workspaces.
    #[error("could not load workspaces")]
    ListWorkspaces(#[source] BoxError),
    /// No workspace carries exactly the requested name.
    #[error("could not find workspace {0:?}")]
    WorkspaceNotFound(String),
    /// Fetching one day from the source failed; later days were not attempted.
    #[error("failed to fetch durations for {day}")]
    FetchDay {
        day: NaiveDate,
        #[source]
        source: BoxError,
    },
    /// The lookback window does not fit the calendar.
    #[error("lookback of {days} days is out of range")]
    InvalidWindow { days: u32 },
}

/// Where durations are pulled from.
pub trait TimeSource {
    type Error: StdError + Send + Sync + 'static;

    /// Returns everything recorded on `day`.
    fn durations(
        &self,
        day: NaiveDate,
    ) -> impl Future<Output = Result<DurationSummary, Self::Error>>;
}

/// Where time entries are pushed to.
pub trait TimeSink {
    type Error: StdError + Send + Sync + 'static;

    fn list_workspaces(&self) -> impl Future<Output = Result<Vec<Workspace>, Self::Error>>;

    fn list_projects(
        &self,
        workspace_id: &str,
    ) -> impl Future<Output = Result<Vec<Project>, Self::Error>>;

    /// Creates an entry and returns its destination id.
    fn create_time_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> impl Future<Output = Result<String, Self::Error>>;
}

/// Source of the current instant.
///
/// Read again on every loop check, so a slow run can reach into the day it
/// started on.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Destination workspace name, matched exactly.
    pub workspace: String,
    /// How many days back the window starts.
    pub days: u32,
    pub mapping: ProjectMapping,
}

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub workspace_id: String,
    pub days: usize,
    pub created: usize,
    pub failed: usize,
    /// Names that had no destination project, in first-seen order.
    pub placeholders: Vec<String>,
}

/// Runs one full pass from `source` into `sink`.
pub async fn sync<S, D, C>(
    source: &S,
    sink: &D,
    clock: &C,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError>
where
    S: TimeSource,
    D: TimeSink,
    C: Clock,
{
    let workspace_id = resolve_workspace(sink, &options.workspace).await?;
    tracing::debug!(workspace = %options.workspace, %workspace_id, "resolved workspace");

    let projects = match sink.list_projects(&workspace_id).await {
        Ok(projects) => projects,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load projects, entries will have no project");
            Vec::new()
        }
    };
    tracing::debug!(count = projects.len(), "loaded destination projects");

    let mut reconciler = Reconciler::new(
        sink,
        &options.mapping,
        workspace_id,
        ProjectCache::new(projects),
    );

    let invalid_window = || SyncError::InvalidWindow { days: options.days };
    let mut cursor = clock
        .now()
        .checked_sub_days(Days::new(options.days.into()))
        .ok_or_else(invalid_window)?;

    while cursor < clock.now() {
        let day = cursor.date_naive();
        tracing::info!(%day, "fetching durations");
        let summary = source
            .durations(day)
            .await
            .map_err(|err| SyncError::FetchDay {
                day,
                source: Box::new(err),
            })?;
        reconciler.add_time(&summary).await;
        cursor = cursor
            .checked_add_days(Days::new(1))
            .ok_or_else(invalid_window)?;
    }

    Ok(reconciler.into_report())
}

/// Finds the id of the workspace named exactly `name`.
pub async fn resolve_workspace<D: TimeSink>(sink: &D, name: &str) -> Result<String, SyncError> {
    let workspaces = sink
        .list_workspaces()
        .await
        .map_err(|err| SyncError::ListWorkspaces(Box::new(err)))?;
    workspaces
        .into_iter()
        .find(|workspace| workspace.name == name)
        .map(|workspace| workspace.id)
        .ok_or_else(|| SyncError::WorkspaceNotFound(name.to_string()))
}

/// Per-run state: the project cache plus counters for the report.
pub struct Reconciler<'a, D> {
    sink: &'a D,
    mapping: &'a ProjectMapping,
    workspace_id: String,
    cache: ProjectCache,
    report: SyncReport,
}

impl<'a, D: TimeSink> Reconciler<'a, D> {
    pub fn new(
        sink: &'a D,
        mapping: &'a ProjectMapping,
        workspace_id: String,
        cache: ProjectCache,
    ) -> Self {
        let report = SyncReport {
            workspace_id: workspace_id.clone(),
            ..SyncReport::default()
        };
        Self {
            sink,
            mapping,
            workspace_id,
            cache,
            report,
        }
    }

    /// Pushes every entry of one day, in source order.
    ///
    /// A failed create is logged and counted; it never stops the day.
    pub async fn add_time(&mut self, summary: &DurationSummary) {
        self.report.days += 1;

        for record in &summary.entries {
            let project = self.mapping.resolve(&record.project);
            let lookup = self.cache.lookup_or_insert(project);
            if lookup == ProjectLookup::Added {
                tracing::debug!(project, "no destination project, recorded placeholder");
                self.report.placeholders.push(project.to_string());
            }

            let end = record.end();
            tracing::info!(
                project = %record.project,
                from = %record.start,
                to = %end,
                "pushing entry"
            );
            let entry = NewTimeEntry {
                start: record.start,
                end,
                billable: true,
                description: describe_entry(&record.project),
                project_id: lookup.project_id().map(str::to_string),
            };

            match self.sink.create_time_entry(&self.workspace_id, &entry).await {
                Ok(id) => {
                    tracing::debug!(%id, "created time entry");
                    self.report.created += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, project = %record.project, "failed to create time entry");
                    self.report.failed += 1;
                }
            }
        }
    }

    pub const fn cache(&self) -> &ProjectCache {
        &self.cache
    }

    pub fn into_report(self) -> SyncReport {
        self.report
    }
}
