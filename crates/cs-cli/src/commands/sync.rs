//! Sync command for pushing WakaTime durations into Clockify.

use std::io::Write;

use anyhow::{Context, Result};

use cs_core::{ProjectMapping, SyncOptions, SyncReport, SystemClock};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, workspace: &str, config: &Config) -> Result<SyncReport> {
    if config.add_projects {
        tracing::warn!(
            "--add-projects is not implemented, entries for unknown projects are added without a project"
        );
    }

    let mapping = match &config.projects_file {
        Some(path) => ProjectMapping::load(path).context("failed to load project mapping")?,
        None => ProjectMapping::default(),
    };
    tracing::debug!(entries = mapping.len(), "loaded project mapping");

    let source = cs_wakatime::Client::with_base_url(&config.wakatime_key, &config.wakatime_url)
        .context("failed to create WakaTime client")?;
    let sink = cs_clockify::Client::with_base_url(&config.clockify_key, &config.clockify_url)
        .context("failed to create Clockify client")?;

    let options = SyncOptions {
        workspace: workspace.to_string(),
        days: config.days,
        mapping,
    };
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let report = runtime.block_on(cs_core::sync(&source, &sink, &SystemClock, &options))?;

    write!(writer, "{}", format_report(&report))?;
    Ok(report)
}

pub fn format_report(report: &SyncReport) -> String {
    let mut output = format!(
        "Synced {} {} into workspace {}\n",
        report.days,
        plural(report.days, "day", "days"),
        report.workspace_id
    );
    output.push_str(&format!("Created: {}\n", report.created));
    if report.failed > 0 {
        output.push_str(&format!("Failed: {}\n", report.failed));
    }
    if !report.placeholders.is_empty() {
        output.push_str(&format!(
            "Not in Clockify (added without a project): {}\n",
            report.placeholders.join(", ")
        ));
    }
    output
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
