//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Adds WakaTime entries to Clockify.
///
/// Pulls all time entries from WakaTime for the last few days and adds them
/// to a Clockify workspace. Running it twice over the same days adds the
/// entries twice.
#[derive(Debug, Parser)]
#[command(
    name = "clocksync",
    version,
    about,
    override_usage = "clocksync <WORKSPACE> [OPTIONS]"
)]
pub struct Cli {
    /// Name of the Clockify workspace to add entries to (matched exactly).
    pub workspace: Option<String>,

    /// The API key for accessing WakaTime [env: WAKATIME_KEY].
    #[arg(long = "wakatime", value_name = "KEY")]
    pub wakatime_key: Option<String>,

    /// The API key for accessing Clockify [env: CLOCKIFY_KEY].
    #[arg(long = "clockify", value_name = "KEY")]
    pub clockify_key: Option<String>,

    /// The number of days back to retrieve from WakaTime [default: 7].
    #[arg(short, long)]
    pub days: Option<u32>,

    /// YAML file mapping WakaTime project names to Clockify project names.
    #[arg(short = 'p', long = "projects", value_name = "FILE")]
    pub projects: Option<PathBuf>,

    /// Add missing Clockify projects instead of leaving entries without one.
    /// Not implemented yet.
    #[arg(short = 'a', long, hide = true)]
    pub add_projects: bool,

    /// Write the manual page to stdout.
    #[arg(long, hide = true)]
    pub manpage: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "clocksync",
            "Acme",
            "--wakatime",
            "waka",
            "--clockify",
            "clock",
            "-d",
            "3",
            "-p",
            "projects.yaml",
            "-a",
        ])
        .unwrap();

        assert_eq!(cli.workspace.as_deref(), Some("Acme"));
        assert_eq!(cli.wakatime_key.as_deref(), Some("waka"));
        assert_eq!(cli.clockify_key.as_deref(), Some("clock"));
        assert_eq!(cli.days, Some(3));
        assert_eq!(cli.projects, Some(PathBuf::from("projects.yaml")));
        assert!(cli.add_projects);
        assert!(!cli.manpage);
    }

    #[test]
    fn workspace_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["clocksync", "--manpage"]).unwrap();
        assert!(cli.workspace.is_none());
        assert!(cli.manpage);
    }

    #[test]
    fn rejects_extra_positional() {
        assert!(Cli::try_parse_from(["clocksync", "Acme", "Other"]).is_err());
    }

    #[test]
    fn rejects_negative_days() {
        assert!(Cli::try_parse_from(["clocksync", "Acme", "-d", "-1"]).is_err());
    }

    #[test]
    fn hidden_flags_stay_out_of_help() {
        let help = Cli::command().render_help().to_string();
        assert!(!help.contains("--add-projects"));
        assert!(!help.contains("--manpage"));
        assert!(help.contains("--projects"));
    }
}
