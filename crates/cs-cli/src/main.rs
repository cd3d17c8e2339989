use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cs_cli::commands::{manpage, sync};
use cs_cli::{Cli, Config, exit_code};

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {err:#}");
    ExitCode::from(exit_code(err))
}

fn main() -> ExitCode {
    // A missing .env is fine; variables already set take precedence.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    if cli.manpage {
        return match manpage::run(&mut io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => report(&err),
        };
    }

    // Credentials are checked before the workspace argument.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return report(&err),
    };

    let Some(workspace) = cli.workspace.as_deref() else {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "\nError: workspace not specified\n");
        let _ = Cli::command().write_help(&mut stderr);
        return ExitCode::from(cs_cli::exit::USAGE);
    };

    match sync::run(&mut io::stdout().lock(), workspace, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}
