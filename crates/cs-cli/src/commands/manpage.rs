//! Manual page generation.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;

use crate::Cli;

/// Renders the roff manual page for `clocksync`.
pub fn run<W: Write>(writer: &mut W) -> Result<()> {
    clap_mangen::Man::new(Cli::command()).render(writer)?;
    Ok(())
}
