//! Process exit codes.
//!
//! - `0`: success, help or manual page
//! - `1`: no workspace given, workspace not found, or the run stopped early
//!   because a day could not be fetched. Older releases printed the fetch
//!   error and exited `0`; a failed day now fails the run, while entries
//!   created before it are kept.
//! - `2`: bad configuration, unreadable mapping file, or workspaces could not
//!   be listed

use cs_clockify::ClockifyError;
use cs_core::{MappingError, SyncError};
use cs_wakatime::WakaTimeError;

pub const USAGE: u8 = 1;
pub const CONFIG: u8 = 2;

/// Picks the exit code for an error returned by a command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<SyncError>() {
            return match err {
                SyncError::ListWorkspaces(_) | SyncError::InvalidWindow { .. } => CONFIG,
                SyncError::WorkspaceNotFound(_) | SyncError::FetchDay { .. } => USAGE,
            };
        }
        if cause.is::<figment::Error>() || cause.is::<MappingError>() {
            return CONFIG;
        }
        if matches!(
            cause.downcast_ref::<WakaTimeError>(),
            Some(WakaTimeError::InvalidApiKey { .. })
        ) || matches!(
            cause.downcast_ref::<ClockifyError>(),
            Some(ClockifyError::InvalidApiKey { .. })
        ) {
            return CONFIG;
        }
    }
    USAGE
}
