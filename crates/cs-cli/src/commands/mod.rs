//! CLI command implementations.

pub mod manpage;
pub mod sync;
