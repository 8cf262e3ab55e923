//! Command handlers for Warden's CLI commands

mod init;
mod status;
mod validate;

pub use init::InitCommand;
pub use status::StatusCommand;
pub use validate::{ValidateCommand, ValidateOutcome};
