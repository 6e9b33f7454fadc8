//! CLI commands module.

mod config;
mod run;
mod stat;
mod util;

pub use config::ConfigCommand;
pub use run::RunCommand;
pub use stat::StatCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
