//! Utility functions for CLI commands.

use chardev::DeviceConfig;
use chardev_cli::config::{Config, load_config};
use chardev_cli::{Output, OutputFormat};

use crate::Cli;

const APP_NAME: &str = "chardev";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Resolves the device settings for this invocation.
///
/// Uses the `-c` context if given, else the current context, else defaults.
pub fn get_device_config(cli: &Cli) -> anyhow::Result<DeviceConfig> {
    get_config(cli)?.resolve_device(cli.context.as_deref())
}

/// Builds the output sink from the global flags.
pub fn output(cli: &Cli) -> Output {
    Output::new(OutputFormat::from_json_flag(cli.json), cli.output.clone())
}

/// Prints a success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}
