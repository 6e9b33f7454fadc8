//! chardev CLI - drive a fixed-capacity shared byte device from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod script;

use commands::{ConfigCommand, RunCommand, StatCommand};

/// chardev CLI - drive a fixed-capacity shared byte device.
///
/// The device lives for the lifetime of this process. Use `run` to feed it a
/// script of open/read/write/close commands.
///
/// Configuration is stored in ~/.chardev/chardev/ and supports multiple
/// contexts, similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "chardev")]
#[command(about = "Shared byte device CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.chardev/chardev/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Run a device script
    Run(RunCommand),
    /// Show the state of a freshly created device
    Stat(StatCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli),
        Commands::Run(cmd) => cmd.run(&cli),
        Commands::Stat(cmd) => cmd.run(&cli),
    }
}
