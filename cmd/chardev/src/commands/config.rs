//! Configuration management commands.

use clap::{Args, Subcommand};

use chardev::{DeviceConfig, ReadExtent, ReadMode};
use chardev_cli::config::Context as CliContext;

use super::{get_config, output, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts hold named device setups, similar to kubectl's context
/// management.
///
/// Configuration is stored in ~/.chardev/chardev/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Device name shown in logs
        #[arg(long)]
        device_name: Option<String>,
        /// Buffer capacity in bytes
        #[arg(long)]
        capacity: Option<usize>,
        /// Read the whole remainder on every call instead of the requested length
        #[arg(long)]
        read_remainder: bool,
        /// Stop reads at the write cursor instead of the capacity
        #[arg(long)]
        read_written: bool,
        /// Limit each transfer to this many bytes
        #[arg(long)]
        transfer_chunk: Option<usize>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                device_name,
                capacity,
                read_remainder,
                read_written,
                transfer_chunk,
            } => {
                let mut cfg = get_config(cli)?;

                let mut device = DeviceConfig::default();
                if let Some(n) = device_name {
                    device.name = n.clone();
                }
                if let Some(c) = capacity {
                    device = device.with_capacity(*c);
                }
                if *read_remainder {
                    device = device.with_read_mode(ReadMode::Remainder);
                }
                if *read_written {
                    device = device.with_read_extent(ReadExtent::Written);
                }
                if let Some(chunk) = transfer_chunk {
                    device = device.with_transfer_chunk(*chunk);
                }

                let ctx = CliContext {
                    device,
                    ..Default::default()
                };
                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!(
                    "{:<8} {:<20} {:<10} {:<10} {}",
                    "CURRENT", "NAME", "CAPACITY", "READ", "EXTENT"
                );

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    println!(
                        "{:<8} {:<20} {:<10} {:<10} {:?}",
                        current,
                        name,
                        ctx.device.capacity,
                        format!("{:?}", ctx.device.read_mode),
                        ctx.device.read_extent
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if !cfg.contexts.is_empty() {
                    println!("\nContext details:\n");
                    output(cli).write(&cfg.contexts)?;
                }

                Ok(())
            }
        }
    }
}
