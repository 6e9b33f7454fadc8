//! Script execution against the process-wide device.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use clap::Args;
use tracing::info;

use chardev_cli::print_verbose;

use super::get_device_config;
use crate::Cli;
use crate::script::Runner;

/// Run a device script.
///
/// Reads commands from SCRIPT, or from stdin when no file is given. Sessions
/// left open at the end are closed unless --keep-open is set.
#[derive(Args)]
pub struct RunCommand {
    /// Script file (default: stdin)
    script: Option<String>,

    /// Leave sessions open when the script ends
    #[arg(long)]
    keep_open: bool,
}

impl RunCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = get_device_config(cli)?;
        print_verbose(cli.verbose, &format!("device config: {:?}", config));
        let device = chardev::init_global(config)?;

        let script = match &self.script {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let sink: Box<dyn Write> = match &cli.output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout().lock()),
        };

        let mut runner = Runner::new(device, sink);
        runner.run_script(&script)?;
        if !self.keep_open {
            runner.close_all()?;
        }
        runner.into_output().flush()?;

        let stats = device.stats();
        info!(
            opens = stats.open_count,
            closes = stats.close_count,
            write_cursor = stats.write_cursor,
            "script finished"
        );
        Ok(())
    }
}
