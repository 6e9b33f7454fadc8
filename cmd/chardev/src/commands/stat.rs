//! Device status command.

use clap::Args;
use serde::Serialize;

use chardev::{Device, DeviceConfig, DeviceStats};
use chardev_cli::Output;

use super::{get_device_config, output};
use crate::Cli;

/// Show the state of a freshly created device.
///
/// Useful for checking what a context resolves to.
#[derive(Args)]
pub struct StatCommand {
    /// Also print the resolved device configuration
    #[arg(long)]
    show_config: bool,
}

/// Stats together with the configuration that produced them.
#[derive(Debug, Serialize)]
struct StatReport<'a> {
    config: &'a DeviceConfig,
    stats: DeviceStats,
}

impl StatCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = get_device_config(cli)?;
        let device = chardev::init_global(config)?;
        write_stat(&output(cli), device, self.show_config)
    }
}

/// Writes the device stats as one document, so `-o FILE` keeps everything.
fn write_stat(out: &Output, device: &Device, show_config: bool) -> anyhow::Result<()> {
    if show_config {
        out.write(&StatReport {
            config: device.config(),
            stats: device.stats(),
        })
    } else {
        out.write(&device.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chardev_cli::OutputFormat;
    use tempfile::TempDir;

    fn stat_to_file(format: OutputFormat, show_config: bool) -> String {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stat.out");
        let out = Output::new(format, Some(path.to_string_lossy().into_owned()));
        let dev = Device::new(DeviceConfig::default().with_capacity(64)).unwrap();

        write_stat(&out, &dev, show_config).unwrap();
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_show_config_survives_output_file() {
        let yaml = stat_to_file(OutputFormat::Yaml, true);
        let report: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(report["config"]["read_mode"].as_str(), Some("requested"));
        assert_eq!(report["config"]["capacity"].as_u64(), Some(64));
        assert_eq!(report["stats"]["write_cursor"].as_u64(), Some(0));

        let json = stat_to_file(OutputFormat::Json, true);
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["config"]["read_extent"], "capacity");
        assert_eq!(report["stats"]["capacity"], 64);
    }

    #[test]
    fn test_stats_only() {
        let yaml = stat_to_file(OutputFormat::Yaml, false);
        assert!(yaml.contains("capacity: 64"));
        assert!(!yaml.contains("read_mode"));
    }
}
