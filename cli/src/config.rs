//! Configuration management for the chardev CLI.
//!
//! Configuration is stored in ~/.chardev/{app_name}/config.yaml and holds
//! named device contexts, one of which may be current.

use std::collections::HashMap;
use std::path::PathBuf;

use chardev::DeviceConfig;
use serde::{Deserialize, Serialize};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".chardev";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// A named device setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Device settings.
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir(app_name: &str) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR).join(app_name))
    }

    /// Gets the default config file path.
    pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
        Self::default_config_dir(app_name).map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        ctx.device.validate()?;
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets a specific context.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Gets the current context.
    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the device settings to use.
    ///
    /// A named context must exist. Without a name the current context is
    /// used, falling back to the default device settings.
    pub fn resolve_device(&self, name: Option<&str>) -> anyhow::Result<DeviceConfig> {
        match name {
            Some(n) if !n.is_empty() => self
                .get_context(n)
                .map(|ctx| ctx.device.clone())
                .ok_or_else(|| anyhow::anyhow!("context '{}' not found", n)),
            _ => Ok(self
                .get_current_context()
                .map(|ctx| ctx.device.clone())
                .unwrap_or_default()),
        }
    }

    /// Lists all context names, sorted.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Loads configuration for the specified app.
///
/// Creates an empty config file if none exists yet.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        serde_yaml::from_str(&content)?
    } else {
        let cfg = Config::default();
        let content = serde_yaml::to_string(&cfg)?;
        std::fs::write(&config_path, content)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chardev::{ReadExtent, ReadMode};
    use tempfile::TempDir;

    fn load(dir: &TempDir) -> Config {
        let path = dir.path().join("config.yaml");
        load_config("chardev", path.to_str()).unwrap()
    }

    #[test]
    fn test_load_creates_empty_config() {
        let dir = TempDir::new().unwrap();
        let cfg = load(&dir);
        assert!(cfg.path().exists());
        assert!(cfg.contexts.is_empty());
        assert_eq!(cfg.app_name, "chardev");
    }

    #[test]
    fn test_context_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut cfg = load(&dir);

        let ctx = Context {
            device: DeviceConfig::default()
                .with_capacity(64)
                .with_read_extent(ReadExtent::Written),
            ..Default::default()
        };
        cfg.add_context("small", ctx).unwrap();
        cfg.add_context("default", Context::default()).unwrap();
        cfg.use_context("small").unwrap();

        let reloaded = load(&dir);
        assert_eq!(reloaded.current_context, "small");
        assert_eq!(reloaded.list_contexts(), vec!["default", "small"]);
        let dev = reloaded.resolve_device(None).unwrap();
        assert_eq!(dev.capacity, 64);
        assert_eq!(dev.read_extent, ReadExtent::Written);
        assert_eq!(reloaded.get_context("small").unwrap().name, "small");

        cfg.delete_context("small").unwrap();
        assert!(cfg.current_context.is_empty());
        assert!(cfg.delete_context("small").is_err());
        assert!(cfg.use_context("missing").is_err());
    }

    #[test]
    fn test_resolve_defaults_without_context() {
        let dir = TempDir::new().unwrap();
        let cfg = load(&dir);
        assert_eq!(cfg.resolve_device(None).unwrap(), DeviceConfig::default());
        assert!(cfg.resolve_device(Some("nope")).is_err());
    }

    #[test]
    fn test_add_context_rejects_invalid_device() {
        let dir = TempDir::new().unwrap();
        let mut cfg = load(&dir);
        let ctx = Context {
            device: DeviceConfig::default().with_capacity(0),
            ..Default::default()
        };
        assert!(cfg.add_context("broken", ctx).is_err());
        assert!(cfg.contexts.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "current_context: dev\ncontexts:\n  dev:\n    name: dev\n    device:\n      capacity: 32\n      read_mode: remainder\n      transfer_chunk: 4\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let dev = cfg.resolve_device(None).unwrap();
        assert_eq!(dev.capacity, 32);
        assert_eq!(dev.read_mode, ReadMode::Remainder);
        assert_eq!(dev.transfer_chunk, Some(4));
        assert_eq!(dev.name, chardev::DEFAULT_NAME);
    }
}
