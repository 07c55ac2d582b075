use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for draftgate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftgateConfig {
    /// State record storage settings
    pub storage: StorageConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process records; the host flushes them with its own persistence.
    Memory,
    /// JSON documents under `storage.directory`.
    Filesystem,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Record directory for the filesystem backend
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level applied when no RUST_LOG is set
    pub log_level: String,
    /// Emit JSON-structured log lines
    pub json_output: bool,
}

impl Default for DraftgateConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                directory: PathBuf::from(".draftgate/state"),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_output: false,
            },
        }
    }
}

impl DraftgateConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration file (draftgate.toml)
    /// 3. Environment variables (prefixed with DRAFTGATE_, nested keys
    ///    separated by `__`)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("draftgate.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&DraftgateConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("DRAFTGATE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_load_without_any_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = DraftgateConfig::load_from(&temp_dir.path().join("draftgate.toml")).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn file_overrides_fill_in_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draftgate.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"filesystem\"\ndirectory = \"records\"\n",
        )
        .unwrap();

        let config = DraftgateConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Filesystem);
        assert_eq!(config.storage.directory, PathBuf::from("records"));
        // Untouched sections keep their defaults.
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn config_round_trips_through_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draftgate.toml");

        let mut config = DraftgateConfig::default();
        config.storage.backend = StorageBackend::Filesystem;
        config.save_to_file(&path).unwrap();

        let loaded = DraftgateConfig::load_from(&path).unwrap();
        assert_eq!(loaded.storage.backend, StorageBackend::Filesystem);
    }
}
