//! Recorder Settings Module
//!
//! Loads recorder settings from a TOML file, with environment-specific
//! overrides and `TELEINFO_*` environment variables on top.

use crate::defaults;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use teleinfo_recorder::ProcessorMode;
use tracing::{info, warn};

/// Main recorder configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RecorderSettings {
    /// Global settings
    pub global: GlobalConfig,

    /// Meter identification and processing behaviour
    pub counter: CounterSettings,

    /// Serial reader
    pub reader: ReaderSettings,

    /// Record consumers
    pub handlers: HandlerSettings,

    /// Optional cost estimate derived from an index field
    pub cost: Option<CostSettings>,
}

/// Global configuration settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format of the log subscriber
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CounterSettings {
    pub name: String,
    pub processor_mode: ProcessorMode,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    pub device: PathBuf,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HandlerSettings {
    /// Log every record through the tracing subscriber
    pub tracing: bool,
    /// Append every record as a JSON line to this file
    pub json_lines: Option<PathBuf>,
}

/// Cost estimate parameters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CostSettings {
    #[serde(default = "default_cost_result_key")]
    pub result_key: String,
    #[serde(default = "default_cost_index_key")]
    pub index_key: String,
    /// Index value (Wh) the cost is counted from
    pub reference_index: i64,
    /// Price of one kWh in thousandths of the currency unit
    pub price_per_kwh_millis: i64,
}

fn default_cost_result_key() -> String {
    defaults::cost::RESULT_KEY.to_string()
}

fn default_cost_index_key() -> String {
    defaults::cost::INDEX_KEY.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::logging::LEVEL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            name: defaults::counter::NAME.to_string(),
            processor_mode: ProcessorMode::default(),
        }
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            device: PathBuf::from(defaults::reader::DEVICE),
            poll_interval_ms: defaults::reader::POLL_INTERVAL_MS,
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            tracing: true,
            json_lines: None,
        }
    }
}

impl RecorderSettings {
    /// Load configuration from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(defaults::CONFIG_FILE));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = base
                .parent()
                .map(|dir| dir.join("environments"))
                .unwrap_or_else(|| PathBuf::from(defaults::ENVIRONMENTS_DIR))
                .join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (TELEINFO_ prefix)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator(defaults::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Expand environment variables and `~` in path values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        self.reader.device =
            expand_path(&self.reader.device).context("Failed to expand reader device")?;

        if let Some(path) = &self.handlers.json_lines {
            let expanded = expand_path(path).context("Failed to expand json_lines path")?;
            self.handlers.json_lines = Some(expanded);
        }

        Ok(())
    }

    /// Serialize the settings back to TOML, e.g. to write a starter file
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Convenience function to load configuration with defaults
pub fn load_config(environment: Option<&str>) -> Result<RecorderSettings> {
    let mut config = RecorderSettings::load(None, environment)?;
    config.expand_env_vars()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_base_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("recorder.toml");

        let config_content = r#"
[global]
log_level = "debug"
log_format = "json"

[counter]
name = "garage"
processor_mode = "persistent"

[reader]
device = "/dev/ttyUSB0"
poll_interval_ms = 5000

[handlers]
tracing = false
json_lines = "/var/lib/teleinfo/records.jsonl"

[cost]
reference_index = 1000000
price_per_kwh_millis = 2516
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = RecorderSettings::load(Some(&config_path), None).unwrap();

        assert_eq!(config.global.log_level, "debug");
        assert_eq!(config.global.log_format, LogFormat::Json);
        assert_eq!(config.counter.name, "garage");
        assert_eq!(config.counter.processor_mode, ProcessorMode::Persistent);
        assert_eq!(config.reader.device, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(config.reader.poll_interval_ms, 5000);
        assert!(!config.handlers.tracing);
        assert_eq!(
            config.handlers.json_lines,
            Some(PathBuf::from("/var/lib/teleinfo/records.jsonl"))
        );

        let cost = config.cost.unwrap();
        assert_eq!(cost.result_key, "COST");
        assert_eq!(cost.index_key, "BASE");
        assert_eq!(cost.reference_index, 1_000_000);
        assert_eq!(cost.price_per_kwh_millis, 2516);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("recorder.toml");
        fs::write(&config_path, "[counter]\nname = \"cellar\"\n").unwrap();

        let config = RecorderSettings::load(Some(&config_path), None).unwrap();

        assert_eq!(config.counter.name, "cellar");
        assert_eq!(config.counter.processor_mode, ProcessorMode::DrainOnce);
        assert_eq!(config.reader, ReaderSettings::default());
        assert!(config.handlers.tracing);
        assert!(config.cost.is_none());
    }

    #[test]
    fn test_environment_override() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("recorder.toml");
        fs::write(&config_path, "[reader]\npoll_interval_ms = 5000\n").unwrap();

        let env_dir = dir.path().join("environments");
        fs::create_dir(&env_dir).unwrap();
        fs::write(
            env_dir.join("test.toml"),
            "[reader]\npoll_interval_ms = 1000\n",
        )
        .unwrap();

        let config = RecorderSettings::load(Some(&config_path), Some("test")).unwrap();
        assert_eq!(config.reader.poll_interval_ms, 1000);

        // a missing environment file is not an error
        let config = RecorderSettings::load(Some(&config_path), Some("missing")).unwrap();
        assert_eq!(config.reader.poll_interval_ms, 5000);
    }

    #[test]
    fn test_missing_base_file_fails() {
        let dir = tempdir().unwrap();
        let result = RecorderSettings::load(Some(&dir.path().join("absent.toml")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars_in_paths() {
        std::env::set_var("RECORDER_SETTINGS_TEST_DIR", "/srv/teleinfo");

        let mut config = RecorderSettings::default();
        config.reader.device = PathBuf::from("${RECORDER_SETTINGS_TEST_DIR}/capture.bin");
        config.handlers.json_lines = Some(PathBuf::from("$RECORDER_SETTINGS_TEST_DIR/records.jsonl"));
        config.expand_env_vars().unwrap();

        assert_eq!(config.reader.device, PathBuf::from("/srv/teleinfo/capture.bin"));
        assert_eq!(
            config.handlers.json_lines,
            Some(PathBuf::from("/srv/teleinfo/records.jsonl"))
        );
    }

    #[test]
    fn test_undefined_variable_fails() {
        let mut config = RecorderSettings::default();
        config.reader.device = PathBuf::from("$RECORDER_SETTINGS_UNDEFINED_VAR/tty");
        assert!(config.expand_env_vars().is_err());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("recorder.toml");
        let defaults = RecorderSettings::default();
        fs::write(&config_path, defaults.to_toml().unwrap()).unwrap();

        let loaded = RecorderSettings::load(Some(&config_path), None).unwrap();
        assert_eq!(loaded, defaults);
    }
}
