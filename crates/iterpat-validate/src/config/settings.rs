//! Validator settings and their loader

use crate::{Result, ValidationError};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILENAME: &str = ".iterpat-validate.toml";

/// Environment variable prefix; nested keys use `__` (`ITERPAT_RULE_SETS__ITERATOR`)
pub const CONFIG_ENV_PREFIX: &str = "ITERPAT_";

/// Report rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Ci,
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ci" => Ok(Self::Ci),
            other => Err(ValidationError::Config(format!(
                "Invalid output format: {other}. Use human, json, or ci"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
            Self::Ci => write!(f, "ci"),
        }
    }
}

/// Rule set enable flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetToggles {
    #[serde(default = "default_true")]
    pub iterator: bool,
    #[serde(default = "default_true")]
    pub iterable_aggregate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RuleSetToggles {
    fn default() -> Self {
        Self {
            iterator: true,
            iterable_aggregate: true,
        }
    }
}

impl RuleSetToggles {
    /// Is the rule set registered under `name` enabled; unknown names are enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            "iterator" => self.iterator,
            "iterable_aggregate" => self.iterable_aggregate,
            _ => true,
        }
    }
}

/// Settings for one validator run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSettings {
    /// Record `Debug` diagnostics
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub rule_sets: RuleSetToggles,
}

impl ValidatorSettings {
    /// Load from defaults, the given file (or the default file) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        SettingsLoader::new().with_config_path_opt(path).load()
    }

    /// Load from `dir/.iterpat-validate.toml`, falling back to defaults on any error
    pub fn load_or_default(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(DEFAULT_CONFIG_FILENAME);
        match SettingsLoader::new()
            .with_config_path(&path)
            .without_env()
            .load()
        {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write these settings as TOML
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Figment-backed settings loader
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: Some(CONFIG_ENV_PREFIX.to_string()),
        }
    }

    pub fn with_config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    fn with_config_path_opt(self, path: Option<&Path>) -> Self {
        match path {
            Some(path) => self.with_config_path(path),
            None => self,
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Skip the environment layer
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Merge defaults, then the TOML file (if it exists), then the environment
    pub fn load(&self) -> Result<ValidatorSettings> {
        let mut figment = Figment::new().merge(Serialized::defaults(ValidatorSettings::default()));

        let path = self
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
        if path.exists() {
            info!("Configuration loaded from {}", path.display());
            figment = figment.merge(Toml::file(&path));
        } else if self.config_path.is_some() {
            warn!("Configuration file not found: {}", path.display());
        } else {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_FILENAME);
        }

        if let Some(prefix) = &self.env_prefix {
            figment = figment.merge(Env::prefixed(prefix).split("__"));
        }

        figment
            .extract()
            .map_err(|e| ValidationError::Config(format!("Failed to extract configuration: {e}")))
    }
}
