use parking_lot::RwLock;
use parley_core::{ParleyError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::schema::{ConfigWarning, ParleyConfig, WarningSeverity};

/// Loads and reloads the Parley configuration.
///
/// Warnings found while loading are kept, not logged, so the caller can emit
/// them once its subscriber is installed (see [`ConfigLoader::log_warnings`]).
pub struct ConfigLoader {
    config: Arc<RwLock<ParleyConfig>>,
    config_path: PathBuf,
    warnings: Vec<ConfigWarning>,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > PARLEY_CONFIG env > ~/.parley/parley.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("PARLEY_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".parley")
            .join("parley.toml")
    }

    /// Load the config from disk, falling back to defaults when the file is missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let mut warnings = Vec::new();
        let config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            warnings.push(ConfigWarning {
                field: "config".into(),
                message: format!("{} not found, using defaults", config_path.display()),
                severity: WarningSeverity::Info,
                hint: None,
            });
            ParleyConfig::default()
        };

        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());
        warnings.extend(Self::check(&config)?);

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            warnings,
        })
    }

    /// Wrap an in-memory config (embedding, tests).
    pub fn from_config(config: ParleyConfig) -> Result<Self> {
        let warnings = Self::check(&config)?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: PathBuf::new(),
            warnings,
        })
    }

    /// Parse a TOML document.
    pub fn parse(raw: &str) -> Result<ParleyConfig> {
        toml::from_str::<ParleyConfig>(raw)
            .map_err(|e| ParleyError::Config(format!("failed to parse config: {e}")))
    }

    fn read(path: &Path) -> Result<ParleyConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str::<ParleyConfig>(&raw).map_err(|e| {
            ParleyError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Validate. Errors abort, warnings are returned.
    fn check(config: &ParleyConfig) -> Result<Vec<ConfigWarning>> {
        config.validate().map_err(ParleyError::Config)
    }

    /// Warnings collected by the initial load.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Emit the load warnings through `tracing`.
    pub fn log_warnings(&self) {
        info!(path = %self.config_path.display(), "configuration loaded");
        log_all(&self.warnings);
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> ParleyConfig {
        self.config.read().clone()
    }

    /// Get a shared reference for subscription.
    pub fn shared(&self) -> Arc<RwLock<ParleyConfig>> {
        Arc::clone(&self.config)
    }

    /// Path the config was resolved to.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides. `lookup` is `std::env::var` outside tests.
    ///
    /// Log settings from the environment win over the file. Credentials only
    /// fill in what the file leaves unset.
    pub fn apply_env_overrides(
        mut config: ParleyConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ParleyConfig {
        if let Some(v) = lookup("PARLEY_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("PARLEY_LOG_FORMAT") {
            config.logging.format = v;
        }
        if let Some(token) = lookup("WITAI_ACCESS_TOKEN") {
            for parser in config.parsers.iter_mut().filter(|p| p.name == "witai") {
                if parser.access_token.is_none() {
                    parser.access_token = Some(token.clone());
                }
            }
        }
        config
    }

    /// Reload the config from disk. A file that fails validation leaves the
    /// current config in place.
    pub fn reload(&self) -> Result<()> {
        if !self.config_path.exists() {
            return Err(ParleyError::Config(format!(
                "config file not found: {}",
                self.config_path.display()
            )));
        }
        let new_config = Self::read(&self.config_path)?;
        let new_config = Self::apply_env_overrides(new_config, |key| std::env::var(key).ok());
        log_all(&Self::check(&new_config)?);
        *self.config.write() = new_config;
        info!("configuration reloaded");
        Ok(())
    }
}

fn log_all(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w.severity {
            WarningSeverity::Info => info!("{}", w),
            _ => warn!("{}", w),
        }
    }
}
