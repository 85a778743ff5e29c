//! Configuration loading.
//!
//! The default configuration file is `sudoers-audit.toml` in the current
//! working directory. Every table is optional:
//!
//! ```toml
//! [strict]
//! enabled = true
//!
//! [permissions]
//! enabled = true
//!
//! [rules]
//! disabled = ["SUDO011"]
//!
//! [catalogue]
//! exclude = ["cat"]
//!
//! [catalogue.extra]
//! deploy-tool = "https://wiki.example.org/deploy-tool-escape"
//! ```
//!
//! ```rust,no_run
//! use sudoers_audit::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_rule_enabled("SUDO001"));
//! ```

use crate::catalogue::BinaryCatalogue;
use std::collections::HashMap;
use std::path::Path;

/// File name looked up in the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sudoers-audit.toml";

/// Main configuration for an audit run.
///
/// All fields carry defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// When strict mode is enabled, any issue fails the audit.
    pub strict: StrictConfig,
    /// Filesystem permission checks on referenced command paths.
    pub permissions: PermissionsConfig,
    /// Rule selection.
    pub rules: RulesConfig,
    /// Changes to the built-in risky-binary catalogue.
    pub catalogue: CatalogueConfig,
}

/// Strict-mode configuration.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    /// Set to `true` to fail on MEDIUM, WARNING and LOW issues too.
    pub enabled: bool,
}

/// Permission-check configuration.
///
/// Results of these checks depend on the host running the audit, so they are
/// off unless enabled here or with `--check-perms`.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PermissionsConfig {
    pub enabled: bool,
}

/// Rule selection.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids to skip (e.g. `"SUDO011"`). Normalized to upper case at load.
    pub disabled: Vec<String>,
}

/// Changes applied on top of [`BinaryCatalogue::gtfobins`].
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Additional binaries, mapped to a reference URL.
    pub extra: HashMap<String, String>,
    /// Built-in binaries to drop.
    pub exclude: Vec<String>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `sudoers-audit.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let mut config = Config::from_toml(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                config.rules.normalize();
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Parses configuration from TOML text without normalizing it.
    pub fn from_toml(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns `true` unless `id` is listed in `[rules] disabled`.
    ///
    /// ```
    /// use sudoers_audit::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.rules.disabled.push("SUDO011".to_string());
    /// assert!(!config.is_rule_enabled("SUDO011"));
    /// assert!(config.is_rule_enabled("SUDO001"));
    /// ```
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        !self
            .rules
            .disabled
            .iter()
            .any(|d| d.eq_ignore_ascii_case(id))
    }

    /// The catalogue this configuration selects.
    pub fn catalogue(&self) -> BinaryCatalogue {
        BinaryCatalogue::gtfobins()
            .without(&self.catalogue.exclude)
            .with_extra(&self.catalogue.extra)
    }
}

impl RulesConfig {
    /// Upper-cases rule ids in place so lookups can compare exactly.
    pub fn normalize(&mut self) {
        for id in &mut self.disabled {
            *id = id.trim().to_uppercase();
        }
    }
}
