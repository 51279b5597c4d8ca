//! Configuration module for `CreditChecker`

use crate::core::selection::CrossListPolicy;
use crate::logger::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$CREDIT_CHECKER";

const fn default_cache_ttl() -> u64 {
    600
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding one `<Tab>.csv` per catalog table
    #[serde(default)]
    pub catalog_dir: String,
    /// Seconds a loaded catalog stays valid
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog_dir: String::new(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Cross-list keying: "shared" or "per-context"
    #[serde(default)]
    pub cross_list: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for summary report files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Catalog source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Selection settings
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog directory
    pub catalog_dir: Option<String>,
    /// Override cache window in seconds
    pub cache_ttl_secs: Option<u64>,
    /// Override cross-list policy
    pub cross_list: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$CREDIT_CHECKER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/creditchecker`
    /// - macOS: `~/Library/Application Support/creditchecker`
    /// - Windows: `%APPDATA%\creditchecker`
    #[must_use]
    pub fn get_credit_checker_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("creditchecker")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty in the current config and non-empty in
    /// defaults are updated, so upgrades pick up new settings without touching
    /// user choices.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.source.catalog_dir.is_empty() && !defaults.source.catalog_dir.is_empty() {
            self.source
                .catalog_dir
                .clone_from(&defaults.source.catalog_dir);
            changed = true;
        }

        if self.selection.cross_list.is_empty() && !defaults.selection.cross_list.is_empty() {
            self.selection
                .cross_list
                .clone_from(&defaults.selection.cross_list);
            changed = true;
        }

        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the config file is not modified.
    /// Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(catalog_dir) = &overrides.catalog_dir {
            self.source.catalog_dir.clone_from(catalog_dir);
        }
        if let Some(ttl) = overrides.cache_ttl_secs {
            self.source.cache_ttl_secs = ttl;
        }

        if let Some(cross_list) = &overrides.cross_list {
            self.selection.cross_list.clone_from(cross_list);
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_credit_checker_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CREDIT_CHECKER` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_credit_checker_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults and `$CREDIT_CHECKER` is
    /// expanded in path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.source.catalog_dir = Self::expand_variables(&config.source.catalog_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultCLIConfigDebug.toml`
    /// - Release: Uses `DefaultCLIConfigRelease.toml`
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from defaults
    ///   and saves the result when anything was added
    /// - On first run: creates the config directory and saves the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `catalog_dir`,
    /// `cache_ttl`, `cross_list`, `reports_dir` (dashes are accepted in place
    /// of underscores).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog_dir" | "catalog-dir" => Some(self.source.catalog_dir.clone()),
            "cache_ttl" | "cache-ttl" | "cache_ttl_secs" => {
                Some(self.source.cache_ttl_secs.to_string())
            }
            "cross_list" | "cross-list" => Some(self.selection.cross_list.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: `level` must be a known log level, `verbose` a
    /// boolean, `cache_ttl` a number of seconds and `cross_list` a known policy.
    /// Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                value.parse::<Level>()?;
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "catalog_dir" | "catalog-dir" => self.source.catalog_dir = value.to_string(),
            "cache_ttl" | "cache-ttl" | "cache_ttl_secs" => {
                self.source.cache_ttl_secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid number of seconds for 'cache_ttl': '{value}'"))?;
            }
            "cross_list" | "cross-list" => {
                value.parse::<CrossListPolicy>()?;
                self.selection.cross_list = value.to_string();
            }
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog_dir" | "catalog-dir" => self
                .source
                .catalog_dir
                .clone_from(&defaults.source.catalog_dir),
            "cache_ttl" | "cache-ttl" | "cache_ttl_secs" => {
                self.source.cache_ttl_secs = defaults.source.cache_ttl_secs;
            }
            "cross_list" | "cross-list" => self
                .selection
                .cross_list
                .clone_from(&defaults.selection.cross_list),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Catalog cache window
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.source.cache_ttl_secs)
    }

    /// Cross-list policy; an empty setting means the default
    ///
    /// # Errors
    /// Returns an error if the configured value is not a known policy
    pub fn cross_list_policy(&self) -> Result<CrossListPolicy, String> {
        if self.selection.cross_list.trim().is_empty() {
            return Ok(CrossListPolicy::default());
        }
        self.selection.cross_list.parse()
    }

    /// Catalog directory as a path
    #[must_use]
    pub fn catalog_dir(&self) -> PathBuf {
        PathBuf::from(&self.source.catalog_dir)
    }

    /// Reports directory as a path
    #[must_use]
    pub fn reports_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.reports_dir)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[source]")?;
        writeln!(f, "  catalog_dir = \"{}\"", self.source.catalog_dir)?;
        writeln!(f, "  cache_ttl_secs = {}", self.source.cache_ttl_secs)?;

        writeln!(f, "\n[selection]")?;
        writeln!(f, "  cross_list = \"{}\"", self.selection.cross_list)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_defaults_parse() {
        assert!(Config::from_toml(CONFIG_DEFAULTS).is_ok());
    }

    #[test]
    fn test_cross_list_policy_default_when_empty() {
        let config = Config::default();
        assert_eq!(config.cross_list_policy(), Ok(CrossListPolicy::Shared));
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::from_defaults();
        assert!(config.set("level", "loud").is_err());
        assert!(config.set("cache_ttl", "soon").is_err());
        assert!(config.set("cross_list", "both").is_err());

        config.set("cross-list", "per-context").expect("valid policy");
        assert_eq!(config.cross_list_policy(), Ok(CrossListPolicy::PerContext));
        config.set("cache-ttl", "30").expect("valid ttl");
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
    }
}
