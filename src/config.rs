//! Configuration file management for onecrl2csv.
//!
//! This module handles loading, parsing, and merging configuration from TOML
//! files and command-line arguments. Settings can be specified in multiple
//! places with clear precedence rules.
//!
//! # Configuration Precedence
//!
//! 1. Default values (lowest priority)
//! 2. Configuration file (onecrl2csv.toml or specified with --config)
//! 3. Command-line arguments (highest priority)
//!
//! # Example Configuration File
//!
//! ```toml
//! url = "https://firefox.settings.services.mozilla.com/v1/buckets/blocklists/collections/certificates/records"
//! upper = false
//! separate = true
//! strict = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::remote::DEFAULT_URL;

/// File name consulted in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "onecrl2csv.toml";

/// Main configuration structure for onecrl2csv.
///
/// All fields are optional to support partial configuration and merging.
/// Missing values will be filled in by defaults or overridden by CLI arguments.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// URL of the blocklist record data
    pub url: Option<String>,
    /// revocations.txt file to load entries from instead of the URL
    pub file: Option<String>,
    /// Render hex serial digits in upper case
    pub upper: Option<bool>,
    /// Separate serial number bytes with colons
    pub separate: Option<bool>,
    /// Treat remote fetch or decode failures as fatal
    pub strict: Option<bool>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully parsed configuration
    /// * `Err(ConfigError::Io)` - File could not be read
    /// * `Err(ConfigError::Parse)` - File contains invalid TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Loads the configuration file in effect for this run.
    ///
    /// An explicitly given path must load successfully. Without one, a
    /// `onecrl2csv.toml` in the working directory is used when present;
    /// its absence simply means no file configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_default(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_with_default(explicit: Option<&Path>, default_file: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if default_file.exists() => Self::from_file(default_file),
            None => Ok(Self::empty()),
        }
    }

    /// Creates a configuration with no values set, the identity for merging.
    pub fn empty() -> Self {
        Config {
            url: None,
            file: None,
            upper: None,
            separate: None,
            strict: None,
        }
    }

    /// Creates a default configuration.
    ///
    /// # Default Values
    ///
    /// - `url`: the Mozilla OneCRL collection endpoint
    /// - `file`: None (remote mode)
    /// - `upper`: false (lower case hex)
    /// - `separate`: false (no colon separators)
    /// - `strict`: false (fetch failures log and yield zero records)
    pub fn default() -> Self {
        Config {
            url: Some(DEFAULT_URL.to_string()),
            file: None,
            upper: Some(false),
            separate: Some(false),
            strict: Some(false),
        }
    }

    /// Merges this configuration with another, prioritizing the other's values.
    ///
    /// For each field, if the `other` config has a value (Some), it overrides
    /// this config's value. If the `other` value is None, keeps the current value.
    pub fn merge_with(mut self, other: Config) -> Self {
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.file.is_some() {
            self.file = other.file;
        }
        if other.upper.is_some() {
            self.upper = other.upper;
        }
        if other.separate.is_some() {
            self.separate = other.separate;
        }
        if other.strict.is_some() {
            self.strict = other.strict;
        }
        self
    }

    /// Creates a Config from command-line arguments for merging.
    ///
    /// Only provided arguments (Some values) will override other
    /// configurations when merged.
    pub fn from_cli_args(
        url: Option<String>,
        file: Option<String>,
        upper: Option<bool>,
        separate: Option<bool>,
        strict: Option<bool>,
    ) -> Self {
        Config {
            url,
            file,
            upper,
            separate,
            strict,
        }
    }

    /// Generates an example configuration file in TOML format.
    ///
    /// Creates a sample configuration with all available options set to
    /// example values. Useful for bootstrapping a new configuration file.
    pub fn example_toml() -> String {
        let example = Config {
            url: Some(DEFAULT_URL.to_string()),
            file: Some("revocations.txt".to_string()),
            upper: Some(false),
            separate: Some(true),
            strict: Some(false),
        };

        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# Error generating example".to_string())
    }
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (missing required fields, invalid values, etc.)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
