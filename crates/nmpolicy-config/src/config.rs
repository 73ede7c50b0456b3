// crates/nmpolicy-config/src/config.rs
// ============================================================================
// Module: nmpolicy Configuration
// Description: Configuration loading and validation for the nmpolicy engine.
// Purpose: Provide strict config parsing with hard limits.
// Dependencies: nmpolicy-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is optional. When present it is read from a TOML file with
//! strict size and path limits, and every value is validated before use.
//!
//! Resolution order: explicit path, then the `NMPOLICY_CONFIG` environment
//! variable, then `nmpolicy.toml` in the working directory. An explicit or
//! environment path must exist; the working-directory default falls back to
//! built-in defaults when absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use nmpolicy_core::GeneratorConfig;
use nmpolicy_core::expression::DEFAULT_MAX_EXPRESSION_BYTES;
use nmpolicy_core::expression::DEFAULT_MAX_PATH_SEGMENTS;
use nmpolicy_core::expression::ExpressionLimits;
use nmpolicy_core::runtime::DEFAULT_MAX_DOCUMENT_BYTES;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "nmpolicy.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "NMPOLICY_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `limits.max_expression_bytes`.
pub const MAX_EXPRESSION_BYTES_CAP: usize = 1024 * 1024;
/// Upper bound for `limits.max_path_segments`.
pub const MAX_PATH_SEGMENTS_CAP: usize = 1024;
/// Upper bound for `limits.max_document_bytes`.
pub const MAX_DOCUMENT_BYTES_CAP: usize = 256 * 1024 * 1024;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level nmpolicy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NmpolicyConfig {
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the configuration was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl NmpolicyConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            return Ok(Self::default());
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()
    }

    /// Returns the core generator configuration for these limits.
    #[must_use]
    pub const fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            expression_limits: ExpressionLimits {
                max_bytes: self.limits.max_expression_bytes,
                max_segments: self.limits.max_path_segments,
            },
            max_document_bytes: self.limits.max_document_bytes,
        }
    }
}

/// Input size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum capture expression length in bytes.
    #[serde(default = "default_max_expression_bytes")]
    pub max_expression_bytes: usize,
    /// Maximum number of path segments per capture expression.
    #[serde(default = "default_max_path_segments")]
    pub max_path_segments: usize,
    /// Maximum size of any input document in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_expression_bytes: default_max_expression_bytes(),
            max_path_segments: default_max_path_segments(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Validates limits are non-zero and within caps.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit(
            "limits.max_expression_bytes",
            self.max_expression_bytes,
            MAX_EXPRESSION_BYTES_CAP,
        )?;
        validate_limit("limits.max_path_segments", self.max_path_segments, MAX_PATH_SEGMENTS_CAP)?;
        validate_limit(
            "limits.max_document_bytes",
            self.max_document_bytes,
            MAX_DOCUMENT_BYTES_CAP,
        )
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level of emitted events.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Per-call summaries.
    Info,
    /// Per-capture events.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::Invalid(format!(
                "unknown log level `{value}` (expected error, warn, info, debug, or trace)"
            ))),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `limits.max_expression_bytes`.
const fn default_max_expression_bytes() -> usize {
    DEFAULT_MAX_EXPRESSION_BYTES
}

/// Default for `limits.max_path_segments`.
const fn default_max_path_segments() -> usize {
    DEFAULT_MAX_PATH_SEGMENTS
}

/// Default for `limits.max_document_bytes`.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Validates that a limit is non-zero and at most `cap`.
fn validate_limit(field: &str, value: usize, cap: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > cap {
        return Err(ConfigError::Invalid(format!("{field} must be at most {cap}")));
    }
    Ok(())
}

/// Resolves the config path from CLI or environment defaults.
///
/// Returns `None` when no path was given and the default file is absent.
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
