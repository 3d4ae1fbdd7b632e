//! # Gatepass Config
//!
//! Configuration management for the Gatepass SDK.
//!
//! A [`GatepassConfig`] carries the secret signing key and the two timing
//! defaults used when issuing and verifying tokens. It can be built in
//! code, loaded from a JSON or TOML file, or read from environment
//! variables, and optionally installed once as an immutable process-wide
//! default.
//!
//! The timing values are configuration with call-site defaults, not
//! mutable global state: a codec built from one config is unaffected by
//! any config created later.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default validity duration attached to an issued token, in seconds.
pub const DEFAULT_TOKEN_DURATION_SECS: i64 = 60;
/// Default freshness window applied at verification time, in seconds.
pub const DEFAULT_VALIDITY_WINDOW_SECS: i64 = 300;

/// Errors that can occur when working with Gatepass configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Secret key is required but was not provided. Please supply a non-empty signing secret.")]
    MissingSecretKey,

    #[error("Invalid duration: {0}. Durations must be positive integers in seconds.")]
    InvalidDuration(String),

    #[error("I/O error occurred while reading configuration: {0}")]
    IOError(String),

    #[error("Failed to parse configuration data: {0}")]
    ParseError(String),

    #[error("Global configuration has already been initialized. Call get_default_config() to access it.")]
    AlreadyInitialized,

    #[error("Environment variable error: {0}")]
    EnvVarError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

impl From<std::env::VarError> for ConfigError {
    fn from(error: std::env::VarError) -> Self {
        ConfigError::EnvVarError(error.to_string())
    }
}

/// Configuration for Gatepass token issuance and verification.
///
/// # Examples
///
/// ## Creating a configuration manually
///
/// ```
/// use gatepass_config::GatepassConfig;
///
/// let config = GatepassConfig::new("signing-secret", None, None);
/// assert_eq!(config.token_duration_secs, 60);
/// ```
///
/// ## Loading from a JSON file
///
/// ```no_run
/// use gatepass_config::GatepassConfig;
/// use std::path::Path;
///
/// let config = GatepassConfig::from_file(Path::new("./gatepass.json"))
///     .expect("Failed to load configuration");
/// ```
///
/// ## Loading from environment variables
///
/// ```no_run
/// use gatepass_config::GatepassConfig;
///
/// // Assuming the following environment variables are set:
/// // GATEPASS_SECRET_KEY=<signing secret>
/// // GATEPASS_TOKEN_DURATION=60
/// // GATEPASS_VALIDITY_WINDOW=300
/// let config = GatepassConfig::from_env("GATEPASS")
///     .expect("Failed to load configuration from environment");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatepassConfig {
    /// The secret signing key shared by issuer and verifier.
    pub secret_key: String,
    /// Advisory validity duration attached to issued tokens, in seconds.
    #[serde(default = "default_token_duration")]
    pub token_duration_secs: i64,
    /// Freshness window applied when verifying presented tokens, in seconds.
    #[serde(default = "default_validity_window")]
    pub validity_window_secs: i64,
}

fn default_token_duration() -> i64 {
    DEFAULT_TOKEN_DURATION_SECS
}

fn default_validity_window() -> i64 {
    DEFAULT_VALIDITY_WINDOW_SECS
}

impl GatepassConfig {
    /// Create a new configuration. `None` durations fall back to the
    /// 60 second issuance duration and 300 second verification window.
    pub fn new(
        secret_key: impl Into<String>,
        token_duration_secs: Option<i64>,
        validity_window_secs: Option<i64>,
    ) -> Self {
        GatepassConfig {
            secret_key: secret_key.into(),
            token_duration_secs: token_duration_secs.unwrap_or(DEFAULT_TOKEN_DURATION_SECS),
            validity_window_secs: validity_window_secs.unwrap_or(DEFAULT_VALIDITY_WINDOW_SECS),
        }
    }

    pub fn builder() -> GatepassConfigBuilder {
        GatepassConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification.
    pub fn to_builder(&self) -> GatepassConfigBuilder {
        GatepassConfigBuilder::from_config(self)
    }

    /// Create a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: GatepassConfig = serde_json::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from a TOML file.
    #[cfg(feature = "toml")]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: GatepassConfig = toml::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from environment variables.
    ///
    /// The variables are named with the given prefix followed by:
    /// - `SECRET_KEY`: the signing secret (content, not a path)
    /// - `TOKEN_DURATION`: issuance duration in seconds (optional)
    /// - `VALIDITY_WINDOW`: verification window in seconds (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let secret_key = env::var(format!("{}_SECRET_KEY", prefix))?;
        let token_duration_secs = optional_int_var(&format!("{}_TOKEN_DURATION", prefix))?
            .unwrap_or(DEFAULT_TOKEN_DURATION_SECS);
        let validity_window_secs = optional_int_var(&format!("{}_VALIDITY_WINDOW", prefix))?
            .unwrap_or(DEFAULT_VALIDITY_WINDOW_SECS);

        let config = GatepassConfig {
            secret_key,
            token_duration_secs,
            validity_window_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from environment variables, allowing the
    /// secret to be read from a file.
    ///
    /// Like [`from_env`](Self::from_env), but if `{PREFIX}_SECRET_KEY_FILE`
    /// is present the secret is read from the file at that path instead of
    /// being taken from `{PREFIX}_SECRET_KEY` directly.
    pub fn from_env_or_file(prefix: &str) -> Result<Self, ConfigError> {
        let secret_key = match env::var(format!("{}_SECRET_KEY_FILE", prefix)) {
            Ok(secret_file) => fs::read_to_string(&secret_file)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| ConfigError::IOError(format!("Failed to read secret file: {}", e)))?,
            Err(std::env::VarError::NotPresent) => env::var(format!("{}_SECRET_KEY", prefix))?,
            Err(e) => return Err(e.into()),
        };

        let token_duration_secs = optional_int_var(&format!("{}_TOKEN_DURATION", prefix))?
            .unwrap_or(DEFAULT_TOKEN_DURATION_SECS);
        let validity_window_secs = optional_int_var(&format!("{}_VALIDITY_WINDOW", prefix))?
            .unwrap_or(DEFAULT_VALIDITY_WINDOW_SECS);

        let config = GatepassConfig {
            secret_key,
            token_duration_secs,
            validity_window_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }
        if self.token_duration_secs <= 0 {
            return Err(ConfigError::InvalidDuration(format!(
                "token_duration_secs = {}",
                self.token_duration_secs
            )));
        }
        if self.validity_window_secs <= 0 {
            return Err(ConfigError::InvalidDuration(format!(
                "validity_window_secs = {}",
                self.validity_window_secs
            )));
        }
        Ok(())
    }
}

fn optional_int_var(name: &str) -> Result<Option<i64>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidDuration(format!("{} = {}", name, value))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Builder for [`GatepassConfig`].
#[derive(Default, Debug)]
pub struct GatepassConfigBuilder {
    secret_key: Option<String>,
    token_duration_secs: Option<i64>,
    validity_window_secs: Option<i64>,
}

impl GatepassConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an existing configuration.
    pub fn from_config(config: &GatepassConfig) -> Self {
        Self {
            secret_key: Some(config.secret_key.clone()),
            token_duration_secs: Some(config.token_duration_secs),
            validity_window_secs: Some(config.validity_window_secs),
        }
    }

    /// Set the secret signing key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the issuance duration in seconds.
    pub fn token_duration_secs(mut self, secs: i64) -> Self {
        self.token_duration_secs = Some(secs);
        self
    }

    /// Set the verification window in seconds.
    pub fn validity_window_secs(mut self, secs: i64) -> Self {
        self.validity_window_secs = Some(secs);
        self
    }

    /// Build the configuration, validating all fields.
    pub fn build(self) -> Result<GatepassConfig, ConfigError> {
        let config = GatepassConfig {
            secret_key: self.secret_key.ok_or(ConfigError::MissingSecretKey)?,
            token_duration_secs: self
                .token_duration_secs
                .unwrap_or(DEFAULT_TOKEN_DURATION_SECS),
            validity_window_secs: self
                .validity_window_secs
                .unwrap_or(DEFAULT_VALIDITY_WINDOW_SECS),
        };
        config.validate()?;
        Ok(config)
    }
}

static DEFAULT_CONFIG: OnceLock<GatepassConfig> = OnceLock::new();

/// Set the default global configuration.
///
/// The default is write-once: attempting to set it again returns
/// `AlreadyInitialized`.
pub fn set_default_config(config: GatepassConfig) -> Result<(), ConfigError> {
    config.validate()?;
    DEFAULT_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Get the default global configuration, if one was set.
pub fn get_default_config() -> Option<&'static GatepassConfig> {
    DEFAULT_CONFIG.get()
}

/// Try to load a configuration from conventional locations.
///
/// Checks, in order: the `GATEPASS_*` environment variables, then
/// `./gatepass.json`, `~/.gatepass/config.json`, `/etc/gatepass/config.json`,
/// and their TOML counterparts.
pub fn try_load_default_config() -> Option<GatepassConfig> {
    if let Ok(config) = GatepassConfig::from_env_or_file("GATEPASS") {
        return Some(config);
    }

    let json_paths = [
        "./gatepass.json",
        "~/.gatepass/config.json",
        "/etc/gatepass/config.json",
    ];
    for path in json_paths.iter() {
        if let Some(expanded) = expand_home(path) {
            if expanded.exists() {
                if let Ok(config) = GatepassConfig::from_file(&expanded) {
                    return Some(config);
                }
            }
        }
    }

    #[cfg(feature = "toml")]
    {
        let toml_paths = [
            "./gatepass.toml",
            "~/.gatepass/config.toml",
            "/etc/gatepass/config.toml",
        ];
        for path in toml_paths.iter() {
            if let Some(expanded) = expand_home(path) {
                if expanded.exists() {
                    if let Ok(config) = GatepassConfig::from_toml(&expanded) {
                        return Some(config);
                    }
                }
            }
        }
    }

    None
}

fn expand_home(path: &str) -> Option<std::path::PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(stripped))
    } else {
        Some(Path::new(path).to_path_buf())
    }
}
