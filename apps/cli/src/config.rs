//! CLI configuration.
//!
//! Sources, lowest priority first:
//! - built-in defaults
//! - `sieve.toml` in the working directory, or the file given by `--config`
//! - `SIEVE__*` environment variables (`SIEVE__COMPILE__REQUIRED=true`)
//!
//! A `.env` file is loaded into the environment before any of these are read.

use std::path::Path;

use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sieve_filter::ApiVersion;

const DEFAULT_CONFIG_FILE: &str = "sieve";
const ENV_PREFIX: &str = "SIEVE";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub compile: CompileConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompileConfig {
    /// Fail when a request parses no clause at all.
    pub required: bool,
    /// Wire version assumed for input documents (`v2` or `v3`).
    pub version: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder).context("Failed to read configuration")
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("compile.required", false)?
            .set_default("compile.version", ApiVersion::default().as_str())?
            .set_default("compile.pretty", true)?
            .set_default("logging.level", "warn")?
            .set_default("logging.json", false)?
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.api_version()?;
        if self.logging.level.trim().is_empty() {
            return Err("logging.level must not be empty".to_string());
        }
        Ok(())
    }

    pub fn api_version(&self) -> Result<ApiVersion, String> {
        self.compile.version.parse()
    }
}
