//! refmine configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! [`RefmineConfig::default`]. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding config discovery.
pub const REFMINE_CONFIG_ENV_VAR: &str = "REFMINE_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefmineConfig {
    #[serde(default)]
    pub detect: DetectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which classifier passes run, and on how many threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectConfig {
    /// Run the rename pass.
    #[serde(default = "default_true")]
    pub renames: bool,

    /// Run the type-change pass.
    #[serde(default = "default_true")]
    pub type_changes: bool,

    /// Worker threads for per-file parallelism. Unset uses one per CPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            renames: default_true(),
            type_changes: default_true(),
            threads: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level, with `RUST_LOG` directives
    /// appended when set.
    ///
    /// Invalid configured directives fall back to `info`.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self.env_filter_with(env_directives.as_deref())
    }

    fn env_filter_with(&self, env_directives: Option<&str>) -> tracing_subscriber::EnvFilter {
        let config_directives = Self::normalize_level_directives(&self.level);
        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` quotes the offending source line; keep only
        // the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl RefmineConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string()))
    }
}

/// Find the config file for `dir`.
///
/// Checked in order:
/// 1) `REFMINE_CONFIG_PATH` (absolute or relative to `dir`)
/// 2) `refmine.toml` in `dir`
/// 3) `.refmine.toml` in `dir`
pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(REFMINE_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        return Some(if candidate.is_absolute() {
            candidate
        } else {
            dir.join(candidate)
        });
    }

    ["refmine.toml", ".refmine.toml"]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load the config for `dir`, or the defaults when there is none.
pub fn load_for_dir(dir: &Path) -> Result<(RefmineConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(dir) else {
        return Ok((RefmineConfig::default(), None));
    };
    let config = RefmineConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}
