//! Configuration for the engine client.
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`)
//! 3. environment variables:
//!    - `DOMINION_ENGINE`          (default: "./bin/dominion")
//!    - `DOMINION_TURNS`           (default: "1", "0" = until the engine stops)
//!    - `DOMINION_MOVE`            (default: "copper")
//!    - `DOMINION_READ_TIMEOUT_MS` (default: unset, wait forever)
//! 4. command-line flags

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use dominion_core::{DuplicateBlockPolicy, MoveToken};
use dominion_protocol::ParseOptions;
use serde::Deserialize;
use thiserror::Error;

/// How each parsed turn is printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `**block**` headers followed by `key : value` lines.
    #[default]
    Text,
    /// One JSON object per turn.
    Json,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Engine executable to spawn.
    pub engine: String,

    /// Extra arguments passed to the engine.
    pub engine_args: Vec<String>,

    /// Turns to play before exiting; `0` plays until the engine closes.
    pub turns: u32,

    /// Move sent back every turn.
    #[serde(rename = "move")]
    pub move_token: String,

    /// What to do when a block marker repeats within one turn.
    pub duplicate_blocks: DuplicateBlockPolicy,

    pub format: OutputFormat,

    /// Give up on a turn that takes longer than this; unset waits forever.
    pub read_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: "./bin/dominion".to_string(),
            engine_args: Vec::new(),
            turns: 1,
            move_token: "copper".to_string(),
            duplicate_blocks: DuplicateBlockPolicy::default(),
            format: OutputFormat::default(),
            read_timeout_ms: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}: {message}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        message: String,
    },
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub engine: Option<String>,
    pub engine_args: Vec<String>,
    pub turns: Option<u32>,
    pub move_token: Option<String>,
    pub duplicate_blocks: Option<DuplicateBlockPolicy>,
    pub format: Option<OutputFormat>,
    pub read_timeout_ms: Option<u64>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `DOMINION_*` environment variables.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|key| env::var(key).ok())
    }

    /// Apply environment overrides using `lookup` instead of the process
    /// environment.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(engine) = lookup("DOMINION_ENGINE") {
            self.engine = engine;
        }
        self.turns = read_env_or(&lookup, "DOMINION_TURNS", self.turns)?;
        if let Some(mv) = lookup("DOMINION_MOVE") {
            self.move_token = mv;
        }
        if let Some(ms) = read_env(&lookup, "DOMINION_READ_TIMEOUT_MS")? {
            self.read_timeout_ms = Some(ms);
        }
        Ok(self)
    }

    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(engine) = overrides.engine {
            self.engine = engine;
        }
        if !overrides.engine_args.is_empty() {
            self.engine_args = overrides.engine_args;
        }
        if let Some(turns) = overrides.turns {
            self.turns = turns;
        }
        if let Some(mv) = overrides.move_token {
            self.move_token = mv;
        }
        if let Some(policy) = overrides.duplicate_blocks {
            self.duplicate_blocks = policy;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(ms) = overrides.read_timeout_ms {
            self.read_timeout_ms = Some(ms);
        }
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            duplicate_blocks: self.duplicate_blocks,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn move_token(&self) -> MoveToken {
        MoveToken::new(self.move_token.clone())
    }
}

fn read_env<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::InvalidEnv {
            key,
            message: e.to_string(),
            value,
        }),
    }
}

fn read_env_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    Ok(read_env(lookup, key)?.unwrap_or(default))
}
