//! Layered configuration: built-in defaults, then a TOML file named by
//! `COUP_CONFIG`, then `COUP_*` environment variables. Command-line flags are
//! applied last by each command.

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Shoe seed for `deal` and `sim`; random when unset
    pub seed: Option<u64>,
    /// Rounds simulated by `sim` when `--rounds` is not given
    pub rounds: u64,
    /// Emit JSON instead of text where a command supports both
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub rounds: ValueSource,
    pub json: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            rounds: ValueSource::Default,
            json: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            rounds: 100,
            json: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("COUP_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.rounds {
            cfg.rounds = v;
            sources.rounds = ValueSource::File;
        }
        if let Some(v) = f.json {
            cfg.json = v;
            sources.json = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("COUP_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid COUP_SEED: {seed}")))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(rounds) = std::env::var("COUP_ROUNDS")
        && !rounds.is_empty()
    {
        cfg.rounds = rounds
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid COUP_ROUNDS: {rounds}")))?;
        sources.rounds = ValueSource::Env;
    }
    if let Ok(json) = std::env::var("COUP_JSON")
        && !json.is_empty()
    {
        cfg.json = parse_bool(&json)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid COUP_JSON: {json}")))?;
        sources.json = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    rounds: Option<u64>,
    #[serde(default)]
    json: Option<bool>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.rounds == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: rounds must be >=1".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
