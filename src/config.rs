use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;
use crate::error::ProbeError;
use crate::platform;

pub const DEFAULT_PORT: u16 = 3306;

/// Cache file format version, written into every snapshot header.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Config {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    pub schema: String,
    pub invoking_user: String,
    pub cache_dir: PathBuf,
    pub connect_timeout: Option<Duration>,
    pub max_age: Option<Duration>,
    pub format_version: String,
}

/// Optional settings read from config.toml
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub cache_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub connect_timeout: Option<String>,
    pub max_age: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, ProbeError> {
        toml::from_str(text).map_err(|e| ProbeError::Config(e.to_string()))
    }

    /// Load the explicit path if given (must exist), otherwise the default
    /// location (may be absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ProbeError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match platform::default_config_path() {
                Some(path) => (path, false),
                None => return Ok(FileConfig::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(target: "tablestat::config", path = %path.display(), "loaded config file");
                Self::parse(&text)
                    .map_err(|e| ProbeError::Config(format!("{}: {e}", path.display())))
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(FileConfig::default())
            }
            Err(e) => Err(ProbeError::Config(format!("{}: {e}", path.display()))),
        }
    }
}

fn parse_duration(field: &str, value: Option<&str>) -> Result<Option<Duration>, ProbeError> {
    value
        .map(|v| {
            humantime::parse_duration(v)
                .map_err(|e| ProbeError::Config(format!("{field} '{v}': {e}")))
        })
        .transpose()
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ProbeError> {
        let file = FileConfig::load(cli.config.as_deref())?;
        Self::from_parts(cli, file, platform::invoking_user())
    }

    /// Merge CLI arguments over file settings over defaults.
    pub fn from_parts(
        cli: &Cli,
        file: FileConfig,
        invoking_user: String,
    ) -> Result<Self, ProbeError> {
        let connect_timeout = parse_duration("connect_timeout", file.connect_timeout.as_deref())?;
        let max_age = parse_duration("max_age", file.max_age.as_deref())?;

        let cache_dir = cli
            .cache_dir
            .clone()
            .or(file.cache_dir)
            .unwrap_or_else(platform::temp_dir);

        Ok(Config {
            host: cli.hostname.clone(),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            username: cli.username.clone(),
            password: cli.password.clone(),
            schema: cli.schema.clone(),
            invoking_user,
            cache_dir,
            connect_timeout,
            max_age,
            format_version: FORMAT_VERSION.to_string(),
        })
    }
}
