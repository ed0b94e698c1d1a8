//! Error types for tablestat.
//!
//! Every variant is fatal for the current run. Stale or foreign-version cache
//! files are not errors, the store reports them as absent.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{0}")]
    DataUnavailable(String),

    #[error("No data received for schema '{schema}'")]
    NoData { schema: String },

    #[error("Error reading cache data from {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed cache data in {} at line {line}: {reason}", path.display())]
    CacheMalformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Error writing cache data to {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
