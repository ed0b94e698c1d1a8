//! Flat-file snapshot storage.
//!
//! Keeps exactly one snapshot per cache identity under the cache directory
//! (the system temp dir unless configured). Supports:
//! - Loading the prior snapshot, treating missing, foreign-version and
//!   not-yet-past captures as "no usable data"
//! - Replacing it atomically with the current capture

pub mod codec;
pub mod identity;

pub use identity::CacheIdentity;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ProbeError;
use crate::snapshot::{Counters, Snapshot};

const FILE_PREFIX: &str = "tablestat";

pub struct SnapshotStore {
    dir: PathBuf,
    format_version: String,
    max_age: Option<Duration>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, format_version: impl Into<String>) -> Self {
        SnapshotStore {
            dir: dir.into(),
            format_version: format_version.into(),
            max_age: None,
        }
    }

    /// Treat snapshots older than `max_age` as absent.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    pub fn path_for(&self, identity: &CacheIdentity) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}.{identity}.dat"))
    }

    /// Load the prior snapshot for `identity` as seen at unix time `now`.
    pub fn load(&self, identity: &CacheIdentity, now: i64) -> Result<Option<Snapshot>, ProbeError> {
        let path = self.path_for(identity);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "tablestat::store", path = %path.display(), "no cache file");
                return Ok(None);
            }
            Err(source) => return Err(ProbeError::CacheRead { path, source }),
        };

        let mut lines = text.lines().enumerate();

        let header_line = lines.next().map(|(_, l)| l).unwrap_or("");
        let header = codec::decode_header(header_line).map_err(|reason| ProbeError::CacheMalformed {
            path: path.clone(),
            line: 1,
            reason,
        })?;

        if header.format_version != self.format_version {
            debug!(
                target: "tablestat::store",
                found = %header.format_version,
                expected = %self.format_version,
                "cache format version mismatch, ignoring"
            );
            return Ok(None);
        }

        if header.captured_at >= now {
            debug!(
                target: "tablestat::store",
                captured_at = header.captured_at,
                now,
                "cache capture is not in the past, ignoring"
            );
            return Ok(None);
        }

        if let Some(max_age) = self.max_age {
            let age = now.saturating_sub(header.captured_at);
            if u64::try_from(age).unwrap_or(u64::MAX) > max_age.as_secs() {
                debug!(
                    target: "tablestat::store",
                    age,
                    max_age = max_age.as_secs(),
                    "cache is older than max age, ignoring"
                );
                return Ok(None);
            }
        }

        let mut counters = Counters::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (key, set) = codec::decode_entry(line).map_err(|reason| ProbeError::CacheMalformed {
                path: path.clone(),
                line: idx + 1,
                reason,
            })?;
            counters.insert(key, set);
        }

        debug!(
            target: "tablestat::store",
            tables = counters.len(),
            captured_at = header.captured_at,
            "loaded prior snapshot"
        );

        Ok(Some(Snapshot::new(header.format_version, header.captured_at, counters)))
    }

    /// Replace the snapshot for `identity`. Writes a sibling temp file and
    /// renames it over the target so readers never see a partial file.
    pub fn save(&self, identity: &CacheIdentity, snapshot: &Snapshot) -> Result<(), ProbeError> {
        let path = self.path_for(identity);
        let write_err = |source: io::Error| ProbeError::CacheWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{FILE_PREFIX}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;

        tmp.write_all(codec::encode(snapshot).as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!(
            target: "tablestat::store",
            path = %path.display(),
            tables = snapshot.counters.len(),
            "saved snapshot"
        );

        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
