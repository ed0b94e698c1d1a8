//! Cache file codec.
//!
//! Layout:
//! - line 1: `<format_version>|<captured_at_unix_seconds>`
//! - lines 2..N: `<schema.table>:<fetch>:<insert>:<update>:<delete>`

use crate::snapshot::{CounterSet, Snapshot, TableKey};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub format_version: String,
    pub captured_at: i64,
}

pub fn encode(snapshot: &Snapshot) -> String {
    let mut out = format!("{}|{}\n", snapshot.format_version, snapshot.captured_at);
    for (key, c) in &snapshot.counters {
        // writing to a String cannot fail
        let _ = writeln!(out, "{key}:{}:{}:{}:{}", c.fetch, c.insert, c.update, c.delete);
    }
    out
}

pub fn decode_header(line: &str) -> Result<Header, String> {
    let (version, timestamp) = line
        .trim_end()
        .split_once('|')
        .ok_or_else(|| "header is missing the '|' separator".to_string())?;

    let captured_at = timestamp
        .parse::<i64>()
        .map_err(|e| format!("invalid capture timestamp '{timestamp}': {e}"))?;

    Ok(Header {
        format_version: version.to_string(),
        captured_at,
    })
}

/// Parse one table line. Counters are split off from the right so a table
/// key containing ':' still decodes.
pub fn decode_entry(line: &str) -> Result<(TableKey, CounterSet), String> {
    let mut fields = line.trim_end().rsplitn(5, ':');

    let mut next_counter = |name: &str| -> Result<u64, String> {
        let raw = fields
            .next()
            .ok_or_else(|| format!("missing {name} counter"))?;
        raw.parse::<u64>()
            .map_err(|e| format!("invalid {name} counter '{raw}': {e}"))
    };

    let delete = next_counter("delete")?;
    let update = next_counter("update")?;
    let insert = next_counter("insert")?;
    let fetch = next_counter("fetch")?;

    let key = fields
        .next()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| "missing table key".to_string())?;

    Ok((
        TableKey::from_normalized(key),
        CounterSet {
            fetch,
            insert,
            update,
            delete,
        },
    ))
}
