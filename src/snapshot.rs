//! Counter snapshot model.
//!
//! A snapshot is one timestamped capture of cumulative row counters for
//! every table in a schema:
//! - TableKey: `schema.table` with spaces and line breaks normalized to underscores
//! - CounterSet: cumulative fetch/insert/update/delete counts
//! - Snapshot: format version + capture time + counters per table

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The four row operations tracked per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Fetch,
    Insert,
    Update,
    Delete,
}

impl CounterKind {
    pub const ALL: [CounterKind; 4] = [
        CounterKind::Fetch,
        CounterKind::Insert,
        CounterKind::Update,
        CounterKind::Delete,
    ];

    /// Metric suffix, e.g. `fetch` in `db.users.fetch=3;;;`
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Fetch => "fetch",
            CounterKind::Insert => "insert",
            CounterKind::Update => "update",
            CounterKind::Delete => "delete",
        }
    }

    /// Past tense used in per-table detail lines
    pub fn verb(&self) -> &'static str {
        match self {
            CounterKind::Fetch => "fetched",
            CounterKind::Insert => "inserted",
            CounterKind::Update => "updated",
            CounterKind::Delete => "deleted",
        }
    }

    /// Plural noun used in the summary line
    pub fn plural(&self) -> &'static str {
        match self {
            CounterKind::Fetch => "fetches",
            CounterKind::Insert => "inserts",
            CounterKind::Update => "updates",
            CounterKind::Delete => "deletes",
        }
    }
}

/// Table identifier in `schema.table` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TableKey(String);

impl TableKey {
    /// Build a key from raw schema and table names, replacing spaces and line
    /// breaks with underscores. Case is preserved.
    pub fn new(schema: &str, table: &str) -> Self {
        TableKey(format!("{}.{}", normalize(schema), normalize(table)))
    }

    /// Wrap an already normalized key, as read back from a cache file.
    pub fn from_normalized(key: impl Into<String>) -> Self {
        TableKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line breaks are folded too, a key is always a single cache file line.
fn normalize(name: &str) -> String {
    name.replace([' ', '\n', '\r'], "_")
}

/// Cumulative row counters for a single table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSet {
    pub fetch: u64,
    pub insert: u64,
    pub update: u64,
    pub delete: u64,
}

impl CounterSet {
    pub fn get(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::Fetch => self.fetch,
            CounterKind::Insert => self.insert,
            CounterKind::Update => self.update,
            CounterKind::Delete => self.delete,
        }
    }
}

/// Counters for every table of a schema, keyed and ordered by table.
pub type Counters = BTreeMap<TableKey, CounterSet>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub format_version: String,
    /// Unix seconds
    pub captured_at: i64,
    pub counters: Counters,
}

impl Snapshot {
    pub fn new(format_version: impl Into<String>, captured_at: i64, counters: Counters) -> Self {
        Snapshot {
            format_version: format_version.into(),
            captured_at,
            counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_key_normalizes_spaces() {
        let key = TableKey::new("my shop", "order items");
        assert_eq!(key.as_str(), "my_shop.order_items");
    }

    #[test]
    fn table_key_folds_line_breaks() {
        let key = TableKey::new("shop", "odd\r\nname");
        assert_eq!(key.as_str(), "shop.odd__name");
    }

    #[test]
    fn table_key_preserves_case() {
        let key = TableKey::new("Shop", "OrderItems");
        assert_eq!(key.to_string(), "Shop.OrderItems");
    }

    #[test]
    fn counter_set_get_matches_fields() {
        let set = CounterSet {
            fetch: 1,
            insert: 2,
            update: 3,
            delete: 4,
        };
        let values: Vec<u64> = CounterKind::ALL.iter().map(|k| set.get(*k)).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }
}
