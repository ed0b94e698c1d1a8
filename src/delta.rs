//! Rate computation engine.
//!
//! Compares the prior snapshot with the current capture:
//! - Tables present in both are tracked and get per-second rates
//! - Tables only in the current capture are new and excluded from totals
//! - Tables only in the prior snapshot are dropped
//!
//! Rates use truncating integer division. A counter reset yields a negative
//! rate, which is reported as is.

use serde::Serialize;

use crate::snapshot::{CounterKind, CounterSet, Snapshot, TableKey};

/// Signed per-second rate for each counter kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rates {
    pub fetch: i64,
    pub insert: i64,
    pub update: i64,
    pub delete: i64,
}

impl Rates {
    pub fn get(&self, kind: CounterKind) -> i64 {
        match kind {
            CounterKind::Fetch => self.fetch,
            CounterKind::Insert => self.insert,
            CounterKind::Update => self.update,
            CounterKind::Delete => self.delete,
        }
    }

    fn between(prior: &CounterSet, current: &CounterSet, elapsed: i64) -> Self {
        let rate = |kind| {
            let to = i64::try_from(current.get(kind)).unwrap_or(i64::MAX);
            let from = i64::try_from(prior.get(kind)).unwrap_or(i64::MAX);
            to.saturating_sub(from) / elapsed
        };

        Rates {
            fetch: rate(CounterKind::Fetch),
            insert: rate(CounterKind::Insert),
            update: rate(CounterKind::Update),
            delete: rate(CounterKind::Delete),
        }
    }

    fn accumulate(&mut self, other: &Rates) {
        self.fetch = self.fetch.saturating_add(other.fetch);
        self.insert = self.insert.saturating_add(other.insert);
        self.update = self.update.saturating_add(other.update);
        self.delete = self.delete.saturating_add(other.delete);
    }

    pub fn is_idle(&self) -> bool {
        CounterKind::ALL.iter().all(|k| self.get(*k) == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    Tracked { rates: Rates },
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDelta {
    pub key: TableKey,
    #[serde(flatten)]
    pub status: TableStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaReport {
    pub schema: String,
    pub elapsed_seconds: i64,
    pub tables: Vec<TableDelta>,
    pub totals: Rates,
}

impl DeltaReport {
    pub fn tracked(&self) -> impl Iterator<Item = (&TableKey, &Rates)> {
        self.tables.iter().filter_map(|t| match &t.status {
            TableStatus::Tracked { rates } => Some((&t.key, rates)),
            TableStatus::New => None,
        })
    }

    pub fn new_tables(&self) -> impl Iterator<Item = &TableKey> {
        self.tables
            .iter()
            .filter(|t| matches!(t.status, TableStatus::New))
            .map(|t| &t.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No usable prior snapshot, rates cannot be computed this run
    CollectingBaseline,
    Report(DeltaReport),
}

pub fn compute(schema: &str, prior: Option<&Snapshot>, current: &Snapshot) -> Outcome {
    let Some(prior) = prior else {
        return Outcome::CollectingBaseline;
    };

    let elapsed = current.captured_at.saturating_sub(prior.captured_at);
    if elapsed <= 0 {
        return Outcome::CollectingBaseline;
    }

    let mut tables = Vec::with_capacity(current.counters.len());
    let mut totals = Rates::default();

    for (key, now) in &current.counters {
        let status = match prior.counters.get(key) {
            Some(before) => {
                let rates = Rates::between(before, now, elapsed);
                totals.accumulate(&rates);
                TableStatus::Tracked { rates }
            }
            None => TableStatus::New,
        };

        tables.push(TableDelta {
            key: key.clone(),
            status,
        });
    }

    Outcome::Report(DeltaReport {
        schema: schema.to_string(),
        elapsed_seconds: elapsed,
        tables,
        totals,
    })
}
