use std::cell::RefCell;
use std::fs;

use tablestat::config::{Config, FORMAT_VERSION};
use tablestat::delta::{DeltaReport, Outcome, Rates};
use tablestat::error::ProbeError;
use tablestat::probe;
use tablestat::report::{self, Status};
use tablestat::snapshot::{CounterSet, Counters, TableKey};
use tablestat::source::CounterSource;
use tablestat::store::SnapshotStore;
use tempfile::TempDir;

/// Counter source replaying canned answers, one per fetch.
struct ScriptedSource {
    answers: RefCell<Vec<Result<Counters, ProbeError>>>,
}

impl ScriptedSource {
    fn new(answers: Vec<Result<Counters, ProbeError>>) -> Self {
        ScriptedSource {
            answers: RefCell::new(answers.into_iter().rev().collect()),
        }
    }
}

impl CounterSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn fetch(&self, _schema: &str) -> Result<Counters, ProbeError> {
        self.answers
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Err(ProbeError::DataUnavailable("no more answers".into())))
    }
}

fn config(cache: &TempDir) -> Config {
    Config {
        host: "db1.example.com".into(),
        port: 3306,
        username: "monitor".into(),
        password: None,
        schema: "shop".into(),
        invoking_user: "nagios".into(),
        cache_dir: cache.path().to_path_buf(),
        connect_timeout: None,
        max_age: None,
        format_version: FORMAT_VERSION.to_string(),
    }
}

fn store(config: &Config) -> SnapshotStore {
    SnapshotStore::new(config.cache_dir.clone(), config.format_version.clone())
}

fn counters(entries: &[(&str, [u64; 4])]) -> Counters {
    entries
        .iter()
        .map(|(table, [fetch, insert, update, delete])| {
            (
                TableKey::new("shop", table),
                CounterSet {
                    fetch: *fetch,
                    insert: *insert,
                    update: *update,
                    delete: *delete,
                },
            )
        })
        .collect()
}

fn expect_report(result: Result<Outcome, ProbeError>) -> DeltaReport {
    match result {
        Ok(Outcome::Report(report)) => report,
        Ok(Outcome::CollectingBaseline) => panic!("expected a report, got baseline"),
        Err(e) => panic!("expected a report, got error: {e}"),
    }
}

#[test]
fn first_run_collects_baseline_and_writes_snapshot() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![Ok(counters(&[("orders", [100, 0, 0, 0])]))]);

    let result = probe::run(&config, &source, &store, 1_000);

    assert!(matches!(result, Ok(Outcome::CollectingBaseline)));
    let rendered = report::render(&result, false);
    assert_eq!(rendered.status, Status::Unknown);
    assert_eq!(rendered.status.exit_code(), 3);
    assert_eq!(rendered.body, "[UNKNOWN] Collecting data\n");

    let path = store.path_for(&probe::identity_for(&config));
    let written = fs::read_to_string(path).unwrap();
    assert_eq!(written, format!("{FORMAT_VERSION}|1000\nshop.orders:100:0:0:0\n"));
}

#[test]
fn second_run_reports_rates() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![
        Ok(counters(&[("orders", [100, 0, 0, 0])])),
        Ok(counters(&[("orders", [160, 0, 0, 0])])),
    ]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let report = expect_report(probe::run(&config, &source, &store, 1_030));

    assert_eq!(report.elapsed_seconds, 30);
    assert_eq!(report.totals.fetch, 2);

    let rendered = report::render(&Ok(Outcome::Report(report)), false);
    assert_eq!(rendered.status.exit_code(), 0);
    assert!(rendered.body.starts_with(
        "[OK] shop fetches: 2, inserts: 0, updates: 0, deletes: 0 within last 30 seconds\n"
    ));
    assert!(rendered.body.contains("\\_ [OK] shop.orders: fetched: 2|"));
}

#[test]
fn idle_second_run_has_zero_rates_and_metrics() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let same = counters(&[("orders", [100, 5, 5, 5]), ("customers", [7, 7, 7, 7])]);
    let source = ScriptedSource::new(vec![Ok(same.clone()), Ok(same)]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let report = expect_report(probe::run(&config, &source, &store, 1_001));

    assert_eq!(report.totals, Rates::default());
    assert!(report.tracked().all(|(_, rates)| rates.is_idle()));

    let body = report::render(&Ok(Outcome::Report(report)), false).body;
    let second_line = body.lines().nth(1).unwrap();
    assert!(second_line.starts_with('|'));
    assert!(second_line.contains("shop.customers.fetch=0;;;"));
    assert!(second_line.contains("shop.__total.update=0;;;"));
    assert!(!body.contains("\\_"));
}

#[test]
fn counter_reset_reports_negative_rate() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![
        Ok(counters(&[("orders", [0, 500, 0, 0])])),
        Ok(counters(&[("orders", [0, 10, 0, 0])])),
    ]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let report = expect_report(probe::run(&config, &source, &store, 1_010));

    assert_eq!(report.totals.insert, -49);
}

#[test]
fn new_table_is_noticed_and_excluded_from_totals() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![
        Ok(counters(&[("orders", [0, 0, 0, 0])])),
        Ok(counters(&[("orders", [10, 0, 0, 0]), ("refunds", [1000, 1000, 0, 0])])),
    ]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let report = expect_report(probe::run(&config, &source, &store, 1_010));

    assert_eq!(report.totals.fetch, 1);
    assert_eq!(report.new_tables().count(), 1);

    let body = report::render(&Ok(Outcome::Report(report)), false).body;
    assert!(body.contains("[UNKNOWN] shop.refunds: fetching"));
    assert!(!body.contains("shop.refunds.fetch="));
}

#[test]
fn empty_result_is_critical_and_keeps_old_snapshot() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![
        Ok(counters(&[("orders", [1, 2, 3, 4])])),
        Ok(Counters::new()),
    ]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let result = probe::run(&config, &source, &store, 1_010);

    assert!(matches!(result, Err(ProbeError::NoData { .. })));
    let rendered = report::render(&result, false);
    assert_eq!(rendered.status.exit_code(), 2);
    assert_eq!(rendered.body, "[CRITICAL] No data received for schema 'shop'\n");

    let kept = store.load(&probe::identity_for(&config), 2_000).unwrap().unwrap();
    assert_eq!(kept.captured_at, 1_000);
}

#[test]
fn source_failure_writes_nothing() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![Err(ProbeError::DataUnavailable(
        "Access denied for user 'monitor'".into(),
    ))]);

    let result = probe::run(&config, &source, &store, 1_000);

    assert_eq!(
        report::render(&result, false).body,
        "[CRITICAL] Access denied for user 'monitor'\n"
    );
    assert!(!store.path_for(&probe::identity_for(&config)).exists());
}

#[test]
fn corrupt_cache_is_critical_before_fetch() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    fs::write(
        store.path_for(&probe::identity_for(&config)),
        format!("{FORMAT_VERSION}|500\nshop.orders:not-a-number:0:0:0\n"),
    )
    .unwrap();
    let source = ScriptedSource::new(vec![Ok(counters(&[("orders", [1, 0, 0, 0])]))]);

    let result = probe::run(&config, &source, &store, 1_000);

    assert!(matches!(result, Err(ProbeError::CacheMalformed { line: 2, .. })));
    assert_eq!(report::render(&result, false).status, Status::Critical);
}

#[test]
fn stale_version_restarts_baseline() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    fs::write(
        store.path_for(&probe::identity_for(&config)),
        "0.0.1|500\nshop.orders:1:0:0:0\n",
    )
    .unwrap();
    let source = ScriptedSource::new(vec![Ok(counters(&[("orders", [1, 0, 0, 0])]))]);

    let result = probe::run(&config, &source, &store, 1_000);
    assert!(matches!(result, Ok(Outcome::CollectingBaseline)));
}

#[test]
fn json_output_carries_report() {
    let cache = TempDir::new().unwrap();
    let config = config(&cache);
    let store = store(&config);
    let source = ScriptedSource::new(vec![
        Ok(counters(&[("orders", [0, 0, 0, 0])])),
        Ok(counters(&[("orders", [0, 0, 20, 0])])),
    ]);

    probe::run(&config, &source, &store, 1_000).unwrap();
    let result = probe::run(&config, &source, &store, 1_010);
    let rendered = report::render(&result, true);

    let value: serde_json::Value = serde_json::from_str(&rendered.body).unwrap();
    assert_eq!(value["status"], "OK");
    assert_eq!(value["report"]["totals"]["update"], 2);
    assert_eq!(rendered.status.exit_code(), 0);
}

/// Counter source that turns the cache directory into a regular file while
/// fetching, so the following save cannot succeed.
struct CacheClobberingSource {
    cache_dir: std::path::PathBuf,
    counters: Counters,
}

impl CounterSource for CacheClobberingSource {
    fn name(&self) -> &'static str {
        "cache-clobbering"
    }

    fn fetch(&self, _schema: &str) -> Result<Counters, ProbeError> {
        fs::remove_dir_all(&self.cache_dir).unwrap();
        fs::write(&self.cache_dir, "not a directory").unwrap();
        Ok(self.counters.clone())
    }
}

#[test]
fn unwritable_cache_is_critical() {
    let cache = TempDir::new().unwrap();
    let mut config = config(&cache);
    config.cache_dir = cache.path().join("cache");
    fs::create_dir(&config.cache_dir).unwrap();
    let store = store(&config);
    let source = CacheClobberingSource {
        cache_dir: config.cache_dir.clone(),
        counters: counters(&[("orders", [1, 0, 0, 0])]),
    };

    let result = probe::run(&config, &source, &store, 1_000);

    assert!(matches!(result, Err(ProbeError::CacheWrite { .. })));
    let rendered = report::render(&result, false);
    assert_eq!(rendered.status, Status::Critical);
    assert_eq!(rendered.status.exit_code(), 2);
    assert!(rendered.body.starts_with("[CRITICAL] "));
}
