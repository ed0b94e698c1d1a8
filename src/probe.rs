use tracing::{info, warn};

use crate::config::Config;
use crate::delta::{self, Outcome};
use crate::error::ProbeError;
use crate::snapshot::Snapshot;
use crate::source::CounterSource;
use crate::store::{CacheIdentity, SnapshotStore};

pub fn identity_for(config: &Config) -> CacheIdentity {
    CacheIdentity::derive(
        &config.invoking_user,
        &config.host,
        &config.username,
        &config.schema,
    )
}

/// One probe cycle: load the prior snapshot, fetch current counters, persist
/// them as the new baseline and compute rates against the prior one.
///
/// `now` is the capture time in unix seconds, used both for the staleness
/// check and as the new snapshot's timestamp.
pub fn run(
    config: &Config,
    source: &dyn CounterSource,
    store: &SnapshotStore,
    now: i64,
) -> Result<Outcome, ProbeError> {
    let identity = identity_for(config);

    let prior = store.load(&identity, now)?;

    let counters = source.fetch(&config.schema)?;
    if counters.is_empty() {
        warn!(
            target: "tablestat::probe",
            source = source.name(),
            schema = %config.schema,
            "no tables returned"
        );
        return Err(ProbeError::NoData {
            schema: config.schema.clone(),
        });
    }

    let current = Snapshot::new(store.format_version(), now, counters);
    store.save(&identity, &current)?;

    let outcome = delta::compute(&config.schema, prior.as_ref(), &current);

    match &outcome {
        Outcome::CollectingBaseline => {
            info!(
                target: "tablestat::probe",
                cache_dir = %store.dir().display(),
                tables = current.counters.len(),
                "no usable prior snapshot, baseline stored"
            );
        }
        Outcome::Report(report) => {
            info!(
                target: "tablestat::probe",
                elapsed = report.elapsed_seconds,
                tracked = report.tracked().count(),
                new = report.new_tables().count(),
                "computed rates"
            );
        }
    }

    Ok(outcome)
}
