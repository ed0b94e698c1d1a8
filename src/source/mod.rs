pub mod mysql;

use crate::error::ProbeError;
use crate::snapshot::Counters;

/// Producer of current cumulative row counters for a schema.
pub trait CounterSource {
    fn name(&self) -> &'static str;

    /// Current counters for every table in `schema`. An empty map is a valid
    /// answer here; the caller decides what no data means.
    fn fetch(&self, schema: &str) -> Result<Counters, ProbeError>;
}
