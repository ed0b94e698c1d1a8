//! MySQL counter source.
//!
//! Reads cumulative row counters from the `sys` schema view
//! `schema_table_statistics`, one row per table of the requested schema.

use std::time::Duration;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};
use tracing::{debug, info};

use super::CounterSource;
use crate::config::Config;
use crate::error::ProbeError;
use crate::snapshot::{CounterSet, Counters, TableKey};

const STATS_QUERY: &str = "SELECT table_schema, table_name, rows_fetched, rows_inserted, rows_updated, rows_deleted \
     FROM sys.schema_table_statistics \
     WHERE table_schema = ?";

type StatsRow = (String, String, u64, u64, u64, u64);

pub struct MysqlSource {
    host: String,
    port: u16,
    username: String,
    password: Option<String>,
    connect_timeout: Option<Duration>,
}

impl MysqlSource {
    pub fn from_config(config: &Config) -> Self {
        MysqlSource {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            connect_timeout: config.connect_timeout,
        }
    }

    fn connect(&self) -> Result<Conn, ProbeError> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(self.host.as_str()))
            .tcp_port(self.port)
            .user(Some(self.username.as_str()))
            .pass(self.password.as_deref())
            .db_name(Some("sys"))
            .tcp_connect_timeout(self.connect_timeout);

        Conn::new(opts).map_err(|e| ProbeError::DataUnavailable(e.to_string()))
    }
}

impl CounterSource for MysqlSource {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn fetch(&self, schema: &str) -> Result<Counters, ProbeError> {
        debug!(target: "tablestat::source", host = %self.host, port = self.port, "connecting");
        let mut conn = self.connect()?;

        let rows: Vec<StatsRow> = conn
            .exec(STATS_QUERY, (schema,))
            .map_err(|e| ProbeError::DataUnavailable(e.to_string()))?;

        info!(target: "tablestat::source", schema, tables = rows.len(), "fetched table statistics");

        Ok(rows_to_counters(rows))
    }
}

fn rows_to_counters(rows: Vec<StatsRow>) -> Counters {
    rows.into_iter()
        .map(|(schema, table, fetch, insert, update, delete)| {
            (
                TableKey::new(&schema, &table),
                CounterSet {
                    fetch,
                    insert,
                    update,
                    delete,
                },
            )
        })
        .collect()
}
