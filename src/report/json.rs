//! JSON output for probe results.
//!
//! Serializes the outcome to a single JSON object for scripting and piping.

use serde::Serialize;

use crate::delta::{DeltaReport, Outcome};
use crate::error::ProbeError;

use super::Status;

#[derive(Serialize)]
struct JsonOutput<'a> {
    status: &'static str,
    message: String,
    report: Option<&'a DeltaReport>,
}

pub fn render(status: Status, result: &Result<Outcome, ProbeError>) -> String {
    let output = match result {
        Err(e) => JsonOutput {
            status: status.label(),
            message: e.to_string(),
            report: None,
        },
        Ok(Outcome::CollectingBaseline) => JsonOutput {
            status: status.label(),
            message: "Collecting data".to_string(),
            report: None,
        },
        Ok(Outcome::Report(report)) => JsonOutput {
            status: status.label(),
            message: format!(
                "{} tables within last {} seconds",
                report.tables.len(),
                report.elapsed_seconds
            ),
            report: Some(report),
        },
    };

    serde_json::to_string_pretty(&output)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .unwrap_or_else(|e| format!("{{\"status\":\"CRITICAL\",\"message\":\"{e}\"}}\n"))
}
