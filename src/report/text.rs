//! Monitoring plugin text output.
//!
//! Formats output as:
//! - line 1: `[STATUS] summary`
//! - then detail lines, a `|`, and space separated `key=value;;;` metrics
//!
//! Zero rates are left out of detail lines but always present in metrics.

use crate::delta::{DeltaReport, Outcome, TableStatus};
use crate::error::ProbeError;
use crate::snapshot::CounterKind;

use super::Status;

pub fn render(status: Status, result: &Result<Outcome, ProbeError>) -> String {
    match result {
        Err(e) => format!("[{}] {e}\n", status.label()),
        Ok(Outcome::CollectingBaseline) => format!("[{}] Collecting data\n", status.label()),
        Ok(Outcome::Report(report)) => render_report(status, report),
    }
}

fn render_report(status: Status, report: &DeltaReport) -> String {
    let mut output = summary_line(status, report);
    output.push('\n');

    let details = detail_lines(report);
    let metrics = metrics(report);

    if !details.is_empty() || !metrics.is_empty() {
        output.push_str(&details.join("\n"));
        if !metrics.is_empty() {
            output.push('|');
            output.push_str(&metrics.join(" "));
        }
        output.push('\n');
    }

    output
}

fn summary_line(status: Status, report: &DeltaReport) -> String {
    let totals: Vec<String> = CounterKind::ALL
        .iter()
        .map(|k| format!("{}: {}", k.plural(), report.totals.get(*k)))
        .collect();

    format!(
        "[{}] {} {} within last {} seconds",
        status.label(),
        report.schema,
        totals.join(", "),
        report.elapsed_seconds
    )
}

fn detail_lines(report: &DeltaReport) -> Vec<String> {
    let mut lines = Vec::new();

    for table in &report.tables {
        let key = &table.key;
        match &table.status {
            TableStatus::Tracked { rates } => {
                let parts: Vec<String> = CounterKind::ALL
                    .iter()
                    .filter(|k| rates.get(**k) != 0)
                    .map(|k| format!("{}: {}", k.verb(), rates.get(*k)))
                    .collect();

                if !parts.is_empty() {
                    lines.push(format!(
                        "\\_ [{}] {key}: {}",
                        Status::Ok.label(),
                        parts.join(", ")
                    ));
                }
            }
            TableStatus::New => {
                lines.push(format!("[{}] {key}: fetching", Status::Unknown.label()));
            }
        }
    }

    lines
}

fn metrics(report: &DeltaReport) -> Vec<String> {
    let mut out = Vec::new();

    for (key, rates) in report.tracked() {
        for kind in CounterKind::ALL {
            out.push(format!("{key}.{}={};;;", kind.as_str(), rates.get(kind)));
        }
    }

    if !out.is_empty() {
        for kind in CounterKind::ALL {
            out.push(format!(
                "{}.__total.{}={};;;",
                report.schema,
                kind.as_str(),
                report.totals.get(kind)
            ));
        }
    }

    out
}
