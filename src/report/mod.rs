pub mod json;
pub mod text;

use crate::delta::Outcome;
use crate::error::ProbeError;

/// Plugin status, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Critical,
    Unknown,
}

impl Status {
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

pub fn status_of(result: &Result<Outcome, ProbeError>) -> Status {
    match result {
        Ok(Outcome::Report(_)) => Status::Ok,
        Ok(Outcome::CollectingBaseline) => Status::Unknown,
        Err(_) => Status::Critical,
    }
}

pub struct Rendered {
    pub status: Status,
    pub body: String,
}

pub fn render(result: &Result<Outcome, ProbeError>, json_output: bool) -> Rendered {
    let status = status_of(result);
    let body = if json_output {
        json::render(status, result)
    } else {
        text::render(status, result)
    };

    Rendered { status, body }
}
