pub mod cli;
pub mod config;
pub mod delta;
pub mod error;
pub mod logging;
pub mod platform;
pub mod probe;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod store;
