//! Logging configuration and initialization.
//!
//! Diagnostics go to stderr through tracing. Stdout carries only the plugin
//! output, so monitoring front ends never see log lines.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Errors only
    Quiet,
    /// Warnings and errors
    #[default]
    Production,
    /// Operational detail (-v)
    Verbose,
    /// Cache and query decisions (-vv)
    Debug,
    /// Everything, including dependency internals (-vvv)
    Trace,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
}

impl LogConfig {
    /// Quiet wins over any verbosity.
    pub fn from_cli(verbose: u8, quiet: bool) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else {
            match verbose {
                0 => LogPreset::Production,
                1 => LogPreset::Verbose,
                2 => LogPreset::Debug,
                _ => LogPreset::Trace,
            }
        };

        Self { preset }
    }

    /// Build an EnvFilter from this configuration. RUST_LOG takes precedence.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        EnvFilter::new(self.directives())
    }

    fn directives(&self) -> &'static str {
        match self.preset {
            LogPreset::Quiet => "error",
            LogPreset::Production => "warn",
            LogPreset::Verbose => "warn,tablestat=info",
            LogPreset::Debug => "warn,tablestat=debug",
            LogPreset::Trace => "trace",
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(config.build_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}
