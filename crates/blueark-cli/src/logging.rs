//! Structured logging setup.

use std::env;
use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log format selected by `BLUEARK_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("pretty") {
            Some(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Some(LogFormat::Json)
        } else {
            None
        }
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, String> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| format!("Invalid log filter: {err}"))
    }
}

/// Install a stderr subscriber.
///
/// `level` falls back to `BLUEARK_TRACE`, then `off`. Returns false when a
/// subscriber is already configured.
pub fn init(level: Option<String>) -> Result<bool, String> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .or_else(|| env::var("BLUEARK_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;

    let format_value = env::var("BLUEARK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let format = LogFormat::parse(&format_value)
        .ok_or("Invalid BLUEARK_LOG_FORMAT (expected 'json' or 'pretty')")?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .json(),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .pretty(),
            )
            .try_init(),
    };
    result.map_err(|err| format!("Failed to initialize logging: {err}"))?;

    Ok(true)
}
