//! Tracing subscriber setup for the `ofauth` binary.

use crate::config::LogFormat;
use crate::error::ClientError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "ofauth_core=info,ofauth_client=info,warn";

/// Install a stderr subscriber; stdout stays reserved for output records.
pub fn init_tracing(format: LogFormat) -> Result<(), ClientError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| ClientError::Telemetry(format!("Failed to init subscriber: {}", e)))
}
