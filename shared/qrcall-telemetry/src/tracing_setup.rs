//! Tracing Setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the env filter, falling back to the configured level when `RUST_LOG`
/// is unset or unparsable.
pub(crate) fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Initialize the global tracing subscriber.
///
/// Exactly one of the JSON or plain fmt layers is active. Fails if a global
/// subscriber was already installed.
pub fn init_tracing(service_name: &str, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let json_layer = config.json_logs.then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
    });
    let plain_layer = (!config.json_logs).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(json_layer)
        .with(plain_layer)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    tracing::info!(
        service = service_name,
        configured_name = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        let config = TelemetryConfig {
            json_logs: false,
            ..TelemetryConfig::default()
        };
        // The first call may race with other tests; the second must fail either way
        let _ = init_tracing("test", &config);
        let second = init_tracing("test", &config);
        assert!(matches!(second, Err(TelemetryError::TracingInit(_))));
    }
}
