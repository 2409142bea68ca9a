//! Tracing subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::config::observability::{LogFormat, LoggingConfig};

use super::ObservabilityError;

/// Crates whose chatter is capped at `warn` unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: &[&str] = &[
    "h2",
    "hyper",
    "tower",
    "tonic",
    "opentelemetry",
    "reqwest",
    "sqlx::query",
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub(super) fn init_subscriber(
    logging: &LoggingConfig,
    service_name: &str,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let otel_layer = tracer_provider.map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_owned()))
    });

    tracing_subscriber::registry()
        .with(fmt_layer(logging.log_format))
        .with(otel_layer)
        .with(env_filter(&logging.log_level))
        .try_init()?;

    Ok(())
}

fn fmt_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
    }
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)))
}

fn default_directives(log_level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(log_level.to_owned(), |directives, target| {
            format!("{directives},{target}=warn")
        })
}

#[cfg(test)]
mod tests {
    use super::default_directives;

    #[test]
    fn default_directives_start_with_the_configured_level() {
        let directives = default_directives("debug");

        assert!(directives.starts_with("debug,"), "got {directives}");
    }

    #[test]
    fn noisy_crates_are_capped_at_warn() {
        let directives = default_directives("info");

        assert!(directives.contains("sqlx::query=warn"));
        assert!(directives.contains("reqwest=warn"));
        assert!(directives.contains("hyper=warn"));
    }
}
