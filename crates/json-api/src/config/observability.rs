//! Logging, tracing and request-latency settings.

use std::time::Duration;

use clap::Args;

/// Log line format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event, with file and line.
    Compact,

    /// One JSON object per event, with the current span and its parents.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default level or `EnvFilter` directives; `RUST_LOG` overrides quiet-crate caps too
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Trace export and request tracing settings.
///
/// Environment names follow the OpenTelemetry SDK conventions, so the usual collector
/// deployment manifests work unchanged.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export spans to an OTLP collector
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// Continue traces from incoming `traceparent` headers; ignored unless export is enabled
    #[arg(long, env = "OTEL_PARENT_PROPAGATION_ENABLED", default_value_t = false)]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC collector endpoint
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    /// OTLP export timeout in milliseconds
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT", default_value_t = 3_000_u64)]
    pub otel_exporter_otlp_timeout_ms: u64,

    /// `service.name` resource attribute
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "trolley-json")]
    pub otel_service_name: String,

    /// `service.version` resource attribute
    #[arg(long, env = "OTEL_SERVICE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub otel_service_version: String,

    /// `deployment.environment.name` resource attribute
    #[arg(long, env = "OTEL_DEPLOYMENT_ENVIRONMENT", default_value = "development")]
    pub otel_deployment_environment: String,

    /// Share of root traces to sample; values outside [0.0, 1.0] are clamped
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0_f64)]
    pub otel_trace_sample_ratio: f64,

    /// Requests slower than this many milliseconds are logged at `warn`
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    /// Whether request spans adopt a remote parent. Parents only matter when spans leave the
    /// process.
    #[must_use]
    pub fn propagates_parent_context(&self) -> bool {
        self.otel_enabled && self.otel_parent_propagation_enabled
    }

    /// Upper bound on a single OTLP export.
    #[must_use]
    pub fn otlp_timeout(&self) -> Duration {
        Duration::from_millis(self.otel_exporter_otlp_timeout_ms)
    }

    /// Sampling ratio clamped to the unit interval.
    #[must_use]
    pub fn trace_sample_ratio(&self) -> f64 {
        self.otel_trace_sample_ratio.clamp(0.0, 1.0)
    }
}
