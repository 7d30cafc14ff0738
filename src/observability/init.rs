//! Tracing subscriber setup.

use super::tracer;
use crate::infrastructure::expand_tilde;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "bookexplorer";

/// Installs the global tracing subscriber.
///
/// Human-readable events go to stderr. When `config.trace_file` is set,
/// finished spans are additionally exported as JSON lines to that file.
///
/// # Level Resolution
///
/// 1. `RUST_LOG`, when set and valid
/// 2. `config.trace_level`
/// 3. `"info"`
///
/// Safe to call more than once; only the first call installs anything. A
/// trace file whose directory cannot be created is skipped.
///
/// # Example
///
/// ```rust
/// use bookexplorer::observability::init_tracing;
/// use bookexplorer::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let otel_layer = config.trace_file.as_deref().and_then(|file| {
        let path = expand_tilde(file);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if std::fs::create_dir_all(parent).is_err() {
                return None;
            }
        }

        let resource = Resource::new(vec![
            opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
            opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = tracer::create_tracer_provider(path, SERVICE_NAME, resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
