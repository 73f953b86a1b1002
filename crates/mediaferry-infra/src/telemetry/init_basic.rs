use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "mediaferry_core=debug,mediaferry_storage=debug,\
mediaferry_processing=debug,mediaferry_ingest=debug,mediaferry_infra=debug";

pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter() -> &'static str {
    DEFAULT_FILTER
}

/// Initialize tracing with an `EnvFilter` and a `fmt` layer.
///
/// Logs are JSON when `environment` is `production`. Returns an error if a
/// global subscriber is already installed (the host may own logging).
pub fn init_telemetry(environment: &str) -> Result<(), TelemetryError> {
    let json = environment.eq_ignore_ascii_case("production");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .try_init()?;

    tracing::info!(environment = environment, json = json, "Tracing initialized");
    Ok(())
}
