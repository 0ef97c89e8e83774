//! Tracing subscriber initialization with configurable output formats.

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig, ObservabilityConfig};

/// Install the global subscriber: an `EnvFilter` plus one console layer in the
/// configured format.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), TracingError> {
    let logging = &config.logging;

    tracing_subscriber::registry()
        .with(build_env_filter(logging))
        .with(console_layer(logging))
        .try_init()
        .map_err(|e| TracingError::Init(e.to_string()))?;

    tracing::debug!(format = ?logging.format, level = ?logging.level, "Tracing initialized");
    Ok(())
}

fn console_layer<S>(logging: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match (logging.format, logging.timestamps) {
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        (LogFormat::Json, true) => base
            .json()
            .with_current_span(logging.span_context)
            .boxed(),
        (LogFormat::Json, false) => base
            .json()
            .with_current_span(logging.span_context)
            .without_time()
            .boxed(),
    }
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    let base_level = config.level.as_directive();

    if let Ok(from_env) = std::env::var("RUST_LOG") {
        return EnvFilter::try_new(from_env).unwrap_or_else(|_| EnvFilter::new(base_level));
    }

    match &config.directives {
        Some(directives) => EnvFilter::try_new(format!("{base_level},{directives}"))
            .unwrap_or_else(|_| EnvFilter::new(base_level)),
        None => EnvFilter::new(format!(
            "{base_level},hyper=warn,h2=warn,tower=info,sqlx=warn"
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_filter_uses_config_directives() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                level: LogLevel::Warn,
                directives: Some("labelhub=debug".into()),
                ..Default::default()
            };
            let filter = build_env_filter(&config).to_string();
            assert!(filter.contains("labelhub=debug"), "{filter}");
            assert!(filter.contains("warn"), "{filter}");
        });
    }

    #[test]
    fn test_filter_default_quiets_dependencies() {
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = build_env_filter(&LoggingConfig::default()).to_string();
            assert!(filter.contains("sqlx=warn"), "{filter}");
            assert!(filter.contains("hyper=warn"), "{filter}");
        });
    }

    #[test]
    fn test_rust_log_overrides_config() {
        temp_env::with_var("RUST_LOG", Some("tower_http=trace"), || {
            let config = LoggingConfig {
                directives: Some("labelhub=debug".into()),
                ..Default::default()
            };
            let filter = build_env_filter(&config).to_string();
            assert!(filter.contains("tower_http=trace"), "{filter}");
            assert!(!filter.contains("labelhub=debug"), "{filter}");
        });
    }
}
