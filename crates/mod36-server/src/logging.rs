//! Structured logging using tracing.

use anyhow::Context;
use tracing::{info, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{LogFormat, ServerConfig};

/// Initialize structured logging. `RUST_LOG` wins over `config.log_level`.
pub fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(build_subscriber(config)?)
        .context("Failed to set global default subscriber")?;

    info!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );

    Ok(())
}

/// Build the subscriber `init_logging` installs, without installing it.
pub fn build_subscriber(config: &ServerConfig) -> anyhow::Result<Box<dyn Subscriber + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format {
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            Box::new(registry.with(json_layer))
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            Box::new(registry.with(fmt_layer))
        }
    };

    Ok(subscriber)
}
