//! Tracing setup shared by the binaries

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Filter used when neither `RUST_LOG` nor the config level parse
const FALLBACK_FILTER: &str = "holdings=info,tower_http=info";

/// Build the env filter: `RUST_LOG` wins over the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "holdings={level},tower_http={level}",
                level = config.level
            ))
        })
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber writing to stdout
pub fn init_tracing(config: &LoggingConfig) {
    install(config, std::io::stdout);
}

/// Install the global subscriber writing to stderr, keeping stdout for output
pub fn init_cli_tracing(config: &LoggingConfig) {
    install(config, std::io::stderr);
}

fn install<W>(config: &LoggingConfig, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(env_filter(config));

    // `format = "json"` selects JSON lines, anything else the default text
    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
}
