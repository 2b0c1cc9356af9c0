// ABOUTME: Tracing subscriber setup for the leadflow binary
// ABOUTME: RUST_LOG wins when set, otherwise the configured LEADFLOW_LOG filter applies

use leadflow_config::Config;
use tracing_subscriber::EnvFilter;

pub fn init_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
