use storefront::config::{self, Config, LogFormat};
use storefront::server;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config)?;
    config.print_summary();

    server::run(config).await
}

/// Text or JSON output per `LOG_FORMAT`, filtered by `RUST_LOG`.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == LogFormat::Json {
        builder
            .json()
            .with_current_span(false)
            .with_target(true)
            .init();
    } else {
        builder.init();
    }

    Ok(())
}
