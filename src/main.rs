mod cli;

use clap::Parser;
use hotelfinder::HotelFinderConfig;
use hotelfinder::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hotelfinder=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "hotelfinder={0},tower_http={0}",
                logging.level
            ))
        })
    };

    let fmt_layer = match logging.format.as_str() {
        "pretty" => fmt::layer().pretty().boxed(),
        "compact" => fmt::layer().compact().boxed(),
        _ => fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = HotelFinderConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose);

    cli.run(config).await
}
