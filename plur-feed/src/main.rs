//! plur-feed - Read your X and Instagram timelines as one feed

use clap::Parser;
use libplurfeed::logging::{LogFormat, LoggingConfig};
use libplurfeed::presenter::write_feed;
use libplurfeed::{Config, FeedService, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "plur-feed")]
#[command(version, about = "Print your X and Instagram posts as one feed, newest first")]
#[command(long_about = r#"Fetch the most recent posts from your X home timeline and your Instagram
media, merge them, and print them newest first.

CREDENTIALS:
    Read from the environment (a .env file in the current directory is
    loaded first) or from the config file:
        TWITTER_CONSUMER_KEY
        TWITTER_CONSUMER_SECRET
        TWITTER_ACCESS_TOKEN
        TWITTER_ACCESS_TOKEN_SECRET
        INSTAGRAM_ACCESS_TOKEN

EXIT CODES:
    0 - Success (including an empty feed)
    1 - Network, response, parse or configuration error
    2 - Authentication error
    3 - Invalid input
"#)]
struct Cli {
    /// Posts to request from each platform
    #[arg(short, long, value_name = "N")]
    #[arg(value_parser = clap::value_parser!(u16).range(1..=200))]
    limit: Option<u16>,

    /// Config file (default: $PLURFEED_CONFIG or ~/.config/plurfeed/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log output format: text, json or pretty
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env(cli.verbose);
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    logging.init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(limit) = cli.limit {
        config.feed.limit = usize::from(limit);
    }

    let service = FeedService::from_config(config)?;
    let feed = service.collect().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_feed(&mut out, &feed)?;

    Ok(())
}
