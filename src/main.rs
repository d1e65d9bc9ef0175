use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use book_price_watcher::notifiers::{ConsoleNotifier, EmailNotifier, Notifier};
use book_price_watcher::scraper::HttpPageFetcher;
use book_price_watcher::utils::logging;
use book_price_watcher::{CheckScheduler, CheckerOptions, EmailConfig, PriceChecker, RunConfig, Watchlist};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Watchlist file; repeat to merge several, in order
    #[arg(long = "watchlist", default_values = ["books.json"])]
    watchlists: Vec<PathBuf>,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,

    /// Log the alert instead of emailing it; no mail credentials needed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter(logging::env_filter()).init();

    let cli = Cli::parse();

    let config = RunConfig::load(&cli.config)?;
    let watchlist = Watchlist::from_sources(cli.watchlists.as_slice())?;
    watchlist.validate()?;

    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(ConsoleNotifier::new(&config.email_subject, &config.currency_symbol))
    } else {
        Box::new(EmailNotifier::new(
            EmailConfig::from_env()?,
            &config.email_subject,
            &config.currency_symbol,
            config.notifications.send_timeout(),
        ))
    };

    let options = CheckerOptions {
        base_url: config.base_url.clone(),
        fetch_timeout: config.scraper.request_timeout(),
        send_timeout: config.notifications.send_timeout(),
        on_fetch_error: config.scraper.on_fetch_error,
    };
    let checker = PriceChecker::new(
        watchlist,
        Box::new(HttpPageFetcher::new(&config.scraper)?),
        notifier,
        options,
    );

    if cli.once {
        let report = checker.check().await?;
        info!("Single check finished: {} matches", report.matches_found);
        return Ok(());
    }

    let scheduler = CheckScheduler::new(checker, config.check_interval(), config.scheduler.on_cycle_error);

    tokio::select! {
        result = scheduler.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down..."),
    }

    Ok(())
}
