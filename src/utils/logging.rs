use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "book_price_watcher=info";

/// Filter for the fmt subscriber. `RUST_LOG` wins when set and parseable,
/// otherwise only this crate logs, at info.
pub fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
