pub mod checker;
pub mod config;
pub mod models;
pub mod notifiers;
pub mod scheduler;
pub mod scraper;
pub mod utils;
pub mod watchlist;

// Re-export commonly used types
pub use checker::{CheckerOptions, PriceChecker};
pub use config::{EmailConfig, RunConfig};
pub use scheduler::CheckScheduler;
pub use utils::error::AppError;
pub use watchlist::Watchlist;

pub type Result<T> = std::result::Result<T, AppError>;
