use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{total_savings, PriceMatch};
use crate::utils::error::DeliveryError;

pub mod console;
pub mod email;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;

pub const DIVIDER: &str = "-------------------";

/// Delivers one message per cycle describing every match found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// `matches` is never empty when called by the checker.
    async fn send(&self, matches: &[PriceMatch]) -> Result<(), DeliveryError>;
}

/// Two decimal places with a literal symbol prefix, e.g. `£7.50`.
pub fn format_amount(currency_symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency_symbol, rounded)
}

fn format_match(currency_symbol: &str, found: &PriceMatch) -> String {
    format!(
        "Title: {}\nCurrent Price: {}\nTarget Price: {}\nPrice Difference: {} below target\nURL: {}\n",
        found.title,
        format_amount(currency_symbol, found.price),
        format_amount(currency_symbol, found.asking_price),
        format_amount(currency_symbol, found.difference()),
        found.url,
    )
}

/// Plain-text body: a summary block, then one block per match separated by
/// dividers.
pub fn compose_body(matches: &[PriceMatch], currency_symbol: &str) -> String {
    let summary = format!(
        "Books Found: {}\nPotential Savings: {}\n\n{}\n",
        matches.len(),
        format_amount(currency_symbol, total_savings(matches)),
        DIVIDER,
    );

    let blocks: Vec<String> = matches
        .iter()
        .map(|found| format_match(currency_symbol, found))
        .collect();

    let separator = format!("\n{}\n\n", DIVIDER);
    format!("{}\n{}", summary, blocks.join(separator.as_str()))
}
