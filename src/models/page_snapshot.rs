use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point-in-time read of a product page. Never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSnapshot {
    pub title: String,
    pub price: Decimal,
    pub in_stock: bool,
}

impl PageSnapshot {
    pub fn new(title: impl Into<String>, price: Decimal, in_stock: bool) -> Self {
        Self {
            title: title.into(),
            price,
            in_stock,
        }
    }
}
