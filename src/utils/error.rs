use rust_decimal::Decimal;
use thiserror::Error;

/// Problems with watchlist data, detected before a cycle fetches anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No books have been loaded")]
    Empty,

    #[error("Book {index} missing required field: {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Book {index} has a non-positive asking price: {price}")]
    NonPositivePrice { index: usize, price: Decimal },
}

impl ValidationError {
    /// Zero-based position of the offending item, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::Empty => None,
            ValidationError::MissingField { index, .. }
            | ValidationError::NonPositivePrice { index, .. } => Some(*index),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Fetching {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Transport(String),

    #[error("Sending mail timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl From<lettre::address::AddressError> for DeliveryError {
    fn from(err: lettre::address::AddressError) -> Self {
        DeliveryError::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for DeliveryError {
    fn from(err: lettre::error::Error) -> Self {
        DeliveryError::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidConfig(format!("{}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
