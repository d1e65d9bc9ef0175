use config::{Config, ConfigError, Environment, File};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::models::{CycleFailurePolicy, FetchFailurePolicy};
use crate::Result;

const SECS_PER_HOUR: u64 = 60 * 60;

/// Run settings, read once at startup. Top-level keys match the plain
/// `config.json` layout (`base_url`, `check_interval`, `email_subject`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    #[validate(length(min = 1))]
    pub base_url: String,
    #[serde(rename = "check_interval")]
    #[validate(range(min = 1))]
    pub check_interval_hours: u64,
    #[validate(length(min = 1))]
    pub email_subject: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub title_selector: String,
    pub price_selector: String,
    pub availability_selector: String,
    pub on_fetch_error: FetchFailurePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub on_cycle_error: CycleFailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub send_timeout_secs: u64,
}

fn default_currency_symbol() -> String {
    "£".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            title_selector: ".product_main h1".to_string(),
            price_selector: "p.price_color".to_string(),
            availability_selector: "p.availability".to_string(),
            on_fetch_error: FetchFailurePolicy::default(),
        }
    }
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { send_timeout_secs: 60 }
    }
}

impl NotificationsConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

impl RunConfig {
    /// Reads `path` (format picked from its extension), then applies
    /// `WATCHER__*` environment overrides, e.g. `WATCHER__CHECK_INTERVAL=6`.
    pub fn load(path: &Path) -> Result<Self> {
        let s = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("WATCHER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: RunConfig = s.try_deserialize()?;
        config.validate_all()?;
        Ok(config)
    }

    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;
        self.check_consistency()?;
        Ok(())
    }

    fn check_consistency(&self) -> std::result::Result<(), ConfigError> {
        if self.check_interval_hours.checked_mul(SECS_PER_HOUR).is_none() {
            return Err(ConfigError::Message("check_interval is too large".into()));
        }

        if Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::Message("Invalid base URL format".into()));
        }

        if self.currency_symbol.chars().count() != 1 {
            return Err(ConfigError::Message("currency_symbol must be a single character".into()));
        }

        if self.scraper.request_timeout_secs == 0 {
            return Err(ConfigError::Message("Scraper request_timeout_secs must be greater than 0".into()));
        }

        if self.notifications.send_timeout_secs == 0 {
            return Err(ConfigError::Message("Notifications send_timeout_secs must be greater than 0".into()));
        }

        for (name, selector) in [
            ("title_selector", &self.scraper.title_selector),
            ("price_selector", &self.scraper.price_selector),
            ("availability_selector", &self.scraper.availability_selector),
        ] {
            if Selector::parse(selector).is_err() {
                return Err(ConfigError::Message(format!("Invalid CSS selector in scraper.{}", name)));
            }
        }

        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_hours.saturating_mul(SECS_PER_HOUR))
    }
}

/// SMTP credentials. Built from the process environment and never logged.
#[derive(Clone, Validate)]
pub struct EmailConfig {
    #[validate(length(min = 1))]
    pub server: String,
    pub port: u16,
    #[validate(email)]
    pub sender: String,
    #[validate(email)]
    pub recipient: String,
    pub password: String,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl EmailConfig {
    pub const SERVER_VAR: &'static str = "EMAIL_SERVER";
    pub const PORT_VAR: &'static str = "EMAIL_PORT";
    pub const SENDER_VAR: &'static str = "SENDER_EMAIL";
    pub const RECIPIENT_VAR: &'static str = "RECIPIENT_EMAIL";
    pub const PASSWORD_VAR: &'static str = "EMAIL_PASSWORD";

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| ConfigError::Message(format!("Missing environment variable {}", key)))
        };

        let port = require(Self::PORT_VAR)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Message(format!("{} must be a port number", Self::PORT_VAR)))?;

        let config = EmailConfig {
            server: require(Self::SERVER_VAR)?,
            port,
            sender: require(Self::SENDER_VAR)?,
            recipient: require(Self::RECIPIENT_VAR)?,
            password: require(Self::PASSWORD_VAR)?,
        };

        config.validate()?;
        Ok(config)
    }
}
