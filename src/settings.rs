use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Year given to delivery dates that omit it, unless `reference_year` is set.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2026;
pub const DEFAULT_LIVE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/{base}";
pub const DEFAULT_HISTORICAL_RATE_URL: &str =
    "https://api.frankfurter.app/{from}..{to}?from={base}&to={quote}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_dir_string")]
    pub base_dir: String,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    #[serde(default = "default_rate")]
    pub default_rate: f64,
    /// Year assumed for delivery dates written without one. Unset means the current year.
    #[serde(default)]
    pub reference_year: Option<i32>,
    #[serde(default = "default_live_rate_url")]
    pub live_rate_url: String,
    #[serde(default = "default_historical_rate_url")]
    pub historical_rate_url: String,
}

fn default_base_dir_string() -> String {
    default_base_dir().to_string_lossy().to_string()
}

fn default_output_filename() -> String {
    "AliExpress_Orders.html".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_quote_currency() -> String {
    "EUR".to_string()
}

fn default_rate() -> f64 {
    0.92
}

fn default_live_rate_url() -> String {
    DEFAULT_LIVE_RATE_URL.to_string()
}

fn default_historical_rate_url() -> String {
    DEFAULT_HISTORICAL_RATE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir_string(),
            output_filename: default_output_filename(),
            base_currency: default_base_currency(),
            quote_currency: default_quote_currency(),
            default_rate: default_rate(),
            reference_year: None,
            live_rate_url: default_live_rate_url(),
            historical_rate_url: default_historical_rate_url(),
        }
    }
}

impl Settings {
    /// Reject settings the rate pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.default_rate.is_finite() && self.default_rate > 0.0) {
            return Err(TrackerError::Settings(format!(
                "default_rate must be a positive number, got {}",
                self.default_rate
            )));
        }
        if self.base_currency.trim().is_empty() || self.quote_currency.trim().is_empty() {
            return Err(TrackerError::Settings(
                "base_currency and quote_currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or(DEFAULT_REFERENCE_YEAR)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ordertrack")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("ordertrack")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

/// Expand a leading `~` so paths typed on the command line behave like shell paths.
pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
