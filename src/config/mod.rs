#[cfg(test)]
mod tests;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Configuration is invalid: {0}")]
    Invalid(String)
}

/// Digit grouping used when rendering money for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 1,234,567.00
    Thousands,
    /// 12,34,567.00
    Lakh
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: Grouping
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            grouping: Grouping::Thousands
        }
    }
}

/// Tunables for a transfer workflow instance.
///
/// Every field has a default so a partial JSON document is enough to
/// override a single value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Upper bound accepted by the amount validator.
    pub max_amount: Decimal,
    /// Maximum length, in characters, of the effective purpose.
    pub max_purpose_length: usize,
    /// How many distinct recent recipients are offered for quick reuse.
    pub recent_recipient_limit: usize,
    pub lookup_debounce_ms: u64,
    pub lookup_cache_capacity: u64,
    pub lookup_cache_ttl_ms: u64,
    /// A submission that has not answered within this window counts as failed.
    pub submit_timeout_ms: u64,
    pub currency: CurrencyFormat,
    /// Offset applied to server timestamps on receipts.
    pub utc_offset_minutes: i32,
    /// Shown when a submission fails without a structured server message.
    pub generic_failure_message: String
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_amount: Decimal::new(1_000_000_00, 2),
            max_purpose_length: 240,
            recent_recipient_limit: 5,
            lookup_debounce_ms: 400,
            lookup_cache_capacity: 256,
            lookup_cache_ttl_ms: 60_000,
            submit_timeout_ms: 30_000,
            currency: CurrencyFormat::default(),
            utc_offset_minutes: 0,
            generic_failure_message: "Transfer could not be completed. Please try again.".to_string()
        }
    }
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document, filling anything absent with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_amount <= Decimal::ZERO {
            return Err(ConfigError::Invalid("max_amount must be greater than zero".to_string()));
        }

        if self.max_purpose_length == 0 {
            return Err(ConfigError::Invalid("max_purpose_length must be greater than zero".to_string()));
        }

        if self.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(ConfigError::Invalid("utc_offset_minutes must be within one day".to_string()));
        }

        if self.submit_timeout_ms == 0 {
            return Err(ConfigError::Invalid("submit_timeout_ms must be greater than zero".to_string()));
        }

        Ok(())
    }

    pub fn with_max_amount(mut self, max_amount: Decimal) -> Self {
        self.max_amount = max_amount;
        self
    }

    pub fn with_max_purpose_length(mut self, length: usize) -> Self {
        self.max_purpose_length = length;
        self
    }

    pub fn with_recent_recipient_limit(mut self, limit: usize) -> Self {
        self.recent_recipient_limit = limit;
        self
    }

    pub fn with_lookup_debounce(mut self, window: Duration) -> Self {
        self.lookup_debounce_ms = window.as_millis() as u64;
        self
    }

    pub fn with_lookup_cache_capacity(mut self, capacity: u64) -> Self {
        self.lookup_cache_capacity = capacity;
        self
    }

    pub fn with_lookup_cache_timeout(mut self, ttl: Duration) -> Self {
        self.lookup_cache_ttl_ms = ttl.as_millis() as u64;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn lookup_debounce(&self) -> Duration {
        Duration::from_millis(self.lookup_debounce_ms)
    }

    pub fn lookup_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.lookup_cache_ttl_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}
