//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use stockbill_core::CompanyDetails;
use stockbill_db::RetryPolicy;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP port (`STOCKBILL_PORT`, then `PORT`)
    pub port: u16,

    /// SQLite file holding the sheets, or `:memory:`
    pub database_path: PathBuf,

    /// First delay between persistence retries
    pub persist_initial_interval: Duration,

    /// Total time a write may spend retrying
    pub persist_max_elapsed: Duration,

    /// Seller block printed on invoices
    pub company: CompanyDetails,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let text = |key: &str| var(key).unwrap_or_default();

        let port = match var("STOCKBILL_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCKBILL_PORT".to_string()))?,
            None => 5000,
        };

        let millis = |key: &str, default: u64| -> Result<Duration, ConfigError> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidValue(key.to_string())),
                None => Ok(Duration::from_millis(default)),
            }
        };

        Ok(ApiConfig {
            port,
            database_path: var("STOCKBILL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./stockbill.db")),
            persist_initial_interval: millis("STOCKBILL_PERSIST_INITIAL_INTERVAL_MS", 200)?,
            persist_max_elapsed: millis("STOCKBILL_PERSIST_MAX_ELAPSED_MS", 10_000)?,
            company: CompanyDetails {
                name: text("STOCKBILL_COMPANY_NAME"),
                address: text("STOCKBILL_COMPANY_ADDRESS"),
                city: text("STOCKBILL_COMPANY_CITY"),
                state: text("STOCKBILL_COMPANY_STATE"),
                pincode: text("STOCKBILL_COMPANY_PINCODE"),
                gstin: text("STOCKBILL_COMPANY_GSTIN"),
                pan: text("STOCKBILL_COMPANY_PAN"),
                mobile: text("STOCKBILL_COMPANY_MOBILE"),
                email: text("STOCKBILL_COMPANY_EMAIL"),
                bank_name: text("STOCKBILL_COMPANY_BANK_NAME"),
                account_no: text("STOCKBILL_COMPANY_ACCOUNT_NO"),
                ifsc_code: text("STOCKBILL_COMPANY_IFSC"),
                jurisdiction: text("STOCKBILL_COMPANY_JURISDICTION"),
            },
        })
    }

    /// Retry policy for the persister.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_interval: self.persist_initial_interval,
            max_interval: RetryPolicy::default().max_interval,
            max_elapsed: self.persist_max_elapsed,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_path, PathBuf::from("./stockbill.db"));
        assert_eq!(config.retry_policy().initial_interval, Duration::from_millis(200));
        assert_eq!(config.retry_policy().max_elapsed, Duration::from_secs(10));
        assert_eq!(config.company, CompanyDetails::default());
    }

    #[test]
    fn test_port_prefers_own_variable() {
        assert_eq!(load(&[("PORT", "8080")]).unwrap().port, 8080);
        let config = load(&[("PORT", "8080"), ("STOCKBILL_PORT", "9090")]).unwrap();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(matches!(
            load(&[("STOCKBILL_PORT", "http")]),
            Err(ConfigError::InvalidValue(_))
        ));
        let err = load(&[("STOCKBILL_PERSIST_MAX_ELAPSED_MS", "soon")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for STOCKBILL_PERSIST_MAX_ELAPSED_MS"
        );
    }

    #[test]
    fn test_company_details() {
        let config = load(&[
            ("STOCKBILL_COMPANY_NAME", "Volt House"),
            ("STOCKBILL_COMPANY_GSTIN", "23ABCDE1234F1Z5"),
            ("STOCKBILL_COMPANY_JURISDICTION", "Indore"),
            ("STOCKBILL_DB_PATH", ":memory:"),
        ])
        .unwrap();
        assert_eq!(config.company.name, "Volt House");
        assert_eq!(config.company.gstin, "23ABCDE1234F1Z5");
        assert_eq!(config.company.jurisdiction, "Indore");
        assert_eq!(config.database_path, PathBuf::from(":memory:"));
    }
}
