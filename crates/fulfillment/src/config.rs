//! Fulfillment configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TGF_ENVIRONMENT` - `test` or `production` (default: test)
//! - `RSR_IN_HOUSE_TEST_ACCOUNT` - In-house ordering account, test (default: 99901)
//! - `RSR_IN_HOUSE_PRODUCTION_ACCOUNT` - In-house ordering account, production (default: 60742)
//! - `RSR_DROP_SHIP_TEST_ACCOUNT` - Drop-ship ordering account, test (default: 99902)
//! - `RSR_DROP_SHIP_PRODUCTION_ACCOUNT` - Drop-ship ordering account, production (default: 63824)
//! - `ZOHO_DEAL_OWNER` - Owner recorded on every deal (default: Webservices App)
//! - `ZOHO_PIPELINE` - Deal pipeline name (default: E-commerce Sales)
//!
//! Nothing here is read implicitly: callers load a [`FulfillmentConfig`] once
//! and pass its [`Environment`] into the splitter.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tgf_core::FulfillmentType;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Whether orders go to the distributor's test or production accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    #[default]
    Test,
    Production,
}

impl FromStr for EnvironmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "development" | "staging" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("expected 'test' or 'production', got '{other}'")),
        }
    }
}

/// Distributor ordering accounts, one pair per fulfillment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingAccounts {
    pub in_house_test: String,
    pub in_house_production: String,
    pub drop_ship_test: String,
    pub drop_ship_production: String,
}

impl Default for OrderingAccounts {
    fn default() -> Self {
        Self {
            in_house_test: "99901".to_string(),
            in_house_production: "60742".to_string(),
            drop_ship_test: "99902".to_string(),
            drop_ship_production: "63824".to_string(),
        }
    }
}

/// Explicit environment passed to the order splitter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
    pub mode: EnvironmentMode,
    pub accounts: OrderingAccounts,
}

impl Environment {
    /// Test environment with the standard accounts.
    #[must_use]
    pub fn test() -> Self {
        Self::default()
    }

    /// Production environment with the standard accounts.
    #[must_use]
    pub fn production() -> Self {
        Self {
            mode: EnvironmentMode::Production,
            accounts: OrderingAccounts::default(),
        }
    }

    /// Account a shipment group of the given type is ordered under.
    #[must_use]
    pub fn ordering_account(&self, fulfillment: FulfillmentType) -> &str {
        let accounts = &self.accounts;
        match (fulfillment, self.mode) {
            (FulfillmentType::InHouse, EnvironmentMode::Test) => &accounts.in_house_test,
            (FulfillmentType::InHouse, EnvironmentMode::Production) => {
                &accounts.in_house_production
            }
            (FulfillmentType::DropShip, EnvironmentMode::Test) => &accounts.drop_ship_test,
            (FulfillmentType::DropShip, EnvironmentMode::Production) => {
                &accounts.drop_ship_production
            }
        }
    }
}

/// Static values stamped onto every deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealDefaults {
    /// Deal owner, also recorded as creator and last modifier.
    pub deal_owner: String,
    pub pipeline: String,
    pub lead_source: String,
    pub campaign_source: String,
    /// Account name for customers without a company.
    pub account_name: String,
    pub deal_type: String,
}

impl Default for DealDefaults {
    fn default() -> Self {
        Self {
            deal_owner: "Webservices App".to_string(),
            pipeline: "E-commerce Sales".to_string(),
            lead_source: "Website".to_string(),
            campaign_source: "TheGunFirm.com".to_string(),
            account_name: "Direct Customer".to_string(),
            deal_type: "E-commerce Order".to_string(),
        }
    }
}

/// Complete fulfillment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FulfillmentConfig {
    pub environment: Environment,
    pub deal_defaults: DealDefaults,
}

impl FulfillmentConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `TGF_ENVIRONMENT` is not a
    /// known mode or an account variable is set but empty or non-numeric.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mode = get_optional_env("TGF_ENVIRONMENT")
            .map(|value| {
                value
                    .parse::<EnvironmentMode>()
                    .map_err(|e| ConfigError::InvalidEnvVar("TGF_ENVIRONMENT".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        let fallback = OrderingAccounts::default();
        let accounts = OrderingAccounts {
            in_house_test: get_account("RSR_IN_HOUSE_TEST_ACCOUNT", &fallback.in_house_test)?,
            in_house_production: get_account(
                "RSR_IN_HOUSE_PRODUCTION_ACCOUNT",
                &fallback.in_house_production,
            )?,
            drop_ship_test: get_account("RSR_DROP_SHIP_TEST_ACCOUNT", &fallback.drop_ship_test)?,
            drop_ship_production: get_account(
                "RSR_DROP_SHIP_PRODUCTION_ACCOUNT",
                &fallback.drop_ship_production,
            )?,
        };

        let defaults = DealDefaults::default();
        let deal_defaults = DealDefaults {
            deal_owner: get_env_or_default("ZOHO_DEAL_OWNER", &defaults.deal_owner),
            pipeline: get_env_or_default("ZOHO_PIPELINE", &defaults.pipeline),
            ..defaults
        };

        tracing::debug!(?mode, "Loaded fulfillment configuration");

        Ok(Self {
            environment: Environment { mode, accounts },
            deal_defaults,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a distributor account number, falling back to the standard account.
fn get_account(key: &str, default: &str) -> Result<String, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default.to_string());
    };
    validate_account(key, &value)?;
    Ok(value.trim().to_string())
}

/// Account numbers are short numeric strings.
fn validate_account(key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("account number must be numeric (got '{value}')"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_account_per_fulfillment_and_mode() {
        let test = Environment::test();
        assert_eq!(test.ordering_account(FulfillmentType::InHouse), "99901");
        assert_eq!(test.ordering_account(FulfillmentType::DropShip), "99902");

        let prod = Environment::production();
        assert_eq!(prod.ordering_account(FulfillmentType::InHouse), "60742");
        assert_eq!(prod.ordering_account(FulfillmentType::DropShip), "63824");
    }

    #[test]
    fn test_environment_mode_from_str() {
        assert_eq!("Production".parse::<EnvironmentMode>(), Ok(EnvironmentMode::Production));
        assert_eq!("test".parse::<EnvironmentMode>(), Ok(EnvironmentMode::Test));
        assert!("live".parse::<EnvironmentMode>().is_err());
    }

    #[test]
    fn test_validate_account() {
        assert!(validate_account("X", "63824").is_ok());
        assert!(validate_account("X", " 99901 ").is_ok());
        assert!(validate_account("X", "").is_err());
        assert!(validate_account("X", "RSR-1").is_err());
    }

    #[test]
    fn test_deal_defaults() {
        let defaults = DealDefaults::default();
        assert_eq!(defaults.deal_owner, "Webservices App");
        assert_eq!(defaults.pipeline, "E-commerce Sales");
    }
}
