//! Payment gateway configuration.
//!
//! - `CASHFREE_CLIENT_ID` / `CASHFREE_CLIENT_SECRET`: API credentials
//! - `CASHFREE_ENV`: `sandbox` (default) or `production`
//! - `CASHFREE_API_VERSION`: value of the `x-api-version` header (default `2023-08-01`)
//! - `PAYMENT_CURRENCY`: order currency (default `INR`)

use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" | "live" => Self::Production,
            _ => Self::Sandbox,
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.cashfree.com",
            Self::Production => "https://api.cashfree.com",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: GatewayEnvironment,
    pub api_version: String,
    pub currency: String,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("CASHFREE_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("CASHFREE_CLIENT_SECRET").unwrap_or_default(),
            environment: GatewayEnvironment::parse(
                &env::var("CASHFREE_ENV").unwrap_or_else(|_| "sandbox".to_string()),
            ),
            api_version: env::var("CASHFREE_API_VERSION")
                .unwrap_or_else(|_| "2023-08-01".to_string()),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
        }
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(GatewayEnvironment::parse("PRODUCTION"), GatewayEnvironment::Production);
        assert_eq!(GatewayEnvironment::parse("sandbox"), GatewayEnvironment::Sandbox);
        assert_eq!(GatewayEnvironment::parse("anything"), GatewayEnvironment::Sandbox);
    }

    #[test]
    fn test_base_url_by_environment() {
        assert_eq!(GatewayEnvironment::Sandbox.base_url(), "https://sandbox.cashfree.com");
        assert_eq!(GatewayEnvironment::Production.base_url(), "https://api.cashfree.com");
    }
}
