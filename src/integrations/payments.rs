//! Payment gateway abstraction.
//!
//! Fee handlers only talk to a [`PaymentGateway`]; the Cashfree client in
//! [`super::cashfree`] is the production implementation and tests plug in
//! an in-memory fake.

use std::fmt;

use axum::http::StatusCode;
use campus_core::AppError;
use campus_core::media::BoxFuture;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub customer: CustomerDetails,
    pub note: Option<String>,
}

/// Order as reported by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub order_id: String,
    /// Raw gateway status, e.g. `ACTIVE`, `PAID`, `EXPIRED`
    pub order_status: String,
    pub order_amount: f64,
    pub payment_session_id: Option<String>,
    /// Full response body, passed through to clients
    pub raw: serde_json::Value,
}

pub trait PaymentGateway: Send + Sync + fmt::Debug {
    fn create_order<'a>(
        &'a self,
        request: &'a OrderRequest,
    ) -> BoxFuture<'a, Result<GatewayOrder, GatewayError>>;

    fn fetch_order<'a>(&'a self, order_id: &'a str) -> BoxFuture<'a, Result<GatewayOrder, GatewayError>>;
}

#[derive(Debug)]
pub enum GatewayError {
    /// Credentials are missing from the environment.
    NotConfigured,
    /// The gateway could not be reached.
    Transport(String),
    /// The gateway answered with a non-success status.
    Rejected { status: u16, message: String },
    OrderNotFound(String),
    /// The gateway answered 2xx with a body we could not read.
    InvalidResponse(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } if *status == 400 || *status == 422 => {
                StatusCode::BAD_REQUEST
            }
            Self::Transport(_) | Self::Rejected { .. } | Self::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        AppError::new(self.status_code(), self)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Payment gateway is not configured"),
            Self::Transport(msg) => write!(f, "Payment gateway unreachable: {}", msg),
            Self::Rejected { status, message } => {
                write!(f, "Payment gateway rejected the request ({}): {}", status, message)
            }
            Self::OrderNotFound(id) => write!(f, "Order {} not found at payment gateway", id),
            Self::InvalidResponse(msg) => write!(f, "Invalid payment gateway response: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// `ORDER_` followed by 16 random hex characters.
pub fn generate_order_id() -> String {
    generate_reference("ORDER")
}

pub fn generate_reference(prefix: &str) -> String {
    let bytes: [u8; 8] = rand::random();
    format!("{}_{}", prefix, hex::encode(bytes))
}

/// Checksum returned to the client alongside a new order: hex SHA-256 of
/// `order_id + amount + client_secret`.
pub fn payment_hash(order_id: &str, amount: &str, client_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(order_id.as_bytes());
    hasher.update(amount.as_bytes());
    hasher.update(client_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        let id = generate_order_id();
        let suffix = id.strip_prefix("ORDER_").unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_order_id());
    }

    #[test]
    fn test_payment_hash_is_concatenation_digest() {
        let hash = payment_hash("ORDER_1", "500", "secret");

        let mut hasher = Sha256::new();
        hasher.update(b"ORDER_1500secret");
        assert_eq!(hash, hex::encode(hasher.finalize()));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            GatewayError::NotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::OrderNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Rejected {
                status: 400,
                message: "bad phone".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Rejected {
                status: 500,
                message: "down".into()
            }
            .into_app_error()
            .status,
            StatusCode::BAD_GATEWAY
        );
    }
}
