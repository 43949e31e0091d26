//! Cashfree PG client.
//!
//! Orders are created with `POST {base}/pg/orders` and read back with
//! `GET {base}/pg/orders/{order_id}`. Every call carries the
//! `x-client-id`, `x-client-secret` and `x-api-version` headers.

use std::fmt;

use campus_config::PaymentConfig;
use campus_core::media::BoxFuture;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};

use super::payments::{GatewayError, GatewayOrder, OrderRequest, PaymentGateway};

#[derive(Clone)]
pub struct CashfreeGateway {
    client: Client,
    config: PaymentConfig,
}

impl fmt::Debug for CashfreeGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CashfreeGateway")
            .field("environment", &self.config.environment)
            .field("api_version", &self.config.api_version)
            .finish_non_exhaustive()
    }
}

impl CashfreeGateway {
    pub fn new(client: Client, config: PaymentConfig) -> Self {
        Self { client, config }
    }

    fn orders_url(&self) -> String {
        format!("{}/pg/orders", self.config.base_url())
    }

    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        Ok(builder
            .header("x-client-id", &self.config.client_id)
            .header("x-client-secret", &self.config.client_secret)
            .header("x-api-version", &self.config.api_version)
            .header("accept", "application/json"))
    }

    async fn read_order(response: Response, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::OrderNotFound(order_id.to_string()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        parse_order(body)
    }
}

/// Pull the fields we rely on out of a Cashfree order body.
pub fn parse_order(body: Value) -> Result<GatewayOrder, GatewayError> {
    let order_id = body
        .get("order_id")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidResponse("missing order_id".to_string()))?
        .to_string();
    let order_status = body
        .get("order_status")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidResponse("missing order_status".to_string()))?
        .to_string();
    let order_amount = body
        .get("order_amount")
        .and_then(Value::as_f64)
        .unwrap_or_default();
    let payment_session_id = body
        .get("payment_session_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(GatewayOrder {
        order_id,
        order_status,
        order_amount,
        payment_session_id,
        raw: body,
    })
}

impl PaymentGateway for CashfreeGateway {
    fn create_order<'a>(
        &'a self,
        request: &'a OrderRequest,
    ) -> BoxFuture<'a, Result<GatewayOrder, GatewayError>> {
        Box::pin(async move {
            let mut payload = json!({
                "order_id": request.order_id,
                "order_amount": request.amount,
                "order_currency": request.currency,
                "customer_details": request.customer,
            });
            if let Some(note) = &request.note {
                payload["order_note"] = json!(note);
            }

            let response = self
                .authorize(self.client.post(self.orders_url()))?
                .json(&payload)
                .send()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            tracing::info!(
                order_id = %request.order_id,
                status = %response.status(),
                "Cashfree order created"
            );

            Self::read_order(response, &request.order_id).await
        })
    }

    fn fetch_order<'a>(&'a self, order_id: &'a str) -> BoxFuture<'a, Result<GatewayOrder, GatewayError>> {
        Box::pin(async move {
            tracing::debug!(order_id = %order_id, "Fetching Cashfree order");
            let url = format!("{}/{}", self.orders_url(), order_id);
            let response = self
                .authorize(self.client.get(url))?
                .send()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            Self::read_order(response, order_id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_config::GatewayEnvironment;

    fn config(client_id: &str) -> PaymentConfig {
        PaymentConfig {
            client_id: client_id.to_string(),
            client_secret: "secret".to_string(),
            environment: GatewayEnvironment::Sandbox,
            api_version: "2023-08-01".to_string(),
            currency: "INR".to_string(),
        }
    }

    #[test]
    fn test_parse_order() {
        let order = parse_order(json!({
            "order_id": "ORDER_abc",
            "order_status": "ACTIVE",
            "order_amount": 1500.0,
            "payment_session_id": "session_123",
            "cf_order_id": "2149460581"
        }))
        .unwrap();

        assert_eq!(order.order_id, "ORDER_abc");
        assert_eq!(order.order_status, "ACTIVE");
        assert_eq!(order.order_amount, 1500.0);
        assert_eq!(order.payment_session_id.as_deref(), Some("session_123"));
        assert_eq!(order.raw["cf_order_id"], "2149460581");
    }

    #[test]
    fn test_parse_order_requires_status() {
        let err = parse_order(json!({"order_id": "ORDER_abc"})).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_orders_url_follows_environment() {
        let gateway = CashfreeGateway::new(Client::new(), config("id"));
        assert_eq!(gateway.orders_url(), "https://sandbox.cashfree.com/pg/orders");
    }

    #[test]
    fn test_missing_credentials_are_rejected_before_sending() {
        let gateway = CashfreeGateway::new(Client::new(), config(""));
        let result = gateway.authorize(gateway.client.get("https://sandbox.cashfree.com"));
        assert!(matches!(result, Err(GatewayError::NotConfigured)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let gateway = CashfreeGateway::new(Client::new(), config("id"));
        assert!(!format!("{:?}", gateway).contains("secret"));
    }
}
