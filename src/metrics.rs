//! Prometheus metrics.
//!
//! Recording is switched off with `METRICS_ENABLED=false`; every helper
//! below then becomes a no-op and `/metrics` is not mounted.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const REQUEST_DURATION: &str = "campus_http_request_duration_seconds";
const PAYMENT_AMOUNT: &str = "campus_fee_payment_amount";

static METRICS_ENABLED: OnceLock<bool> = OnceLock::new();

pub fn metrics_enabled() -> bool {
    *METRICS_ENABLED.get_or_init(|| {
        std::env::var("METRICS_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "off"))
            .unwrap_or(true)
    })
}

fn record(f: impl FnOnce()) {
    if metrics_enabled() {
        f();
    }
}

/// Installs the global recorder. Returns `None` when metrics are disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !metrics_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full(PAYMENT_AMOUNT.to_string()),
            &[500.0, 1000.0, 5000.0, 10000.0, 25000.0, 50000.0, 100000.0, 250000.0],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !metrics_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched paths are collapsed so scanners cannot blow up label cardinality.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("campus_http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("campus_http_requests_in_flight").decrement(1.0);

    let status = response.status();
    let class = match status.as_u16() / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    };

    counter!(
        "campus_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => class
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_user_registered(role: &str) {
    record(|| counter!("campus_users_registered_total", "role" => role.to_string()).increment(1));
}

pub fn track_user_login_success(role: &str) {
    record(|| {
        counter!("campus_logins_total", "outcome" => "success", "role" => role.to_string())
            .increment(1)
    });
}

pub fn track_user_login_failure(reason: &str) {
    record(|| {
        counter!("campus_logins_total", "outcome" => "failure", "reason" => reason.to_string())
            .increment(1)
    });
}

pub fn track_jwt_issued() {
    record(|| counter!("campus_jwt_issued_total").increment(1));
}

/// `submitted`, `accepted` or `rejected`
pub fn track_admission(event: &str) {
    record(|| counter!("campus_admissions_total", "event" => event.to_string()).increment(1));
}

/// `method` is the stored payment method, e.g. `Cash` or `Online`.
pub fn track_payment_recorded(method: &str, status: &str) {
    record(|| {
        counter!(
            "campus_fee_payments_total",
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .increment(1)
    });
}

/// Only settled money is recorded here.
pub fn track_payment_amount(amount: f64) {
    record(|| histogram!(PAYMENT_AMOUNT).record(amount));
}

/// `unchanged`, or the status a verification moved the fee to.
pub fn track_payment_reconciliation(outcome: &str) {
    record(|| {
        counter!("campus_fee_reconciliations_total", "outcome" => outcome.to_string())
            .increment(1)
    });
}

pub fn track_media_operation(operation: &str, success: bool) {
    record(|| {
        counter!(
            "campus_media_operations_total",
            "operation" => operation.to_string(),
            "status" => if success { "success" } else { "error" }
        )
        .increment(1)
    });
}
