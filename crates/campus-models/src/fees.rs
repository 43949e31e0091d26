//! Fee records, payment orders, bills and earnings.
//!
//! A fee row is written for every payment attempt. Offline payments are
//! recorded as `Completed` straight away; online payments start `Pending`
//! and are settled by verifying the gateway order.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::students::AdmissionStatus;

/// Tolerance used when comparing money amounts stored as floating point.
pub const AMOUNT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Maps a gateway `order_status` onto the internal status.
    ///
    /// Unknown values stay `Pending` so that a later verification can still
    /// settle the order.
    pub fn from_gateway(order_status: &str) -> Self {
        match order_status.trim().to_ascii_uppercase().as_str() {
            "PAID" => Self::Completed,
            "EXPIRED" | "TERMINATED" | "TERMINATION_REQUESTED" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fee {
    pub id: Uuid,
    pub student_id: Uuid,
    pub unique_id: String,
    pub amount_paid: f64,
    pub total_fee: f64,
    /// Balance left once this payment is settled
    pub due_fee: f64,
    pub payment_type: String,
    pub payment_method: String,
    pub payment_id: String,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checks a payment amount against the outstanding balance.
pub fn validate_payment_amount(amount: f64, amount_due: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("Amount must be greater than zero".to_string());
    }
    if amount_due <= AMOUNT_EPSILON {
        return Err("Fee is already fully paid".to_string());
    }
    if amount > amount_due + AMOUNT_EPSILON {
        return Err(format!(
            "Amount {} exceeds the outstanding balance of {}",
            format_amount(amount),
            format_amount(amount_due)
        ));
    }
    Ok(())
}

/// Renders an amount the way the gateway echoes it back: no trailing
/// `.0` for whole numbers.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeLookupQuery {
    #[param(example = "STU2025123456")]
    pub unique_id: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillQuery {
    pub payment_id: String,
}

/// Student details and balance shown on the fee page.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentFeeInfo {
    pub student_id: Uuid,
    pub unique_id: String,
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub admission_status: AdmissionStatus,
    pub course_id: Uuid,
    pub course_name: String,
    pub semester: i32,
    pub total_semesters: i32,
    pub course_fee: f64,
    pub amount_paid: f64,
    pub amount_due: f64,
}

fn default_payment_method() -> String {
    "Cash".to_string()
}

/// Payment collected at the office.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OfflinePaymentDto {
    #[validate(length(min = 1))]
    pub unique_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "Semester Fee")]
    pub payment_type: String,
    #[serde(default = "default_payment_method")]
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(length(min = 1))]
    pub unique_id: String,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 1, max = 50))]
    pub payment_type: String,
    /// Defaults to the student's name on record
    pub customer_name: Option<String>,
    /// Defaults to the phone number on record
    pub customer_phone: Option<String>,
    /// Defaults to the email on record
    #[validate(email)]
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub payment_session_id: String,
    pub order_id: String,
    /// sha256 of order id, amount and client secret, hex encoded
    pub hash: String,
    #[schema(value_type = Object)]
    pub gateway_response: serde_json::Value,
    pub fee: Fee,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyOrderDto {
    #[validate(length(min = 1, max = 64))]
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyOrderResponse {
    pub order_id: String,
    /// Raw `order_status` reported by the gateway
    pub gateway_status: String,
    pub fee_status: PaymentStatus,
    /// Whether this call moved the fee out of `Pending`
    pub applied: bool,
    pub fee: Fee,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Bill {
    pub date: DateTime<Utc>,
    pub bill_no: String,
    pub course_name: String,
    pub semester: i32,
    pub student_name: String,
    pub student_id: String,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_type: String,
    pub amount_paid: f64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EarningsQuery {
    /// `YYYY-MM-DD` or RFC 3339 timestamp
    pub start_date: String,
    /// Defaults to `start_date`
    pub end_date: Option<String>,
}

impl EarningsQuery {
    /// Resolves the query into an inclusive UTC range.
    ///
    /// Date-only values cover the whole day: the start expands to
    /// 00:00:00.000 and the end to 23:59:59.999.
    pub fn range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
        let end_raw = self
            .end_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.start_date);

        let start = parse_bound(&self.start_date, false)?;
        let end = parse_bound(end_raw, true)?;

        if start > end {
            return Err("start_date must not be after end_date".to_string());
        }
        Ok((start, end))
    }
}

fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        }
        .ok_or_else(|| "Invalid time of day".to_string())?;
        return Ok(date.and_time(time).and_utc());
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD or RFC 3339", raw))
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailyEarning {
    pub date: NaiveDate,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EarningsReport {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_earnings: f64,
    pub total_payments: i64,
    pub daily: Vec<DailyEarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_status_from_gateway() {
        assert_eq!(PaymentStatus::from_gateway("PAID"), PaymentStatus::Completed);
        assert_eq!(PaymentStatus::from_gateway("ACTIVE"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_gateway("EXPIRED"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_gateway("TERMINATED"), PaymentStatus::Failed);
        assert_eq!(
            PaymentStatus::from_gateway("TERMINATION_REQUESTED"),
            PaymentStatus::Failed
        );
        assert_eq!(PaymentStatus::from_gateway("paid"), PaymentStatus::Completed);
        assert_eq!(PaymentStatus::from_gateway("SOMETHING_NEW"), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_serializes_pascal_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            r#""Completed""#
        );
        assert!(PaymentStatus::Failed.is_final());
        assert!(!PaymentStatus::Pending.is_final());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(500.0, 1000.0).is_ok());
        assert!(validate_payment_amount(1000.0, 1000.0).is_ok());
        assert!(validate_payment_amount(0.0, 1000.0).is_err());
        assert!(validate_payment_amount(-5.0, 1000.0).is_err());
        assert!(validate_payment_amount(f64::NAN, 1000.0).is_err());
        assert!(validate_payment_amount(1000.5, 1000.0).is_err());
        assert_eq!(
            validate_payment_amount(10.0, 0.0).unwrap_err(),
            "Fee is already fully paid"
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(500.0), "500");
        assert_eq!(format_amount(500.5), "500.5");
    }

    #[test]
    fn test_earnings_range_date_only_covers_whole_day() {
        let query = EarningsQuery {
            start_date: "2025-03-01".to_string(),
            end_date: None,
        };
        let (start, end) = query.range().unwrap();
        assert_eq!(start.day(), 1);
        assert_eq!(start.hour(), 0);
        assert_eq!(end.day(), 1);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_earnings_range_accepts_timestamps() {
        let query = EarningsQuery {
            start_date: "2025-03-01T10:00:00Z".to_string(),
            end_date: Some("2025-03-05".to_string()),
        };
        let (start, end) = query.range().unwrap();
        assert_eq!(start.hour(), 10);
        assert_eq!(end.day(), 5);
    }

    #[test]
    fn test_earnings_range_rejects_inverted_and_garbage() {
        let inverted = EarningsQuery {
            start_date: "2025-03-05".to_string(),
            end_date: Some("2025-03-01".to_string()),
        };
        assert!(inverted.range().is_err());

        let garbage = EarningsQuery {
            start_date: "yesterday".to_string(),
            end_date: None,
        };
        assert!(garbage.range().is_err());
    }

    #[test]
    fn test_offline_payment_defaults_to_cash() {
        let dto: OfflinePaymentDto = serde_json::from_value(serde_json::json!({
            "unique_id": "STU2025000001",
            "amount": 1500,
            "payment_type": "Semester Fee"
        }))
        .unwrap();
        assert_eq!(dto.payment_method, "Cash");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_order_rejects_zero_amount() {
        let dto: CreateOrderDto = serde_json::from_value(serde_json::json!({
            "unique_id": "STU2025000001",
            "amount": 0,
            "payment_type": "Semester Fee"
        }))
        .unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("amount"));
    }
}
