pub use campus_models::fees::{
    AMOUNT_EPSILON, Bill, BillQuery, CreateOrderDto, DailyEarning, EarningsQuery, EarningsReport,
    Fee, FeeLookupQuery, OfflinePaymentDto, OrderResponse, PaymentStatus, StudentFeeInfo,
    VerifyOrderDto, VerifyOrderResponse, format_amount, validate_payment_amount,
};
pub use campus_models::students::{AdmissionStatus, Student};

pub const ONLINE_PAYMENT_METHOD: &str = "Online";
pub const OFFLINE_REFERENCE_PREFIX: &str = "OFFLINE";

/// Balance left after paying `amount` against `amount_due`, or `None` when
/// the payment is larger than the balance.
pub fn remaining_due(amount_due: f64, amount: f64) -> Option<f64> {
    let remaining = amount_due - amount;
    if remaining < -AMOUNT_EPSILON {
        None
    } else if remaining <= AMOUNT_EPSILON {
        Some(0.0)
    } else {
        Some(remaining)
    }
}
