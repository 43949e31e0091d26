use axum::{
    Router,
    routing::{get, patch, post},
};

use super::controller::{
    create_order, get_bill, get_earnings, get_fee_history, get_student_fee_info,
    record_offline_payment, verify_order,
};
use crate::state::AppState;

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", patch(record_offline_payment))
        .route("/student", get(get_student_fee_info))
        .route("/history", get(get_fee_history))
        .route("/bill", get(get_bill))
        .route("/earnings", get(get_earnings))
        .route("/orders", post(create_order))
        .route("/orders/verify", post(verify_order))
}
