use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use campus_core::AppError;
use tracing::instrument;

use super::model::{
    Bill, BillQuery, CreateOrderDto, EarningsQuery, EarningsReport, Fee, FeeLookupQuery,
    OfflinePaymentDto, OrderResponse, StudentFeeInfo, VerifyOrderDto, VerifyOrderResponse,
};
use super::service::FeeService;
use crate::middleware::role::AdminUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Student details and outstanding balance for the fee page
#[utoipa::path(
    get,
    path = "/api/fees/student",
    params(FeeLookupQuery),
    responses(
        (status = 200, description = "Student balance", body = StudentFeeInfo),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_student_fee_info(
    State(state): State<AppState>,
    Query(query): Query<FeeLookupQuery>,
) -> Result<Json<StudentFeeInfo>, AppError> {
    let info = FeeService::get_student_fee_info(&state.db, &query.unique_id).await?;
    Ok(Json(info))
}

#[utoipa::path(
    get,
    path = "/api/fees/history",
    params(FeeLookupQuery),
    responses(
        (status = 200, description = "Fee records, newest first", body = Vec<Fee>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_fee_history(
    State(state): State<AppState>,
    Query(query): Query<FeeLookupQuery>,
) -> Result<Json<Vec<Fee>>, AppError> {
    let fees = FeeService::get_fee_history(&state.db, &query.unique_id).await?;
    Ok(Json(fees))
}

#[utoipa::path(
    get,
    path = "/api/fees/bill",
    params(BillQuery),
    responses(
        (status = 200, description = "Bill for one payment", body = Bill),
        (status = 404, description = "No payment found", body = ErrorResponse)
    ),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_bill(
    State(state): State<AppState>,
    Query(query): Query<BillQuery>,
) -> Result<Json<Bill>, AppError> {
    let bill = FeeService::get_bill(&state.db, &query.payment_id).await?;
    Ok(Json(bill))
}

/// Completed payments in a date range
///
/// `end_date` defaults to `start_date`; date-only values cover the whole
/// day in UTC.
#[utoipa::path(
    get,
    path = "/api/fees/earnings",
    params(EarningsQuery),
    responses(
        (status = 200, description = "Earnings report", body = EarningsReport),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip(state, _admin))]
pub async fn get_earnings(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<EarningsQuery>,
) -> Result<Json<EarningsReport>, AppError> {
    let report = FeeService::get_earnings(&state.db, query).await?;
    Ok(Json(report))
}

/// Record a payment collected at the office
#[utoipa::path(
    patch,
    path = "/api/fees",
    request_body = OfflinePaymentDto,
    responses(
        (status = 200, description = "Payment recorded", body = Fee),
        (status = 400, description = "Amount exceeds balance or admission not accepted", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Fees"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn record_offline_payment(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(dto): ValidatedJson<OfflinePaymentDto>,
) -> Result<Json<Fee>, AppError> {
    let fee = FeeService::record_offline_payment(&state.db, &state.email_config, dto).await?;
    Ok(Json(fee))
}

/// Start an online payment
#[utoipa::path(
    post,
    path = "/api/fees/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Amount exceeds balance or admission not accepted", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 502, description = "Payment gateway error", body = ErrorResponse),
        (status = 503, description = "Payment gateway not configured", body = ErrorResponse)
    ),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = FeeService::create_order(
        &state.db,
        state.payments.as_ref(),
        &state.payment_config,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Reconcile an online payment with the gateway
#[utoipa::path(
    post,
    path = "/api/fees/orders/verify",
    request_body = VerifyOrderDto,
    responses(
        (status = 200, description = "Current payment status", body = VerifyOrderResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 409, description = "Paid amount exceeds the outstanding balance", body = ErrorResponse),
        (status = 502, description = "Payment gateway error", body = ErrorResponse)
    ),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn verify_order(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyOrderDto>,
) -> Result<Json<VerifyOrderResponse>, AppError> {
    let response = FeeService::verify_order(
        &state.db,
        state.payments.as_ref(),
        &state.email_config,
        &dto.order_id,
    )
    .await?;
    Ok(Json(response))
}
