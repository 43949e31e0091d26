//! Fee balances and payments.
//!
//! Every balance change happens inside a transaction that holds a row lock
//! on the student, together with the fee row that explains it. Online
//! payments touch the balance only when their gateway order is verified as
//! paid, and the `status = 'Pending'` guard on that update makes repeated
//! verification a no-op. Pending orders hold their amount against the
//! balance until they settle or fail, so new payments can only use what is
//! left.

use anyhow::Context;
use campus_config::{EmailConfig, PaymentConfig};
use campus_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use super::model::{
    AMOUNT_EPSILON, AdmissionStatus, Bill, CreateOrderDto, DailyEarning, EarningsQuery,
    EarningsReport, Fee, OFFLINE_REFERENCE_PREFIX, ONLINE_PAYMENT_METHOD, OfflinePaymentDto,
    OrderResponse, PaymentStatus, Student, StudentFeeInfo, VerifyOrderResponse, format_amount,
    remaining_due, validate_payment_amount,
};
use crate::integrations::payments::generate_reference;
use crate::integrations::{
    CustomerDetails, OrderRequest, PaymentGateway, generate_order_id, payment_hash,
};
use crate::metrics::{track_payment_amount, track_payment_reconciliation, track_payment_recorded};
use crate::utils::email::{EmailService, Mail, PaymentMail};

const STUDENT_FEE_INFO_SELECT: &str = r#"
    SELECT s.id AS student_id, s.unique_id, s.first_name || ' ' || s.last_name AS student_name,
           s.email, s.phone, s.admission_status, s.course_id, c.course_name, s.semester,
           c.total_semesters, s.course_fee, s.amount_paid, s.amount_due
    FROM students s
    JOIN courses c ON c.id = s.course_id
    WHERE s.unique_id = $1
"#;

pub struct FeeService;

impl FeeService {
    #[instrument(skip(db))]
    pub async fn get_student_fee_info(
        db: &PgPool,
        unique_id: &str,
    ) -> Result<StudentFeeInfo, AppError> {
        sqlx::query_as::<_, StudentFeeInfo>(STUDENT_FEE_INFO_SELECT)
            .bind(unique_id.trim())
            .fetch_optional(db)
            .await
            .context("Failed to fetch student fee details")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_fee_history(db: &PgPool, unique_id: &str) -> Result<Vec<Fee>, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE unique_id = $1)")
                .bind(unique_id.trim())
                .fetch_one(db)
                .await
                .context("Failed to check student")
                .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        sqlx::query_as::<_, Fee>(
            "SELECT * FROM fees WHERE unique_id = $1 ORDER BY payment_date DESC",
        )
        .bind(unique_id.trim())
        .fetch_all(db)
        .await
        .context("Failed to fetch fee history")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_bill(db: &PgPool, payment_id: &str) -> Result<Bill, AppError> {
        sqlx::query_as::<_, Bill>(
            r#"
            SELECT f.payment_date AS date, f.payment_id AS bill_no, c.course_name, s.semester,
                   s.first_name || ' ' || s.last_name AS student_name, s.unique_id AS student_id,
                   f.payment_method, f.status AS payment_status, f.payment_type, f.amount_paid
            FROM fees f
            JOIN students s ON s.id = f.student_id
            JOIN courses c ON c.id = s.course_id
            WHERE f.payment_id = $1
            "#,
        )
        .bind(payment_id.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch bill")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No payment found for this bill")))
    }

    /// Completed payments inside the requested range, with a per-day breakdown.
    #[instrument(skip(db))]
    pub async fn get_earnings(db: &PgPool, query: EarningsQuery) -> Result<EarningsReport, AppError> {
        let (start_date, end_date) = query
            .range()
            .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;

        let (total_earnings, total_payments): (f64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount_paid), 0)::float8, COUNT(*)
            FROM fees
            WHERE status = $1 AND payment_date BETWEEN $2 AND $3
            "#,
        )
        .bind(PaymentStatus::Completed)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(db)
        .await
        .context("Failed to sum earnings")
        .map_err(AppError::database)?;

        let daily = sqlx::query_as::<_, DailyEarning>(
            r#"
            SELECT (payment_date AT TIME ZONE 'UTC')::date AS date,
                   SUM(amount_paid)::float8 AS total,
                   COUNT(*) AS count
            FROM fees
            WHERE status = $1 AND payment_date BETWEEN $2 AND $3
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(PaymentStatus::Completed)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(db)
        .await
        .context("Failed to fetch daily earnings")
        .map_err(AppError::database)?;

        Ok(EarningsReport {
            start_date,
            end_date,
            total_earnings,
            total_payments,
            daily,
        })
    }

    #[instrument(skip(db))]
    pub async fn total_earnings(db: &PgPool) -> Result<f64, AppError> {
        sqlx::query_scalar("SELECT COALESCE(SUM(amount_paid), 0)::float8 FROM fees WHERE status = $1")
            .bind(PaymentStatus::Completed)
            .fetch_one(db)
            .await
            .context("Failed to sum earnings")
            .map_err(AppError::database)
    }

    /// Record a payment taken at the office. The fee row is `Completed`
    /// immediately and the balance moves in the same transaction.
    #[instrument(skip(db, email_config, dto), fields(unique_id = %dto.unique_id, amount = dto.amount))]
    pub async fn record_offline_payment(
        db: &PgPool,
        email_config: &EmailConfig,
        dto: OfflinePaymentDto,
    ) -> Result<Fee, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = Self::lock_payable_student(&mut tx, &dto.unique_id).await?;
        let reserved = Self::pending_online_total(&mut tx, student.id).await?;
        ensure_within_balance(dto.amount, student.amount_due, reserved)?;

        let amount_due = remaining_due(student.amount_due, dto.amount)
            .ok_or_else(|| overpayment(&student, dto.amount))?;

        let fee = sqlx::query_as::<_, Fee>(
            r#"
            INSERT INTO fees (student_id, unique_id, amount_paid, total_fee, due_fee,
                              payment_type, payment_method, payment_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(student.id)
        .bind(&student.unique_id)
        .bind(dto.amount)
        .bind(student.course_fee)
        .bind(amount_due)
        .bind(dto.payment_type.trim())
        .bind(dto.payment_method.trim())
        .bind(generate_reference(OFFLINE_REFERENCE_PREFIX))
        .bind(PaymentStatus::Completed)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to record payment")
        .map_err(AppError::database)?;

        let student = Self::apply_payment(&mut tx, &student, dto.amount).await?;

        tx.commit()
            .await
            .context("Failed to commit payment")
            .map_err(AppError::database)?;

        track_payment_recorded(&fee.payment_method, fee.status.as_str());
        track_payment_amount(fee.amount_paid);
        Self::send_payment_mail(email_config, &student, &fee);

        Ok(fee)
    }

    /// Open a gateway order and record it as a `Pending` fee.
    ///
    /// The pending fee is written before the gateway is called so that
    /// concurrent orders for the same student see each other's amounts.
    #[instrument(skip(db, gateway, payment_config, dto), fields(unique_id = %dto.unique_id, amount = dto.amount))]
    pub async fn create_order(
        db: &PgPool,
        gateway: &dyn PaymentGateway,
        payment_config: &PaymentConfig,
        dto: CreateOrderDto,
    ) -> Result<OrderResponse, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = Self::lock_payable_student(&mut tx, &dto.unique_id).await?;
        let reserved = Self::pending_online_total(&mut tx, student.id).await?;
        ensure_within_balance(dto.amount, student.amount_due, reserved)?;

        let due_fee = remaining_due(student.amount_due, dto.amount)
            .ok_or_else(|| overpayment(&student, dto.amount))?;
        let order_id = generate_order_id();

        let fee = sqlx::query_as::<_, Fee>(
            r#"
            INSERT INTO fees (student_id, unique_id, amount_paid, total_fee, due_fee,
                              payment_type, payment_method, payment_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(student.id)
        .bind(&student.unique_id)
        .bind(dto.amount)
        .bind(student.course_fee)
        .bind(due_fee)
        .bind(dto.payment_type.trim())
        .bind(ONLINE_PAYMENT_METHOD)
        .bind(&order_id)
        .bind(PaymentStatus::Pending)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to record pending payment")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit pending payment")
            .map_err(AppError::database)?;

        let request = OrderRequest {
            order_id,
            amount: dto.amount,
            currency: payment_config.currency.clone(),
            customer: CustomerDetails {
                customer_id: student.unique_id.clone(),
                customer_name: dto
                    .customer_name
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| student.full_name()),
                customer_email: dto
                    .customer_email
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| student.email.clone()),
                customer_phone: dto
                    .customer_phone
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| student.phone.clone()),
            },
            note: Some(dto.payment_type.clone()),
        };

        let order = match gateway.create_order(&request).await {
            Ok(order) => order,
            Err(e) => {
                Self::release_order(db, &fee).await;
                return Err(e.into_app_error());
            }
        };

        let Some(payment_session_id) = order.payment_session_id.clone() else {
            Self::release_order(db, &fee).await;
            return Err(AppError::bad_gateway(anyhow::anyhow!(
                "Payment gateway did not return a payment session"
            )));
        };

        track_payment_recorded(ONLINE_PAYMENT_METHOD, fee.status.as_str());

        Ok(OrderResponse {
            hash: payment_hash(
                &fee.payment_id,
                &format_amount(dto.amount),
                &payment_config.client_secret,
            ),
            payment_session_id,
            order_id: fee.payment_id.clone(),
            gateway_response: order.raw,
            fee,
        })
    }

    /// Ask the gateway for the order status and settle the pending fee.
    #[instrument(skip(db, gateway, email_config))]
    pub async fn verify_order(
        db: &PgPool,
        gateway: &dyn PaymentGateway,
        email_config: &EmailConfig,
        order_id: &str,
    ) -> Result<VerifyOrderResponse, AppError> {
        let order_id = order_id.trim();
        let fee = Self::get_fee_by_payment_id(db, order_id).await?;

        let order = gateway
            .fetch_order(order_id)
            .await
            .map_err(|e| e.into_app_error())?;
        let target = PaymentStatus::from_gateway(&order.order_status);

        if fee.status.is_final() || !target.is_final() {
            track_payment_reconciliation("unchanged");
            return Ok(VerifyOrderResponse {
                order_id: order.order_id,
                gateway_status: order.order_status,
                fee_status: fee.status,
                applied: false,
                fee,
            });
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let settled = sqlx::query_as::<_, Fee>(
            r#"
            UPDATE fees SET status = $2, updated_at = NOW()
            WHERE payment_id = $1 AND status = 'Pending'
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(target)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to update payment status")
        .map_err(AppError::database)?;

        let Some(mut settled) = settled else {
            // Settled concurrently by another verification.
            tx.rollback()
                .await
                .context("Failed to roll back")
                .map_err(AppError::database)?;
            let current = Self::get_fee_by_payment_id(db, order_id).await?;
            track_payment_reconciliation("unchanged");
            return Ok(VerifyOrderResponse {
                order_id: order.order_id,
                gateway_status: order.order_status,
                fee_status: current.status,
                applied: false,
                fee: current,
            });
        };

        let mut student = None;
        if target == PaymentStatus::Completed {
            let locked = Self::lock_student_by_id(&mut tx, settled.student_id).await?;
            let updated = Self::apply_payment(&mut tx, &locked, settled.amount_paid).await?;

            settled = sqlx::query_as::<_, Fee>(
                "UPDATE fees SET due_fee = $2 WHERE id = $1 RETURNING *",
            )
            .bind(settled.id)
            .bind(updated.amount_due)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to update payment balance")
            .map_err(AppError::database)?;

            student = Some(updated);
        }

        tx.commit()
            .await
            .context("Failed to commit payment verification")
            .map_err(AppError::database)?;

        track_payment_reconciliation(settled.status.as_str());
        if let Some(student) = student {
            track_payment_amount(settled.amount_paid);
            Self::send_payment_mail(email_config, &student, &settled);
        }

        Ok(VerifyOrderResponse {
            order_id: order.order_id,
            gateway_status: order.order_status,
            fee_status: settled.status,
            applied: true,
            fee: settled,
        })
    }

    async fn get_fee_by_payment_id(db: &PgPool, payment_id: &str) -> Result<Fee, AppError> {
        sqlx::query_as::<_, Fee>("SELECT * FROM fees WHERE payment_id = $1")
            .bind(payment_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch payment")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Payment not found")))
    }

    async fn lock_payable_student(
        tx: &mut Transaction<'_, Postgres>,
        unique_id: &str,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE unique_id = $1 FOR UPDATE",
        )
        .bind(unique_id.trim())
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to lock student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        ensure_payable(&student)?;
        Ok(student)
    }

    /// Sum of online orders that may still settle against this student.
    async fn pending_online_total(
        tx: &mut Transaction<'_, Postgres>,
        student_id: uuid::Uuid,
    ) -> Result<f64, AppError> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_paid), 0)::float8
            FROM fees
            WHERE student_id = $1 AND status = $2
            "#,
        )
        .bind(student_id)
        .bind(PaymentStatus::Pending)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to sum pending payments")
        .map_err(AppError::database)
    }

    /// Drop the pending fee of an order the gateway never opened.
    async fn release_order(db: &PgPool, fee: &Fee) {
        let result = sqlx::query("DELETE FROM fees WHERE id = $1 AND status = $2")
            .bind(fee.id)
            .bind(PaymentStatus::Pending)
            .execute(db)
            .await;

        if let Err(e) = result {
            tracing::error!(error = %e, payment_id = %fee.payment_id, "Failed to release pending order");
        }
    }

    async fn lock_student_by_id(
        tx: &mut Transaction<'_, Postgres>,
        student_id: uuid::Uuid,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1 FOR UPDATE")
            .bind(student_id)
            .fetch_one(&mut **tx)
            .await
            .context("Failed to lock student")
            .map_err(AppError::database)
    }

    async fn apply_payment(
        tx: &mut Transaction<'_, Postgres>,
        student: &Student,
        amount: f64,
    ) -> Result<Student, AppError> {
        let amount_due =
            remaining_due(student.amount_due, amount).ok_or_else(|| overpayment(student, amount))?;

        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET amount_paid = amount_paid + $2, amount_due = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(student.id)
        .bind(amount)
        .bind(amount_due)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to update student balance")
        .map_err(AppError::database)
    }

    fn send_payment_mail(email_config: &EmailConfig, student: &Student, fee: &Fee) {
        let mail = Mail::PaymentConfirmation(PaymentMail {
            student_name: student.full_name(),
            unique_id: student.unique_id.clone(),
            payment_id: fee.payment_id.clone(),
            amount_paid: fee.amount_paid,
            amount_due: student.amount_due,
            payment_date: fee.payment_date,
            payment_method: fee.payment_method.clone(),
        });
        EmailService::new(email_config.clone()).send_in_background(student.email.clone(), mail);
    }
}

/// Checks `amount` against the balance that is not already held by pending
/// online orders.
fn ensure_within_balance(amount: f64, amount_due: f64, reserved: f64) -> Result<(), AppError> {
    validate_payment_amount(amount, amount_due)
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;

    let available = amount_due - reserved;
    if amount > available + AMOUNT_EPSILON {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Amount {} exceeds the balance of {} left after pending online payments of {}",
            format_amount(amount),
            format_amount(available.max(0.0)),
            format_amount(reserved)
        )));
    }
    Ok(())
}

/// A settlement larger than the balance is refused and left for an admin
/// to reconcile; the balance is never clamped.
fn overpayment(student: &Student, amount: f64) -> AppError {
    tracing::error!(
        unique_id = %student.unique_id,
        amount,
        amount_due = student.amount_due,
        "Payment exceeds the outstanding balance"
    );
    AppError::conflict(anyhow::anyhow!(
        "Payment of {} exceeds the outstanding balance of {}",
        format_amount(amount),
        format_amount(student.amount_due)
    ))
}

fn ensure_payable(student: &Student) -> Result<(), AppError> {
    if student.admission_status != AdmissionStatus::Accepted {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Fees can only be paid once the admission is accepted"
        )));
    }
    Ok(())
}
