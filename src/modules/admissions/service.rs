//! Admission applications.
//!
//! Applying snapshots the course fee onto the student row so that later
//! course fee changes do not move an existing balance. Acceptance creates
//! (or links) a `student` login account in the same transaction as the
//! status change.

use anyhow::Context;
use campus_config::EmailConfig;
use campus_core::{AppError, hash_password};
use campus_models::{Course, User, UserRole};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use super::model::{
    AdmissionFilterParams, AdmissionStatus, CreateAdmissionDto, GENERATED_PASSWORD_LENGTH,
    PaginatedStudentsResponse, PaginationMeta, PaginationParams, STUDENT_WITH_COURSE_SELECT,
    Student, StudentWithCourse, UNIQUE_ID_ATTEMPTS,
};
use crate::metrics::track_admission;
use crate::utils::email::{AdmissionMail, EmailService, Mail};
use crate::utils::generate::{generate_password, generate_unique_id};

pub struct AdmissionService;

impl AdmissionService {
    #[instrument(skip(db, dto), fields(email = %dto.email, course_id = %dto.course_id))]
    pub async fn create_admission(
        db: &PgPool,
        dto: CreateAdmissionDto,
    ) -> Result<Student, AppError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(dto.course_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        if dto.semester > course.total_semesters {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Semester must be between 1 and {}",
                course.total_semesters
            )));
        }

        let email = dto.email.trim().to_lowercase();

        let duplicate: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM students
                WHERE email = $1 AND course_id = $2 AND admission_status <> 'rejected'
            )
            "#,
        )
        .bind(&email)
        .bind(course.id)
        .fetch_one(db)
        .await
        .context("Failed to check for existing admission")
        .map_err(AppError::database)?;

        if duplicate {
            return Err(AppError::conflict(anyhow::anyhow!(
                "An admission for {} already exists for this course",
                email
            )));
        }

        for attempt in 1..=UNIQUE_ID_ATTEMPTS {
            let unique_id = generate_unique_id();

            let inserted = sqlx::query_as::<_, Student>(
                r#"
                INSERT INTO students (unique_id, first_name, last_name, father_name, email, phone,
                                      date_of_birth, gender, address, course_id, semester,
                                      course_fee, amount_paid, amount_due)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, $12)
                RETURNING *
                "#,
            )
            .bind(&unique_id)
            .bind(dto.first_name.trim())
            .bind(dto.last_name.trim())
            .bind(dto.father_name.trim())
            .bind(&email)
            .bind(dto.phone.trim())
            .bind(dto.date_of_birth)
            .bind(dto.gender.to_lowercase())
            .bind(dto.address.trim())
            .bind(course.id)
            .bind(dto.semester)
            .bind(course.course_fee)
            .fetch_one(db)
            .await;

            match inserted {
                Ok(student) => {
                    track_admission("submitted");
                    return Ok(student);
                }
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    tracing::warn!(attempt, unique_id = %unique_id, "Student id collision, retrying");
                }
                Err(e) => {
                    return Err(AppError::database(
                        anyhow::Error::from(e).context("Failed to create admission"),
                    ));
                }
            }
        }

        Err(AppError::internal_error(
            "Could not allocate a unique student id".to_string(),
        ))
    }

    #[instrument(skip(db))]
    pub async fn get_admissions(
        db: &PgPool,
        filters: AdmissionFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE ($1::admission_status IS NULL OR admission_status = $1)",
        )
        .bind(filters.status)
        .fetch_one(db)
        .await
        .context("Failed to count admissions")
        .map_err(AppError::database)?;

        let sql = format!(
            r#"{}
            WHERE ($1::admission_status IS NULL OR s.admission_status = $1)
            ORDER BY s.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            STUDENT_WITH_COURSE_SELECT
        );

        let data = sqlx::query_as::<_, StudentWithCourse>(&sql)
            .bind(filters.status)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await
            .context("Failed to fetch admissions")
            .map_err(AppError::database)?;

        Ok(PaginatedStudentsResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_admission(db: &PgPool, unique_id: &str) -> Result<StudentWithCourse, AppError> {
        let sql = format!("{} WHERE s.unique_id = $1", STUDENT_WITH_COURSE_SELECT);

        sqlx::query_as::<_, StudentWithCourse>(&sql)
            .bind(unique_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch admission")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admission not found")))
    }

    /// Accept or reject a pending application.
    #[instrument(skip(db, email_config))]
    pub async fn update_status(
        db: &PgPool,
        email_config: &EmailConfig,
        unique_id: &str,
        status: AdmissionStatus,
    ) -> Result<StudentWithCourse, AppError> {
        if status == AdmissionStatus::Pending {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Status must be accepted or rejected"
            )));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE unique_id = $1 FOR UPDATE",
        )
        .bind(unique_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock admission")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admission not found")))?;

        if student.admission_status != AdmissionStatus::Pending {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Admission has already been {}",
                format!("{:?}", student.admission_status).to_lowercase()
            )));
        }

        let account = if status == AdmissionStatus::Accepted {
            Some(Self::ensure_student_account(&mut tx, &student).await?)
        } else {
            None
        };

        sqlx::query(
            r#"
            UPDATE students
            SET admission_status = $2, user_id = COALESCE($3, user_id), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(student.id)
        .bind(status)
        .bind(account.as_ref().map(|(user, _)| user.id))
        .execute(&mut *tx)
        .await
        .context("Failed to update admission status")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit admission status")
            .map_err(AppError::database)?;

        let updated = Self::get_admission(db, unique_id).await?;

        match account {
            Some((user, password)) => {
                track_admission("accepted");
                let mail = Mail::AdmissionConfirmation(AdmissionMail {
                    student_name: updated.student.full_name(),
                    unique_id: updated.student.unique_id.clone(),
                    course_name: updated.course_name.clone(),
                    login_email: user.email.clone(),
                    password: password
                        .unwrap_or_else(|| "use your existing account password".to_string()),
                });
                EmailService::new(email_config.clone()).send_in_background(user.email, mail);
            }
            None => track_admission("rejected"),
        }

        Ok(updated)
    }

    /// Returns the login account for an accepted student, creating one with
    /// a generated password when the email is not registered yet. The
    /// password is only returned for new accounts.
    async fn ensure_student_account(
        tx: &mut Transaction<'_, Postgres>,
        student: &Student,
    ) -> Result<(User, Option<String>), AppError> {
        let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&student.email)
            .fetch_optional(&mut **tx)
            .await
            .context("Failed to look up student account")
            .map_err(AppError::database)?;

        if let Some(user) = existing {
            if user.role != UserRole::User {
                return Ok((user, None));
            }

            let promoted = sqlx::query_as::<_, User>(
                "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(user.id)
            .bind(UserRole::Student)
            .fetch_one(&mut **tx)
            .await
            .context("Failed to promote account to student")
            .map_err(AppError::database)?;

            return Ok((promoted, None));
        }

        let password = generate_password(GENERATED_PASSWORD_LENGTH);
        let hashed = hash_password(&password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(student.full_name())
        .bind(&student.email)
        .bind(&hashed)
        .bind(UserRole::Student)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to create student account")
        .map_err(AppError::database)?;

        Ok((user, Some(password)))
    }

    /// Delete an application. Refused once any fee has been recorded.
    #[instrument(skip(db))]
    pub async fn delete_admission(db: &PgPool, unique_id: &str) -> Result<(), AppError> {
        let has_fees: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM fees WHERE unique_id = $1)")
                .bind(unique_id)
                .fetch_one(db)
                .await
                .context("Failed to check fee records")
                .map_err(AppError::database)?;

        if has_fees {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Admission has fee records and cannot be deleted"
            )));
        }

        let result = sqlx::query("DELETE FROM students WHERE unique_id = $1")
            .bind(unique_id)
            .execute(db)
            .await
            .context("Failed to delete admission")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Admission not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn count_by_status(db: &PgPool, status: AdmissionStatus) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE admission_status = $1")
            .bind(status)
            .fetch_one(db)
            .await
            .context("Failed to count admissions")
            .map_err(AppError::database)
    }
}
