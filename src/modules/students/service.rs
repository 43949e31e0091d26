use anyhow::Context;
use campus_core::AppError;
use sqlx::PgPool;
use tracing::instrument;

use super::model::{
    AdmissionStatus, PaginatedStudentsResponse, PaginationMeta, PaginationParams,
    StudentFilterParams, StudentWithCourse, UpdateStudentDto,
};
use crate::modules::admissions::model::STUDENT_WITH_COURSE_SELECT;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM students
            WHERE admission_status = 'accepted' AND ($1::uuid IS NULL OR course_id = $1)
            "#,
        )
        .bind(filters.course_id)
        .fetch_one(db)
        .await
        .context("Failed to count students")
        .map_err(AppError::database)?;

        let sql = format!(
            r#"{}
            WHERE s.admission_status = 'accepted' AND ($1::uuid IS NULL OR s.course_id = $1)
            ORDER BY s.first_name ASC, s.last_name ASC
            LIMIT $2 OFFSET $3
            "#,
            STUDENT_WITH_COURSE_SELECT
        );

        let data = sqlx::query_as::<_, StudentWithCourse>(&sql)
            .bind(filters.course_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok(PaginatedStudentsResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, unique_id: &str) -> Result<StudentWithCourse, AppError> {
        let sql = format!(
            "{} WHERE s.unique_id = $1 AND s.admission_status = 'accepted'",
            STUDENT_WITH_COURSE_SELECT
        );

        sqlx::query_as::<_, StudentWithCourse>(&sql)
            .bind(unique_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        unique_id: &str,
        dto: UpdateStudentDto,
    ) -> Result<StudentWithCourse, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No update data provided"
            )));
        }

        let current = Self::get_student(db, unique_id).await?;

        if let Some(semester) = dto.semester {
            let total_semesters: i32 =
                sqlx::query_scalar("SELECT total_semesters FROM courses WHERE id = $1")
                    .bind(current.student.course_id)
                    .fetch_one(db)
                    .await
                    .context("Failed to fetch course")
                    .map_err(AppError::database)?;

            if semester > total_semesters {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Semester must be between 1 and {}",
                    total_semesters
                )));
            }
        }

        sqlx::query(
            r#"
            UPDATE students
            SET email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                semester = COALESCE($5, semester),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(current.student.id)
        .bind(dto.email.map(|e| e.trim().to_lowercase()))
        .bind(dto.phone.map(|p| p.trim().to_string()))
        .bind(dto.address.map(|a| a.trim().to_string()))
        .bind(dto.semester)
        .execute(db)
        .await
        .context("Failed to update student")
        .map_err(AppError::database)?;

        Self::get_student(db, unique_id).await
    }

    /// Delete an enrolled student together with their fee history.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, unique_id: &str) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student_id: Option<uuid::Uuid> = sqlx::query_scalar(
            "SELECT id FROM students WHERE unique_id = $1 AND admission_status = 'accepted' FOR UPDATE",
        )
        .bind(unique_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock student")
        .map_err(AppError::database)?;

        let Some(student_id) = student_id else {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        };

        let fees = sqlx::query("DELETE FROM fees WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete fee records")
            .map_err(AppError::database)?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit student deletion")
            .map_err(AppError::database)?;

        tracing::info!(fee_records = fees.rows_affected(), "Deleted student");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn count_students(db: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE admission_status = $1")
            .bind(AdmissionStatus::Accepted)
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)
    }
}
