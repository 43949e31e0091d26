use anyhow::Context;
use campus_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, PaginationMeta,
    PaginationParams, UpdateCourseDto,
};

pub struct CourseService;

fn map_write_error(e: sqlx::Error, course_name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::conflict(anyhow::anyhow!(
                "Course with name '{}' already exists",
                course_name
            ));
        }
    }
    AppError::database(anyhow::Error::from(e))
}

impl CourseService {
    #[instrument(skip(db, dto), fields(course_name = %dto.course_name))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course_name = dto.course_name.trim();

        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (course_name, description, duration, course_fee, total_semesters)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(course_name)
        .bind(&dto.description)
        .bind(&dto.duration)
        .bind(dto.course_fee)
        .bind(dto.total_semesters)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, course_name))
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filters: CourseFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let search = filters.search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE ($1::text IS NULL OR course_name ILIKE $1)",
        )
        .bind(&search)
        .fetch_one(db)
        .await
        .context("Failed to count courses")
        .map_err(AppError::database)?;

        let data = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE ($1::text IS NULL OR course_name ILIKE $1)
            ORDER BY course_name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)?;

        Ok(PaginatedCoursesResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch course by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No update data provided"
            )));
        }

        let course_name = dto.course_name.as_deref().map(str::trim);

        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET course_name = COALESCE($2, course_name),
                description = COALESCE($3, description),
                duration = COALESCE($4, duration),
                course_fee = COALESCE($5, course_fee),
                total_semesters = COALESCE($6, total_semesters),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(course_name)
        .bind(&dto.description)
        .bind(&dto.duration)
        .bind(dto.course_fee)
        .bind(dto.total_semesters)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, course_name.unwrap_or_default()))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::conflict(anyhow::anyhow!(
                            "Course has students enrolled and cannot be deleted"
                        ));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn count_courses(db: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await
            .context("Failed to count courses")
            .map_err(AppError::database)
    }
}
