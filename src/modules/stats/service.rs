use campus_core::AppError;
use campus_models::{AdmissionStatus, DashboardStats};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::admissions::service::AdmissionService;
use crate::modules::courses::service::CourseService;
use crate::modules::fees::service::FeeService;
use crate::modules::students::service::StudentService;
use crate::modules::teachers::service::TeacherService;

pub struct StatsService;

impl StatsService {
    #[instrument(skip(db))]
    pub async fn get_dashboard_stats(db: &PgPool) -> Result<DashboardStats, AppError> {
        let (total_courses, total_teachers, total_students, pending_admissions, total_earnings) =
            tokio::try_join!(
                CourseService::count_courses(db),
                TeacherService::count_teachers(db),
                StudentService::count_students(db),
                AdmissionService::count_by_status(db, AdmissionStatus::Pending),
                FeeService::total_earnings(db),
            )?;

        Ok(DashboardStats {
            total_courses,
            total_teachers,
            total_students,
            pending_admissions,
            total_earnings,
        })
    }
}
