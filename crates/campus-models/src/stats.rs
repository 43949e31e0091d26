use serde::Serialize;
use utoipa::ToSchema;

/// Admin dashboard counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_courses: i64,
    pub total_teachers: i64,
    /// Accepted admissions
    pub total_students: i64,
    pub pending_admissions: i64,
    /// Sum of all `Completed` payments
    pub total_earnings: f64,
}
