use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use campus_core::{PaginationMeta, PaginationParams};
use campus_models::{
    AdmissionStatus, Album, AlbumDeletionSummary, AlbumImage, AlbumWithImages, Bill,
    BulkDeleteImagesDto, BulkDeleteSummary, Course, CreateAdmissionDto, CreateAlbumDto,
    CreateCourseDto, CreateImageDto, CreateOrderDto, CreateTeacherDto, CreateTestimonialDto,
    DailyEarning, DashboardStats, EarningsReport, Fee, Image, ImageDeletionSummary,
    ImageWithRelations, LoginRequest, LoginResponse, MessageResponse, OfflinePaymentDto,
    OrderResponse, PaginatedCoursesResponse, PaginatedStudentsResponse, PaymentStatus, PublicUser,
    RegisterRequest, Student, StudentFeeInfo, StudentWithCourse, Teacher, Testimonial,
    UpdateAdmissionStatusDto, UpdateCourseDto, UpdateStudentDto, UpdateTeacherDto, UserRole,
    VerifyOrderDto, VerifyOrderResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_current_user,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::admissions::controller::create_admission,
        crate::modules::admissions::controller::get_admissions,
        crate::modules::admissions::controller::get_admission,
        crate::modules::admissions::controller::update_admission_status,
        crate::modules::admissions::controller::delete_admission,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::fees::controller::get_student_fee_info,
        crate::modules::fees::controller::get_fee_history,
        crate::modules::fees::controller::get_bill,
        crate::modules::fees::controller::get_earnings,
        crate::modules::fees::controller::record_offline_payment,
        crate::modules::fees::controller::create_order,
        crate::modules::fees::controller::verify_order,
        crate::modules::albums::controller::create_album,
        crate::modules::albums::controller::get_albums,
        crate::modules::albums::controller::get_album,
        crate::modules::albums::controller::delete_album,
        crate::modules::images::controller::create_image,
        crate::modules::images::controller::get_images,
        crate::modules::images::controller::delete_image,
        crate::modules::images::controller::bulk_delete_images,
        crate::modules::testimonials::controller::create_testimonial,
        crate::modules::testimonials::controller::get_testimonials,
        crate::modules::testimonials::controller::delete_testimonial,
        crate::modules::stats::controller::get_dashboard_stats,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            PaginationParams,
            UserRole,
            PublicUser,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            AdmissionStatus,
            Student,
            StudentWithCourse,
            CreateAdmissionDto,
            UpdateAdmissionStatusDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            PaymentStatus,
            Fee,
            StudentFeeInfo,
            OfflinePaymentDto,
            CreateOrderDto,
            OrderResponse,
            VerifyOrderDto,
            VerifyOrderResponse,
            Bill,
            DailyEarning,
            EarningsReport,
            Album,
            AlbumImage,
            AlbumWithImages,
            CreateAlbumDto,
            AlbumDeletionSummary,
            Image,
            ImageWithRelations,
            CreateImageDto,
            BulkDeleteImagesDto,
            ImageDeletionSummary,
            BulkDeleteSummary,
            Testimonial,
            CreateTestimonialDto,
            DashboardStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session endpoints"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Teachers", description = "Faculty profiles"),
        (name = "Admissions", description = "Admission applications and decisions"),
        (name = "Students", description = "Enrolled student management"),
        (name = "Fees", description = "Fee balances, payments and earnings"),
        (name = "Gallery", description = "Photo albums and images"),
        (name = "Testimonials", description = "Public testimonials"),
        (name = "Stats", description = "Admin dashboard")
    ),
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "REST API for a college website: courses, faculty, admissions, fee payments and gallery.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/courses/{id}",
            "/api/admissions/{unique_id}/status",
            "/api/fees/orders/verify",
            "/api/images/bulk-delete",
            "/api/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
