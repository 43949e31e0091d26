use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::admissions::router::init_admissions_router;
use crate::modules::albums::router::init_albums_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::fees::router::init_fees_router;
use crate::modules::images::router::init_images_router;
use crate::modules::stats::router::init_stats_router;
use crate::modules::students::router::init_students_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::modules::testimonials::router::init_testimonials_router;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use campus_config::MediaBackend;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

/// Room for the text fields of a multipart form on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", init_auth_router(&state))
        .nest("/courses", init_courses_router())
        .nest("/teachers", init_teachers_router())
        .nest("/admissions", init_admissions_router())
        .nest("/students", init_students_router(&state))
        .nest("/fees", init_fees_router())
        .nest("/albums", init_albums_router())
        .nest("/images", init_images_router())
        .nest("/testimonials", init_testimonials_router())
        .nest("/stats", init_stats_router(&state));

    let api = match state
        .rate_limit_config
        .enabled
        .then(|| state.rate_limit_config.general_governor_config())
        .flatten()
    {
        Some(config) => api.layer(GovernorLayer::new(config)),
        None => api,
    };

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api);

    let router = match state.media_config.backend {
        MediaBackend::Local => {
            router.nest_service("/uploads", ServeDir::new(&state.media_config.upload_dir))
        }
        MediaBackend::Cloudinary => router,
    };

    router
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(
            state.media_config.max_upload_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
