//! # GradeMaster HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Public Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /points` - Points for one unit
//! - `POST /evaluate` - Evaluate an ad-hoc list of graded units
//! - `GET /boundaries/{qualification}` - Boundary table of a qualification
//!
//! ## Gradebook Endpoints (HTTP Basic auth)
//!
//! - `GET /me`
//! - `GET|POST /courses`, `GET|PUT|DELETE /courses/{id}`
//! - `POST /courses/{id}/units`, `POST /courses/{id}/units/presets`,
//!   `PUT|DELETE /courses/{id}/units/{unit_id}`
//! - `GET /courses/{id}/students?search=`, `POST /courses/{id}/students`
//! - `PUT|DELETE /courses/{id}/students/{sid}`
//! - `PUT /courses/{id}/students/{sid}/grades/{unit_id}`
//! - `PUT /courses/{id}/students/{sid}/locks/{unit_id}`
//! - `GET /courses/{id}/students/{sid}/result`
//! - `POST /courses/{id}/students/{sid}/advice`
//! - `GET|POST /users`, `PUT|DELETE /users/{id}` (Superuser)

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{CurrentUser, basic_auth_header, parse_basic_auth};
pub use handlers::status_for;
pub use middleware::create_rate_limiter;
pub use types::{
    AddStudentRequest, AdviceResponse, ApiResponse, BoundariesResponse, BoundaryJson,
    EvaluateRequest, HealthResponse, PointsRequest, PointsResponse, RenameStudentRequest,
    SetGradeRequest, SetLockRequest, StudentSearchQuery,
};

use crate::advisor::Advisor;
use crate::config::ServerConfig;
use crate::error::AppError;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use grademaster_core::Gradebook;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (2 MiB).
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory gradebook.
    pub gradebook: Arc<RwLock<Gradebook>>,
    /// The advisory collaborator.
    pub advisor: Arc<Advisor>,
}

impl AppState {
    #[must_use]
    pub fn new(gradebook: Gradebook, advisor: Advisor) -> Self {
        Self {
            gradebook: Arc::new(RwLock::new(gradebook)),
            advisor: Arc::new(advisor),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins
/// - absent: localhost only
/// - otherwise: the listed origins
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|s| match s.trim().parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s.trim());
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restrictive_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();
    restrictive_cors(origins)
}

fn restrictive_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting (if enabled)
/// 4. Basic auth - gradebook routes only
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/points", post(handlers::points_handler))
        .route("/evaluate", post(handlers::evaluate_handler))
        .route(
            "/boundaries/{qualification}",
            get(handlers::boundaries_handler),
        );

    let gradebook = Router::new()
        .route("/me", get(handlers::me_handler))
        .route(
            "/users",
            get(handlers::list_users_handler).post(handlers::create_user_handler),
        )
        .route(
            "/users/{id}",
            put(handlers::update_user_handler).delete(handlers::delete_user_handler),
        )
        .route(
            "/courses",
            get(handlers::list_courses_handler).post(handlers::create_course_handler),
        )
        .route(
            "/courses/{id}",
            get(handlers::get_course_handler)
                .put(handlers::update_course_handler)
                .delete(handlers::delete_course_handler),
        )
        .route("/courses/{id}/units", post(handlers::add_unit_handler))
        .route(
            "/courses/{id}/units/presets",
            post(handlers::load_presets_handler),
        )
        .route(
            "/courses/{id}/units/{unit_id}",
            put(handlers::update_unit_handler).delete(handlers::delete_unit_handler),
        )
        .route(
            "/courses/{id}/students",
            get(handlers::list_students_handler).post(handlers::add_student_handler),
        )
        .route(
            "/courses/{id}/students/{sid}",
            put(handlers::rename_student_handler).delete(handlers::delete_student_handler),
        )
        .route(
            "/courses/{id}/students/{sid}/grades/{unit_id}",
            put(handlers::set_grade_handler),
        )
        .route(
            "/courses/{id}/students/{sid}/locks/{unit_id}",
            put(handlers::set_lock_handler),
        )
        .route(
            "/courses/{id}/students/{sid}/result",
            get(handlers::student_result_handler),
        )
        .route(
            "/courses/{id}/students/{sid}/advice",
            post(handlers::advice_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::basic_auth_middleware,
        ));

    let mut router = public.merge(gradebook);

    if let Some(limiter) = create_rate_limiter(config.rate_limit) {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(config.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<(), AppError> {
    let addr = config.bind_addr();
    let router = create_router(state, config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("GradeMaster HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
