//! campus-api library - Academic records HTTP service
//!
//! Serves the student/faculty/admin dashboards: roster CRUD, teaching
//! assignments with their denormalized faculty projection, cohort-scoped
//! queries, and an SSE push channel for change notifications.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod projection;
pub mod sse;

use sse::ChangeBroadcaster;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Change-event fanout to connected dashboards
    pub broadcaster: ChangeBroadcaster,
}

impl AppState {
    /// Create new application state with a fresh broadcaster
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            broadcaster: ChangeBroadcaster::new(100),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(api::health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Dashboard push channel
                .route("/stream", get(api::stream))
                // Student roster
                .route("/students", get(api::list_students).post(api::register_student))
                .route(
                    "/students/:id",
                    get(api::get_student)
                        .put(api::update_student)
                        .delete(api::delete_student),
                )
                // Faculty
                .route("/faculty/teaching", get(api::teaching_faculty))
                .route("/faculty", get(api::list_faculty).post(api::register_faculty))
                .route(
                    "/faculty/:id",
                    get(api::get_faculty)
                        .put(api::update_faculty)
                        .delete(api::delete_faculty),
                )
                .route("/faculty/:id/students", get(api::faculty_students))
                // Teaching assignments
                .route("/assignments", post(api::create_assignment))
                .route("/assignments/faculty/:id", get(api::faculty_assignments))
                .route("/assignments/student", get(api::student_assignments))
                .route(
                    "/assignments/:id",
                    put(api::update_assignment).delete(api::delete_assignment),
                )
                // Administrative operations
                .route("/admin/resync-assignments", post(api::resync_assignments)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
