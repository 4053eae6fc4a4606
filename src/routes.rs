// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, materials, staff, student},
    state::AppState,
    utils::jwt::{auth_middleware, staff_middleware, student_middleware},
};

/// Assembles the main application router.
///
/// * Merges the role-gated sub-routers (staff, student, shared).
/// * Applies global middleware (Trace, CORS, body limit).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Any authenticated account; per-resource checks live in the handlers.
    let shared_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/get_test/{id}", get(student::get_test))
        .route("/get_result/{id}", get(student::get_result))
        .route("/materials", get(materials::list_materials))
        .route(
            "/material/download/{id}",
            get(materials::download_material),
        );

    let student_routes = Router::new()
        .route("/available_tests", get(student::available_tests))
        .route("/submit_test", post(student::submit_test))
        .route("/test_history", get(student::test_history))
        .route_layer(middleware::from_fn(student_middleware));

    let staff_routes = Router::new()
        .route("/upload", post(staff::upload))
        .route("/save_test", post(staff::save_test))
        .route("/update_test", post(staff::update_test))
        .route("/delete_test/{id}", post(staff::delete_test))
        .route("/staff_tests", get(staff::staff_tests))
        .route("/student_results", get(staff::student_results))
        .route("/upload_material", post(materials::upload_material))
        .route_layer(middleware::from_fn(staff_middleware));

    let protected = Router::new()
        .merge(shared_routes)
        .merge(student_routes)
        .merge(staff_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/login", post(auth::login))
        .merge(protected)
        // PDF uploads up to 16MB.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
