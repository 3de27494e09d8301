//! API route definitions

use super::graph_handlers;
use super::handlers;
use super::media_handlers;
use super::user_handlers;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    // Internal-ID flavoured routes
    let neo4j = Router::new()
        .route("/nodes", post(graph_handlers::create_node))
        .route("/nodes/{id}", get(graph_handlers::get_node))
        .route(
            "/relationships",
            post(graph_handlers::create_relationship_by_id),
        )
        .route("/graph", get(graph_handlers::get_graph))
        .route("/test-connection", get(graph_handlers::test_connection))
        .route("/users", get(user_handlers::list_users));

    Router::new()
        .route("/", get(handlers::root))
        // ====================================================================
        // Nodes & relationships (uiNodeId flavoured)
        // ====================================================================
        .route("/api/nodes", post(graph_handlers::create_node))
        .route("/api/nodes/{id}", get(graph_handlers::get_node))
        .route(
            "/api/relationships",
            post(graph_handlers::create_relationship_by_ui_id),
        )
        // ====================================================================
        // Users
        // ====================================================================
        .route("/api/users/{email}", get(user_handlers::get_user))
        .route(
            "/api/smart-goals/{email}",
            get(user_handlers::get_smart_goals),
        )
        .route("/api/metrics/{email}", get(user_handlers::get_metrics))
        // ====================================================================
        // Media
        // ====================================================================
        .route(
            "/upload-video",
            post(media_handlers::upload_video).layer(upload_limit),
        )
        .nest("/neo4j", neo4j)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Credentialed CORS for the configured origins; methods and headers are
/// mirrored from the preflight. A `*` entry mirrors the request origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let mut allowed = Vec::new();
    for origin in origins {
        match HeaderValue::from_str(origin.trim().trim_end_matches('/')) {
            Ok(value) => allowed.push(value),
            Err(_) => tracing::warn!("Ignoring invalid CORS origin {:?}", origin),
        }
    }
    layer.allow_origin(AllowOrigin::list(allowed))
}
