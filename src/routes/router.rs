use crate::auth::basic_auth_middleware;
use crate::config::CorsConfig;
use crate::middleware::request_id_middleware;
use axum::middleware;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::admin_handlers;
use super::health;
use super::url_handlers;
use super::AppState;

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Create application router
pub fn create_router(
    state: Arc<AppState>,
    cors: &CorsConfig,
    max_body_bytes: usize,
) -> axum::Router {
    // Public endpoints
    let api_routes = axum::Router::new()
        .route("/shorten", post(url_handlers::shorten_url))
        .route("/{code}", get(url_handlers::resolve_url));

    // Admin endpoints behind HTTP Basic auth
    let admin_routes = axum::Router::new()
        .route("/all", get(admin_handlers::list_urls))
        .route(
            "/{code}",
            put(admin_handlers::update_url).delete(admin_handlers::delete_url),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            basic_auth_middleware,
        ));

    axum::Router::new()
        .nest("/api", api_routes)
        .nest("/admin", admin_routes)
        .route("/_health", get(health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(cors_layer(cors)),
        )
        .with_state(state)
}
