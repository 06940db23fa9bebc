mod accounts;
mod root;
mod weekly_routes;

use crate::state::AppState;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub fn app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignore invalid cors origin {}", origin);
                None
            }
        })
        .collect();

    let timeout = state.config.request_timeout;

    Router::new()
        .route("/", get(root::index))
        .nest("/users/{user_id}/accounts", accounts::new())
        .nest("/users/{user_id}/weekly_routes", weekly_routes::new())
        .fallback(root::handler_404)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_origin(origins)
                .allow_headers([CONTENT_TYPE]),
        )
        .with_state(state)
}
