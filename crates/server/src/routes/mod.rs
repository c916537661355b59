use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;

use crate::{AppState, middleware as app_middleware};

pub mod feedback;
pub mod health;
pub mod search;

pub fn router(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(search::router())
        .merge(feedback::router())
        .with_state(state);

    Router::new()
        .nest("/api", base_routes)
        .layer(middleware::from_fn(app_middleware::request_id_middleware))
        .layer(CorsLayer::permissive())
}
