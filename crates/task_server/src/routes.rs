use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::identity;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let tasks = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity::resolve_identity,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(tasks)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
