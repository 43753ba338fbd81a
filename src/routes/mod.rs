pub mod car_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer_for;
use crate::state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer_for(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/cars", car_routes::create_car_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de salud simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "car-registry",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
