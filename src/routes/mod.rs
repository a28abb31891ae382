//! Composición del router de la aplicación

pub mod auth_routes;
pub mod company_routes;
pub mod driver_routes;
pub mod job_card_routes;
pub mod role_transition_routes;
pub mod truck_routes;
pub mod user_routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::json;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "repair_shop_backend",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Router completo: rutas públicas de auth y rutas protegidas por JWT
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/users", user_routes::create_user_router())
        .nest("/api/companies", company_routes::create_company_router(state.clone()))
        .nest(
            "/api/role-transition",
            role_transition_routes::create_role_transition_router(),
        )
        .nest("/api/drivers", driver_routes::create_driver_router())
        .nest("/api/trucks", truck_routes::create_truck_router())
        .nest("/api/jobcard", job_card_routes::create_job_card_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes::create_auth_router(state.clone()))
        .merge(protected)
        .with_state(state)
}
