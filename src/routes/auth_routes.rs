use axum::{
    middleware::from_fn_with_state,
    routing::post,
    Router,
};

use crate::controllers::auth_controller;
use crate::middleware::rate_limit::reset_rate_limit_middleware;
use crate::state::AppState;

/// Rutas públicas de autenticación. El reset de contraseña lleva
/// rate limiting por IP.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let reset_routes = Router::new()
        .route("/request", post(auth_controller::request_reset_code))
        .route("/verify", post(auth_controller::reset_password))
        .route_layer(from_fn_with_state(state, reset_rate_limit_middleware));

    Router::new()
        .route("/register", post(auth_controller::register))
        .route("/login", post(auth_controller::login))
        .nest("/password-reset", reset_routes)
}
