use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};

use crate::controllers::company_controller;
use crate::middleware::complete_profile::require_complete_profile;
use crate::state::AppState;

/// Rutas de empresa. Las operaciones de edición y asociación exigen
/// un perfil de empresa completo; el gate se aplica solo a esos dos
/// method routers, por eso `/:id` se registra en dos entradas.
pub fn create_company_router(state: AppState) -> Router<AppState> {
    let profile_gate = from_fn_with_state(state, require_complete_profile);

    Router::new()
        .route(
            "/",
            get(company_controller::get_companies).post(company_controller::create_company),
        )
        .route(
            "/:id/complete-profile",
            put(company_controller::complete_profile),
        )
        .route(
            "/:id/add-associations",
            put(company_controller::add_associations).layer(profile_gate.clone()),
        )
        .route(
            "/:id",
            put(company_controller::update_company).layer(profile_gate),
        )
        .route(
            "/:id",
            get(company_controller::get_company_by_id)
                .delete(company_controller::delete_company),
        )
}
