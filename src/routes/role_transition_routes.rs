use axum::{routing::post, Router};

use crate::controllers::role_transition_controller;
use crate::state::AppState;

pub fn create_role_transition_router() -> Router<AppState> {
    Router::new().route("/", post(role_transition_controller::transition_role))
}
