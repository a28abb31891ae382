use axum::{routing::get, Router};

use crate::controllers::user_controller;
use crate::state::AppState;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(user_controller::get_users))
        .route(
            "/:id",
            get(user_controller::get_user_by_id)
                .put(user_controller::update_user)
                .delete(user_controller::delete_user),
        )
}
