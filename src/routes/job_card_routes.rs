use axum::{routing::get, Router};

use crate::controllers::job_card_controller;
use crate::state::AppState;

pub fn create_job_card_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(job_card_controller::get_job_cards).post(job_card_controller::create_job_card),
        )
        .route(
            "/:id",
            get(job_card_controller::get_job_card_by_id)
                .put(job_card_controller::update_job_card)
                .delete(job_card_controller::delete_job_card),
        )
}
