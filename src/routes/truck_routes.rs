use axum::{
    routing::{get, patch},
    Router,
};

use crate::controllers::truck_controller;
use crate::state::AppState;

pub fn create_truck_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(truck_controller::get_trucks).post(truck_controller::create_truck),
        )
        .route(
            "/:id",
            get(truck_controller::get_truck_by_id)
                .put(truck_controller::update_truck)
                .delete(truck_controller::delete_truck),
        )
        .route(
            "/:id/repair-status",
            patch(truck_controller::update_repair_status),
        )
}
