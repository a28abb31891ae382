use axum::{routing::get, Router};

use crate::controllers::driver_controller;
use crate::state::AppState;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(driver_controller::get_drivers).post(driver_controller::create_driver),
        )
        .route(
            "/company/:company_id",
            get(driver_controller::get_company_drivers),
        )
        .route(
            "/:id",
            get(driver_controller::get_driver_by_id)
                .put(driver_controller::update_driver)
                .delete(driver_controller::delete_driver),
        )
}
