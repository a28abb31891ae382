//! Controllers HTTP: uno por recurso del API

pub mod auth_controller;
pub mod company_controller;
pub mod driver_controller;
pub mod job_card_controller;
pub mod role_transition_controller;
pub mod truck_controller;
pub mod user_controller;
