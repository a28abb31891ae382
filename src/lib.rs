//! Backend de gestión de taller de reparación de camiones
//!
//! API REST con usuarios por rol, empresas con perfil en tres estados,
//! conductores, camiones y job cards de reparación. El flujo central
//! es la transición de rol del usuario general a los roles de negocio.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
