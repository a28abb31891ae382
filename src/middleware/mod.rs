//! Middleware HTTP: autenticación, CORS, rate limiting y el gate
//! de perfil completo de empresa

pub mod auth;
pub mod complete_profile;
pub mod cors;
pub mod rate_limit;
