//! Estado compartido de la aplicación
//!
//! Se pasa a través del router de Axum a handlers y middleware.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::ResetRateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub reset_limiter: ResetRateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            reset_limiter: ResetRateLimiter::new(),
        }
    }
}
