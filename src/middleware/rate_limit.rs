//! Middleware de Rate Limiting
//!
//! Limita las solicitudes de reset de contraseña por IP para
//! prevenir abuso del endpoint.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Contador de requests por IP dentro de la ventana
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting de reset de contraseña
#[derive(Clone)]
pub struct ResetRateLimiter {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
}

impl ResetRateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Verificar si una IP ha excedido el límite dentro de la ventana
    pub async fn check_rate_limit(
        &self,
        ip: &str,
        max_requests: u32,
        window: Duration,
    ) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Limpiar entradas expiradas
        requests.retain(|_, info| now.duration_since(info.window_start) < window);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if now.duration_since(info.window_start) >= window {
            info.requests = 1;
            info.window_start = now;
            return Ok(());
        }

        if info.requests >= max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

impl Default for ResetRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extraer la IP del cliente de los headers del proxy
fn client_ip(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .split(',')
        .next()
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Middleware de rate limiting para los endpoints de reset de contraseña
pub async fn reset_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    state
        .reset_limiter
        .check_rate_limit(
            &ip,
            state.config.rate_limit_requests,
            Duration::from_secs(state.config.rate_limit_window as u64),
        )
        .await?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bloquea_al_sexto_intento_en_la_ventana() {
        let limiter = ResetRateLimiter::new();
        let window = Duration::from_secs(86400);

        for _ in 0..5 {
            assert!(limiter.check_rate_limit("1.2.3.4", 5, window).await.is_ok());
        }
        assert!(limiter.check_rate_limit("1.2.3.4", 5, window).await.is_err());

        // Otra IP no se ve afectada
        assert!(limiter.check_rate_limit("5.6.7.8", 5, window).await.is_ok());
    }

    #[tokio::test]
    async fn la_ventana_expirada_reinicia_el_contador() {
        let limiter = ResetRateLimiter::new();
        let window = Duration::from_millis(10);

        for _ in 0..5 {
            assert!(limiter.check_rate_limit("1.2.3.4", 5, window).await.is_ok());
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.check_rate_limit("1.2.3.4", 5, window).await.is_ok());
    }
}
