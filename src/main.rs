use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use repair_shop_backend::config::environment::EnvironmentConfig;
use repair_shop_backend::database;
use repair_shop_backend::middleware::cors::cors_middleware;
use repair_shop_backend::routes;
use repair_shop_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Repair Shop Backend - Gestión de taller de camiones");
    info!("======================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = AppState::new(pool, config);

    let app = routes::create_router(state).layer(cors_middleware());

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🔑 Auth:");
    info!("   POST /api/auth/register - Registro de usuario");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/password-reset/request - Solicitar código de reset");
    info!("   POST /api/auth/password-reset/verify - Verificar código y cambiar contraseña");
    info!("🔄 Role transition:");
    info!("   POST /api/role-transition - Transición de rol del usuario");
    info!("🏢 Companies:");
    info!("   POST /api/companies - Crear empresa");
    info!("   PUT  /api/companies/:id/complete-profile - Completar perfil");
    info!("   PUT  /api/companies/:id/add-associations - Asociar conductores y camiones");
    info!("🚚 Drivers:");
    info!("   GET  /api/drivers/company/:companyId - Conductores de una empresa");
    info!("🚛 Trucks:");
    info!("   PATCH /api/trucks/:id/repair-status - Registrar hito de reparación");
    info!("📋 Job cards:");
    info!("   GET  /api/jobcard?status=in-progress - Listado filtrado");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Apagado limpio con Ctrl+C o SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("no se pudo instalar el handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("no se pudo instalar el handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Señal de apagado recibida, cerrando el servidor");
}
