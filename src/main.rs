use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dealership_manager::config::{EnvironmentConfig, StorageBackend};
use dealership_manager::repositories::{MemoryStore, PgStore, Store};
use dealership_manager::routes::{create_app, ENDPOINTS};
use dealership_manager::services::IdentityVerifier;
use dealership_manager::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    info!("🚗 Dealership Manager - API de concesionarios");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;

    // Inicializar almacenamiento
    let store: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .context("DATABASE_URL must be set")?;
            let pool = match database.create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            info!("✅ PostgreSQL conectado");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            info!("🧪 Almacenamiento en memoria (los datos se pierden al reiniciar)");
            Arc::new(MemoryStore::new())
        }
    };

    let identity = IdentityVerifier::from_config(&config.identity).context("invalid identity provider key")?;

    let address = config.server_address();
    let state = AppState::new(store.clone(), identity, config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    info!("🌐 Servidor iniciando en http://{}", address);
    info!("🔍 Endpoints disponibles:");
    for (method, description) in ENDPOINTS {
        info!("   {} {}", method, description);
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    store.close().await;
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
