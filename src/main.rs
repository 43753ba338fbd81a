use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use dotenvy::dotenv;

use car_registry::config::{database, DatabaseConfig, EnvironmentConfig};
use car_registry::repositories::{CarRepository, InMemoryCarRepository, PgCarRepository};
use car_registry::schema::{CarSchema, SchemaConfig};
use car_registry::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚗 Car Registry API");
    info!("================================================");

    let schema_config = SchemaConfig::from_env()?;
    info!(
        "📋 Esquema: apertura {}, año mínimo {}, {} colores",
        schema_config.store_opened_on,
        schema_config.min_year_manufacture,
        schema_config.colors.len()
    );

    // Inicializar persistencia
    let repository: Arc<dyn CarRepository> = match &config.database_url {
        Some(url) => {
            let pool = DatabaseConfig::from_url(url)
                .create_pool()
                .await
                .context("Error conectando a la base de datos")?;
            database::ensure_schema(&pool)
                .await
                .context("Error creando la tabla cars")?;
            info!("✅ PostgreSQL conectado exitosamente");
            Arc::new(PgCarRepository::new(pool))
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando repositorio en memoria");
            Arc::new(InMemoryCarRepository::new())
        }
    };

    let app_state = AppState::new(config.clone(), CarSchema::new(schema_config), repository);
    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   POST /api/cars - Crear car");
    info!("   GET  /api/cars - Listar cars");
    info!("   GET  /api/cars/:id - Obtener car");
    info!("   PUT  /api/cars/:id - Actualizar car");
    info!("   POST /api/cars/validate - Validar un campo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
