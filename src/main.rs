use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use bus_fleet_tracking::config::environment::EnvironmentConfig;
use bus_fleet_tracking::database;
use bus_fleet_tracking::middleware::cors::cors_middleware;
use bus_fleet_tracking::routes;
use bus_fleet_tracking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Bus Fleet Tracking - Backend de flota");
    info!("========================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::connection::run_migrations(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let cors = cors_middleware(&config);
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/session", routes::session_routes::create_session_router())
        .nest("/api/telemetry", routes::telemetry_routes::create_telemetry_router())
        .nest("/api/passenger", routes::passenger_routes::create_passenger_router())
        .nest("/api/users", routes::user_routes::create_user_router())
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/route", routes::route_routes::create_route_router())
        .nest("/api/device", routes::device_routes::create_device_router())
        .nest("/api/notification", routes::notification_routes::create_notification_router())
        .nest("/api/audit", routes::audit_routes::create_audit_router())
        .layer(cors)
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🗓️ Endpoints - Session:");
    info!("   POST /api/session/start - Iniciar sesión de viaje");
    info!("   GET  /api/session - Listar sesiones");
    info!("   GET  /api/session/:id - Obtener sesión");
    info!("   PUT  /api/session/:id - Actualizar sesión");
    info!("   DELETE /api/session/:id - Eliminar sesión");
    info!("   POST /api/session/:id/end - Terminar sesión");
    info!("   GET  /api/session/vehicle/:vehicle_id/upcoming - Próxima sesión del vehículo");
    info!("   GET  /api/session/route/:route_id/active - Sesiones activas de la ruta");
    info!("📡 Endpoints - Telemetry:");
    info!("   POST /api/telemetry/send - Registrar punto GPS");
    info!("   GET  /api/telemetry/session/:session_id - Historial de la sesión");
    info!("🧍 Endpoints - Passenger:");
    info!("   POST /api/passenger/search-buses - Buscar autobuses hacia un destino");
    info!("👥 Endpoints - Users:");
    info!("   POST /api/users/:role - Registrar usuario");
    info!("   GET  /api/users/:role - Listar usuarios por rol");
    info!("   GET  /api/users/:role/:id - Obtener usuario");
    info!("   PUT  /api/users/:role/:id - Actualizar usuario");
    info!("   DELETE /api/users/:role/:id - Eliminar usuario");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Registrar vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");
    info!("🗺️ Endpoints - Route:");
    info!("   POST /api/route - Crear ruta");
    info!("   GET  /api/route - Listar rutas");
    info!("   GET  /api/route/:id - Obtener ruta");
    info!("   PUT  /api/route/:id - Actualizar ruta");
    info!("   DELETE /api/route/:id - Eliminar ruta");
    info!("📟 Endpoints - Device:");
    info!("   POST /api/device - Registrar dispositivo");
    info!("   GET  /api/device - Listar dispositivos");
    info!("   GET  /api/device/:id - Obtener dispositivo");
    info!("   POST /api/device/bind - Vincular dispositivo a usuario");
    info!("   POST /api/device/attest - Registrar atestación");
    info!("🔔 Endpoints - Notification:");
    info!("   POST /api/notification - Publicar notificación");
    info!("   GET  /api/notification - Listar notificaciones");
    info!("🧾 Endpoints - Audit:");
    info!("   GET  /api/audit - Listar eventos de auditoría");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "bus_fleet_tracking",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
