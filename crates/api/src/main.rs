use std::net::SocketAddr;
use std::sync::Arc;

use record_locking_api::config::{ServerConfig, StoreBackend};
use record_locking_api::router::build_app_router;
use record_locking_api::state::AppState;
use record_locking_api::{logging, ws};
use record_locking_core::memory::MemoryLockStore;
use record_locking_core::registry::LockRegistry;
use record_locking_core::status::StatusQueryService;
use record_locking_core::store::LockStore;
use record_locking_db::{PgLockStore, PgPermissionSource, PgUserDirectory};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    logging::init_tracing(&config.locking);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.locking.store,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = record_locking_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    record_locking_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Collaborators ---
    let store: Arc<dyn LockStore> = match config.locking.store {
        StoreBackend::Postgres => {
            record_locking_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");
            Arc::new(PgLockStore::new(pool.clone()))
        }
        StoreBackend::Memory => Arc::new(MemoryLockStore::new()),
    };
    let permissions = Arc::new(PgPermissionSource::new(pool.clone()));
    let directory = Arc::new(PgUserDirectory::new(pool.clone()));

    // --- Lock registry ---
    let registry = Arc::new(LockRegistry::new(store, permissions));
    registry
        .init()
        .await
        .expect("Failed to clear lock records left by a previous run");
    let status = Arc::new(StatusQueryService::new(Arc::clone(&registry), directory));

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        status,
        ws_manager: Arc::clone(&ws_manager),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    registry.shutdown().await;
    pool.close().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
