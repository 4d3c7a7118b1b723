use garage_api::{
    auth::TokenService,
    config::{Config, Storage},
    create_router,
    db::{self, Repositories},
    AppState,
};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Garage API - Starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut pool: Option<PgPool> = None;
    let repositories = match &config.storage {
        Storage::Postgres(url) => {
            tracing::info!("Connecting to database...");
            let db_pool = db::create_pool(url, config.max_connections)
                .await
                .expect("Failed to create database pool");

            tracing::info!("Running database migrations...");
            db::run_migrations(&db_pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Migrations completed successfully");

            pool = Some(db_pool.clone());
            Repositories::postgres(db_pool)
        }
        Storage::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Repositories::in_memory()
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_seconds);
    let app = create_router(AppState::new(
        repositories,
        tokens,
        config.upload_dir.clone(),
    ));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Garage API is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }
    tracing::info!("Garage API stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
