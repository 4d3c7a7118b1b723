use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::brands::{BrandRepository, PgBrandRepository};
use crate::cars::{CarRepository, PgCarRepository};
use crate::memory::MemoryStore;
use crate::users::{PgUserRepository, UserRepository};

/// Creates and configures a PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Apply pending migrations from ./migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// The three collections behind the services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub cars: Arc<dyn CarRepository>,
    pub brands: Arc<dyn BrandRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            cars: Arc::new(PgCarRepository::new(pool.clone())),
            brands: Arc::new(PgBrandRepository::new(pool)),
        }
    }

    /// Every collection backed by one shared MemoryStore, so car lookups see
    /// the same users and brands
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            cars: Arc::new(store.clone()),
            brands: Arc::new(store),
        }
    }
}
