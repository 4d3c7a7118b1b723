use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::brands::{Brand, CreateBrandRequest, UpdateBrandRequest};
use crate::error::ApiError;

/// Persistent brand collection
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn count(&self) -> Result<i64, ApiError>;

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<Brand>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Brand>, ApiError>;

    /// Brands whose name starts with `prefix`, ignoring case
    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<Brand>, ApiError>;

    async fn insert(&self, brand: CreateBrandRequest) -> Result<Brand, ApiError>;

    async fn update(&self, id: Uuid, changes: UpdateBrandRequest)
        -> Result<Option<Brand>, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<Option<Brand>, ApiError>;
}

/// Anchored, case-insensitive pattern matching names that start with `prefix`
/// The prefix is escaped so it always matches literally
pub fn name_prefix_pattern(prefix: &str) -> String {
    format!("^{}", regex::escape(&prefix.to_lowercase()))
}

const BRAND_COLUMNS: &str = "id, name, creation_year, country, logo_image, created_at, updated_at";

/// PostgreSQL-backed brand repository
#[derive(Clone)]
pub struct PgBrandRepository {
    pool: PgPool,
}

impl PgBrandRepository {
    /// Create a new PgBrandRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<Brand>, ApiError> {
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands ORDER BY created_at, id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Brand>, ApiError> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<Brand>, ApiError> {
        // ~* is PostgreSQL's case-insensitive regex match
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands WHERE name ~* $1 ORDER BY created_at, id"
        ))
        .bind(name_prefix_pattern(prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    async fn insert(&self, brand: CreateBrandRequest) -> Result<Brand, ApiError> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            INSERT INTO brands (id, name, creation_year, country, logo_image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BRAND_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(brand.name)
        .bind(brand.creation_year)
        .bind(brand.country)
        .bind(brand.logo_image)
        .fetch_one(&self.pool)
        .await?;

        Ok(brand)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateBrandRequest,
    ) -> Result<Option<Brand>, ApiError> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            UPDATE brands
            SET name = COALESCE($1, name),
                creation_year = COALESCE($2, creation_year),
                country = COALESCE($3, country),
                logo_image = COALESCE($4, logo_image),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {BRAND_COLUMNS}
            "#
        ))
        .bind(changes.name)
        .bind(changes.creation_year)
        .bind(changes.country)
        .bind(changes.logo_image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Brand>, ApiError> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            "DELETE FROM brands WHERE id = $1 RETURNING {BRAND_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }
}
