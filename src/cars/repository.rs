use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::brands::Brand;
use crate::cars::{Car, CarDetails, CreateCarRequest, UpdateCarRequest};
use crate::error::ApiError;
use crate::users::{Address, UserResponse};

/// Persistent car collection
///
/// Brand and owner references are not checked on write.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn count(&self) -> Result<i64, ApiError>;

    /// Fetch one window of cars with brand and owner expanded
    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<CarDetails>, ApiError>;

    /// Fetch one car with brand and owner expanded
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarDetails>, ApiError>;

    /// All cars owned by a user
    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<Car>, ApiError>;

    async fn insert(&self, car: CreateCarRequest) -> Result<Car, ApiError>;

    async fn update(&self, id: Uuid, changes: UpdateCarRequest) -> Result<Option<Car>, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<Option<Car>, ApiError>;
}

const CAR_COLUMNS: &str = "id, model, plate, power, brand_id, owner_id, created_at, updated_at";

/// Row shape of the `cars` table
#[derive(Debug, FromRow)]
struct CarRow {
    id: Uuid,
    model: String,
    plate: Option<String>,
    power: Option<i32>,
    brand_id: Option<Uuid>,
    owner_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self {
            id: row.id,
            model: row.model,
            plate: row.plate,
            power: row.power,
            brand: row.brand_id,
            owner: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row shape of a car joined with its brand and owner
#[derive(Debug, FromRow)]
struct CarDetailsRow {
    id: Uuid,
    model: String,
    plate: Option<String>,
    power: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    b_id: Option<Uuid>,
    b_name: Option<String>,
    b_creation_year: Option<i32>,
    b_country: Option<String>,
    b_logo_image: Option<String>,
    b_created_at: Option<DateTime<Utc>>,
    b_updated_at: Option<DateTime<Utc>>,
    u_id: Option<Uuid>,
    u_email: Option<String>,
    u_first_name: Option<String>,
    u_last_name: Option<String>,
    u_phone: Option<String>,
    u_address: Option<Json<Address>>,
    u_created_at: Option<DateTime<Utc>>,
    u_updated_at: Option<DateTime<Utc>>,
}

impl From<CarDetailsRow> for CarDetails {
    fn from(row: CarDetailsRow) -> Self {
        // A LEFT JOIN miss leaves every joined column NULL
        let brand = match (row.b_id, row.b_name, row.b_created_at, row.b_updated_at) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Brand {
                id,
                name,
                creation_year: row.b_creation_year,
                country: row.b_country,
                logo_image: row.b_logo_image,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        let owner = match (
            row.u_id,
            row.u_email,
            row.u_first_name,
            row.u_last_name,
            row.u_created_at,
            row.u_updated_at,
        ) {
            (
                Some(id),
                Some(email),
                Some(first_name),
                Some(last_name),
                Some(created_at),
                Some(updated_at),
            ) => Some(UserResponse {
                id,
                email,
                first_name,
                last_name,
                phone: row.u_phone,
                address: row.u_address.map(|json| json.0),
                created_at,
                updated_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            model: row.model,
            plate: row.plate,
            power: row.power,
            brand,
            owner,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CAR_DETAILS_SELECT: &str = r#"
    SELECT c.id, c.model, c.plate, c.power, c.created_at, c.updated_at,
           b.id AS b_id, b.name AS b_name, b.creation_year AS b_creation_year,
           b.country AS b_country, b.logo_image AS b_logo_image,
           b.created_at AS b_created_at, b.updated_at AS b_updated_at,
           u.id AS u_id, u.email AS u_email, u.first_name AS u_first_name,
           u.last_name AS u_last_name, u.phone AS u_phone, u.address AS u_address,
           u.created_at AS u_created_at, u.updated_at AS u_updated_at
    FROM cars c
    LEFT JOIN brands b ON b.id = c.brand_id
    LEFT JOIN users u ON u.id = c.owner_id
"#;

/// PostgreSQL-backed car repository
#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    /// Create a new PgCarRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<CarDetails>, ApiError> {
        let rows = sqlx::query_as::<_, CarDetailsRow>(&format!(
            "{CAR_DETAILS_SELECT} ORDER BY c.created_at, c.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CarDetails::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarDetails>, ApiError> {
        let row = sqlx::query_as::<_, CarDetailsRow>(&format!(
            "{CAR_DETAILS_SELECT} WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CarDetails::from))
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<Car>, ApiError> {
        let rows = sqlx::query_as::<_, CarRow>(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE owner_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn insert(&self, car: CreateCarRequest) -> Result<Car, ApiError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            r#"
            INSERT INTO cars (id, model, plate, power, brand_id, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(car.model)
        .bind(car.plate)
        .bind(car.power)
        .bind(car.brand)
        .bind(car.owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: UpdateCarRequest) -> Result<Option<Car>, ApiError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            r#"
            UPDATE cars
            SET model = COALESCE($1, model),
                plate = COALESCE($2, plate),
                power = COALESCE($3, power),
                brand_id = COALESCE($4, brand_id),
                owner_id = COALESCE($5, owner_id),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(changes.model)
        .bind(changes.plate)
        .bind(changes.power)
        .bind(changes.brand)
        .bind(changes.owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Car>, ApiError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            "DELETE FROM cars WHERE id = $1 RETURNING {CAR_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }
}
