use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::cars::{Car, CarDetails, CarRepository, CreateCarRequest, UpdateCarRequest};
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};

const RESOURCE: &str = "Car";

/// Service layer for cars
///
/// No ownership checks: any caller may create, update or delete any car.
#[derive(Clone)]
pub struct CarService {
    repository: Arc<dyn CarRepository>,
}

impl CarService {
    /// Create a new CarService
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<CarDetails>, ApiError> {
        let cars = self
            .repository
            .find_page(request.skip(), request.limit())
            .await?;
        let total_items = self.repository.count().await?;

        Ok(Page::new(request, total_items, cars))
    }

    pub async fn get(&self, id: Uuid) -> Result<CarDetails, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }

    pub async fn create(&self, mut request: CreateCarRequest) -> Result<Car, ApiError> {
        request.normalize();
        request.validate()?;

        let car = self.repository.insert(request).await?;
        tracing::info!("Created car {}", car.id);
        Ok(car)
    }

    pub async fn update(&self, id: Uuid, mut request: UpdateCarRequest) -> Result<Car, ApiError> {
        request.normalize();
        request.validate()?;

        self.repository
            .update(id, request)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Car, ApiError> {
        self.repository
            .delete(id)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }
}
