use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::brands::{Brand, BrandRepository, CreateBrandRequest, UpdateBrandRequest};
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};

const RESOURCE: &str = "Brand";

/// Service layer for brands
#[derive(Clone)]
pub struct BrandService {
    repository: Arc<dyn BrandRepository>,
}

impl BrandService {
    /// Create a new BrandService
    pub fn new(repository: Arc<dyn BrandRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<Brand>, ApiError> {
        let brands = self
            .repository
            .find_page(request.skip(), request.limit())
            .await?;
        let total_items = self.repository.count().await?;

        Ok(Page::new(request, total_items, brands))
    }

    pub async fn get(&self, id: Uuid) -> Result<Brand, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }

    /// Brands whose name starts with `prefix`, case-insensitively
    ///
    /// An empty match is reported as not found.
    pub async fn find_by_name(&self, prefix: &str) -> Result<Vec<Brand>, ApiError> {
        let brands = self.repository.find_by_name_prefix(prefix.trim()).await?;
        if brands.is_empty() {
            return Err(ApiError::not_found(RESOURCE));
        }
        Ok(brands)
    }

    pub async fn create(&self, mut request: CreateBrandRequest) -> Result<Brand, ApiError> {
        request.normalize();
        request.validate()?;

        let brand = self.repository.insert(request).await?;
        tracing::info!("Created brand {} ({})", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut request: UpdateBrandRequest,
    ) -> Result<Brand, ApiError> {
        request.normalize();
        request.validate()?;

        self.repository
            .update(id, request)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Brand, ApiError> {
        self.repository
            .delete(id)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }

    /// Point a brand's logo at an uploaded file
    pub async fn attach_logo(&self, id: Uuid, logo_path: String) -> Result<Brand, ApiError> {
        let changes = UpdateBrandRequest {
            logo_image: Some(logo_path),
            ..Default::default()
        };

        self.repository
            .update(id, changes)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }
}
