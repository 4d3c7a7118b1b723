// In-memory store implementing every repository trait
// Selected with DATABASE_URL=memory:// and used by the test suites

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use regex::RegexBuilder;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::brands::{
    name_prefix_pattern, Brand, BrandRepository, CreateBrandRequest, UpdateBrandRequest,
};
use crate::cars::{Car, CarDetails, CarRepository, CreateCarRequest, UpdateCarRequest};
use crate::error::ApiError;
use crate::users::{NewUser, User, UserChanges, UserRepository, UserResponse};

const DUPLICATE_EMAIL_MESSAGE: &str =
    "duplicate key value violates unique constraint \"users_email_key\"";

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    cars: Vec<Car>,
    brands: Vec<Brand>,
}

impl Collections {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn details(&self, car: &Car) -> CarDetails {
        let brand = car
            .brand
            .and_then(|id| self.brands.iter().find(|b| b.id == id).cloned());
        let owner = car.owner.and_then(|id| {
            self.users
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .map(UserResponse::from)
        });

        CarDetails {
            id: car.id,
            model: car.model.clone(),
            plate: car.plate.clone(),
            power: car.power,
            brand,
            owner,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

/// Shared in-memory collections, records are kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(items: &[T], skip: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(matches)?;
    Some(items.remove(index))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<User>, ApiError> {
        Ok(window(&self.inner.read().await.users, skip, limit))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, ApiError> {
        let mut store = self.inner.write().await;
        if store.email_taken(&user.email, None) {
            return Err(ApiError::DuplicateKey(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            address: user.address,
            created_at: now,
            updated_at: now,
        };
        store.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError> {
        let mut store = self.inner.write().await;
        if let Some(email) = changes.email.as_deref() {
            if store.email_taken(email, Some(id)) {
                return Err(ApiError::DuplicateKey(DUPLICATE_EMAIL_MESSAGE.to_string()));
            }
        }

        let Some(user) = store.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        changes.apply_to(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let mut store = self.inner.write().await;
        Ok(remove_by(&mut store.users, |u| u.id == id))
    }
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.inner.read().await.cars.len() as i64)
    }

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<CarDetails>, ApiError> {
        let store = self.inner.read().await;
        Ok(window(&store.cars, skip, limit)
            .iter()
            .map(|car| store.details(car))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CarDetails>, ApiError> {
        let store = self.inner.read().await;
        Ok(store
            .cars
            .iter()
            .find(|c| c.id == id)
            .map(|car| store.details(car)))
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<Car>, ApiError> {
        let store = self.inner.read().await;
        Ok(store
            .cars
            .iter()
            .filter(|c| c.owner == Some(owner))
            .cloned()
            .collect())
    }

    async fn insert(&self, car: CreateCarRequest) -> Result<Car, ApiError> {
        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            model: car.model,
            plate: car.plate,
            power: car.power,
            brand: car.brand,
            owner: car.owner,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.cars.push(car.clone());
        Ok(car)
    }

    async fn update(&self, id: Uuid, changes: UpdateCarRequest) -> Result<Option<Car>, ApiError> {
        let mut store = self.inner.write().await;
        let Some(car) = store.cars.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        changes.apply_to(car);
        car.updated_at = Utc::now();
        Ok(Some(car.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Car>, ApiError> {
        let mut store = self.inner.write().await;
        Ok(remove_by(&mut store.cars, |c| c.id == id))
    }
}

#[async_trait]
impl BrandRepository for MemoryStore {
    async fn count(&self) -> Result<i64, ApiError> {
        Ok(self.inner.read().await.brands.len() as i64)
    }

    async fn find_page(&self, skip: i64, limit: i64) -> Result<Vec<Brand>, ApiError> {
        Ok(window(&self.inner.read().await.brands, skip, limit))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Brand>, ApiError> {
        let store = self.inner.read().await;
        Ok(store.brands.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<Brand>, ApiError> {
        let pattern = RegexBuilder::new(&name_prefix_pattern(prefix))
            .case_insensitive(true)
            .build()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let store = self.inner.read().await;
        Ok(store
            .brands
            .iter()
            .filter(|b| pattern.is_match(&b.name))
            .cloned()
            .collect())
    }

    async fn insert(&self, brand: CreateBrandRequest) -> Result<Brand, ApiError> {
        let now = Utc::now();
        let brand = Brand {
            id: Uuid::new_v4(),
            name: brand.name,
            creation_year: brand.creation_year,
            country: brand.country,
            logo_image: brand.logo_image,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.brands.push(brand.clone());
        Ok(brand)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UpdateBrandRequest,
    ) -> Result<Option<Brand>, ApiError> {
        let mut store = self.inner.write().await;
        let Some(brand) = store.brands.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        changes.apply_to(brand);
        brand.updated_at = Utc::now();
        Ok(Some(brand.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Brand>, ApiError> {
        let mut store = self.inner.write().await;
        Ok(remove_by(&mut store.brands, |b| b.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone: None,
            address: None,
        }
    }

    fn new_car(model: &str, brand: Option<Uuid>, owner: Option<Uuid>) -> CreateCarRequest {
        CreateCarRequest {
            model: model.to_string(),
            plate: None,
            power: None,
            brand,
            owner,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@b.com")).await.unwrap();

        let err = UserRepository::insert(&store, new_user("a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateKey(_)));
        assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_rejected() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@b.com")).await.unwrap();
        let second = UserRepository::insert(&store, new_user("c@d.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("a@b.com".into()),
            ..Default::default()
        };
        let err = UserRepository::update(&store, second.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateKey(_)));

        // Re-saving the own email is fine
        let changes = UserChanges {
            email: Some("c@d.com".into()),
            ..Default::default()
        };
        assert!(UserRepository::update(&store, second.id, changes)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_pages_follow_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            UserRepository::insert(&store, new_user(&format!("u{i}@mail.com")))
                .await
                .unwrap();
        }

        let page = UserRepository::find_page(&store, 2, 2).await.unwrap();
        let emails: Vec<_> = page.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["u2@mail.com", "u3@mail.com"]);

        assert!(UserRepository::find_page(&store, 10, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_car_details_expand_references() {
        let store = MemoryStore::new();
        let owner = UserRepository::insert(&store, new_user("o@mail.com")).await.unwrap();
        let brand = BrandRepository::insert(
            &store,
            CreateBrandRequest {
                name: "Ford".into(),
                creation_year: Some(1903),
                country: Some("USA".into()),
                logo_image: None,
            },
        )
        .await
        .unwrap();

        let car = CarRepository::insert(&store, new_car("Focus", Some(brand.id), Some(owner.id)))
            .await
            .unwrap();
        let dangling = CarRepository::insert(&store, new_car("Ka+", Some(Uuid::new_v4()), None))
            .await
            .unwrap();

        let details = CarRepository::find_by_id(&store, car.id).await.unwrap().unwrap();
        assert_eq!(details.brand.unwrap().name, "Ford");
        assert_eq!(details.owner.unwrap().email, "o@mail.com");

        let details = CarRepository::find_by_id(&store, dangling.id)
            .await
            .unwrap()
            .unwrap();
        assert!(details.brand.is_none());
        assert!(details.owner.is_none());

        let owned = CarRepository::find_by_owner(&store, owner.id).await.unwrap();
        assert_eq!(owned, vec![car]);
    }

    #[tokio::test]
    async fn test_delete_returns_record_once() {
        let store = MemoryStore::new();
        let car = CarRepository::insert(&store, new_car("Ibiza", None, None))
            .await
            .unwrap();

        assert_eq!(CarRepository::delete(&store, car.id).await.unwrap(), Some(car.clone()));
        assert_eq!(CarRepository::delete(&store, car.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_brand_prefix_is_literal() {
        let store = MemoryStore::new();
        for name in ["Ford", "F.orx"] {
            BrandRepository::insert(
                &store,
                CreateBrandRequest {
                    name: name.into(),
                    creation_year: None,
                    country: None,
                    logo_image: None,
                },
            )
            .await
            .unwrap();
        }

        let found = BrandRepository::find_by_name_prefix(&store, "f.").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "F.orx");
    }
}
