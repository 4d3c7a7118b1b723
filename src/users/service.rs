use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthError, PasswordService, TokenService};
use crate::cars::CarRepository;
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};
use crate::users::{
    CreateUserRequest, LoginRequest, LoginResponse, NewUser, UpdateUserRequest, User,
    UserChanges, UserRepository, UserResponse, UserWithCars,
};

const RESOURCE: &str = "User";

/// Service layer for user business logic
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cars: Arc<dyn CarRepository>,
    tokens: TokenService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(
        users: Arc<dyn UserRepository>,
        cars: Arc<dyn CarRepository>,
        tokens: TokenService,
    ) -> Self {
        Self { users, cars, tokens }
    }

    /// Register a new user
    ///
    /// The password is validated in plaintext, then hashed before it reaches the store.
    pub async fn signup(&self, mut request: CreateUserRequest) -> Result<UserResponse, ApiError> {
        request.normalize();
        request.validate()?;

        let password_hash = PasswordService::hash_password_async(request.password).await?;

        let user = self
            .users
            .insert(NewUser {
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                address: request.address,
            })
            .await?;

        Ok(user.into())
    }

    /// Exchange credentials for a token
    pub async fn login(&self, mut request: LoginRequest) -> Result<LoginResponse, ApiError> {
        request.normalize();
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches =
            PasswordService::verify_password_async(request.password, user.password_hash.clone())
                .await?;
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(LoginResponse { token })
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<UserResponse>, ApiError> {
        let users = self.users.find_page(request.skip(), request.limit()).await?;
        let total_items = self.users.count().await?;

        Ok(Page::new(
            request,
            total_items,
            users.into_iter().map(UserResponse::from).collect(),
        ))
    }

    /// Get a user together with the cars it owns
    pub async fn get(&self, id: Uuid) -> Result<UserWithCars, ApiError> {
        let user = self.find(id).await?;
        let cars = self.cars.find_by_owner(id).await?;

        Ok(UserWithCars {
            user: user.into(),
            cars,
        })
    }

    /// Partially update a user
    ///
    /// Only a password present in this request is hashed, a stored hash is never re-hashed.
    pub async fn update(
        &self,
        id: Uuid,
        mut request: UpdateUserRequest,
    ) -> Result<UserResponse, ApiError> {
        request.normalize();
        request.validate()?;

        let password_hash = match request.password {
            Some(password) => Some(PasswordService::hash_password_async(password).await?),
            None => None,
        };

        let changes = UserChanges {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            address: request.address,
        };

        self.users
            .update(id, changes)
            .await?
            .map(UserResponse::from)
            .ok_or(ApiError::not_found(RESOURCE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<UserResponse, ApiError> {
        self.users
            .delete(id)
            .await?
            .map(UserResponse::from)
            .ok_or(ApiError::not_found(RESOURCE))
    }

    async fn find(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found(RESOURCE))
    }
}
