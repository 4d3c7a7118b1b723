// Garage API: users, cars and brands over HTTP

pub mod auth;
pub mod brands;
pub mod cars;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod pagination;
pub mod routes;
pub mod users;
pub mod validation;

use std::path::PathBuf;

use axum::extract::FromRef;

use crate::auth::{Authenticator, TokenService};
use crate::brands::{BrandService, LogoStorage};
use crate::cars::CarService;
use crate::db::Repositories;
use crate::users::UserService;

pub use crate::routes::create_router;

/// Application state shared across handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: UserService,
    pub cars: CarService,
    pub brands: BrandService,
    pub authenticator: Authenticator,
    pub logos: LogoStorage,
}

impl AppState {
    pub fn new(repositories: Repositories, tokens: TokenService, upload_dir: PathBuf) -> Self {
        Self {
            users: UserService::new(
                repositories.users.clone(),
                repositories.cars.clone(),
                tokens.clone(),
            ),
            cars: CarService::new(repositories.cars),
            brands: BrandService::new(repositories.brands),
            authenticator: Authenticator::new(tokens, repositories.users),
            logos: LogoStorage::new(upload_dir),
        }
    }
}
