use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::brands::Brand;
use crate::users::UserResponse;
use crate::validation::{trim, trim_opt};

/// Domain model representing a car, references kept as ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub model: String,
    pub plate: Option<String>,
    pub power: Option<i32>,
    pub brand: Option<Uuid>,
    pub owner: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Car with its brand and owner expanded
///
/// A reference that no longer resolves is rendered as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetails {
    pub id: Uuid,
    pub model: String,
    pub plate: Option<String>,
    pub power: Option<i32>,
    pub brand: Option<Brand>,
    pub owner: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a car
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[validate(length(min = 3, max = 40, message = "Model must be between 3 and 40 characters"))]
    pub model: String,
    #[validate(length(min = 3, max = 20, message = "Plate must be between 3 and 20 characters"))]
    pub plate: Option<String>,
    #[validate(range(min = 5, max = 2000, message = "Power must be between 5 and 2000 hp"))]
    pub power: Option<i32>,
    pub brand: Option<Uuid>,
    pub owner: Option<Uuid>,
}

impl CreateCarRequest {
    pub fn normalize(&mut self) {
        trim(&mut self.model);
        trim_opt(&mut self.plate);
    }
}

/// Request DTO for partially updating a car
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    #[validate(length(min = 3, max = 40, message = "Model must be between 3 and 40 characters"))]
    pub model: Option<String>,
    #[validate(length(min = 3, max = 20, message = "Plate must be between 3 and 20 characters"))]
    pub plate: Option<String>,
    #[validate(range(min = 5, max = 2000, message = "Power must be between 5 and 2000 hp"))]
    pub power: Option<i32>,
    pub brand: Option<Uuid>,
    pub owner: Option<Uuid>,
}

impl UpdateCarRequest {
    pub fn normalize(&mut self) {
        trim_opt(&mut self.model);
        trim_opt(&mut self.plate);
    }

    /// Apply the changes on top of a stored car
    pub fn apply_to(self, car: &mut Car) {
        if let Some(model) = self.model {
            car.model = model;
        }
        if self.plate.is_some() {
            car.plate = self.plate;
        }
        if self.power.is_some() {
            car.power = self.power;
        }
        if self.brand.is_some() {
            car.brand = self.brand;
        }
        if self.owner.is_some() {
            car.owner = self.owner;
        }
    }
}
