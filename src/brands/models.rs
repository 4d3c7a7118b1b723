use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{trim, trim_opt};

/// Domain model representing a car brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub creation_year: Option<i32>,
    pub country: Option<String>,
    pub logo_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a brand
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    #[validate(length(
        min = 3,
        max = 20,
        message = "Give a bit more detail, the name needs between 3 and 20 letters"
    ))]
    pub name: String,
    #[validate(custom = "crate::validation::validate_creation_year")]
    pub creation_year: Option<i32>,
    #[validate(custom = "crate::validation::validate_country")]
    pub country: Option<String>,
    pub logo_image: Option<String>,
}

impl CreateBrandRequest {
    /// Trim strings and upper-case the country
    pub fn normalize(&mut self) {
        trim(&mut self.name);
        normalize_country(&mut self.country);
        trim_opt(&mut self.logo_image);
    }
}

/// Request DTO for partially updating a brand
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrandRequest {
    #[validate(length(
        min = 3,
        max = 20,
        message = "Give a bit more detail, the name needs between 3 and 20 letters"
    ))]
    pub name: Option<String>,
    #[validate(custom = "crate::validation::validate_creation_year")]
    pub creation_year: Option<i32>,
    #[validate(custom = "crate::validation::validate_country")]
    pub country: Option<String>,
    pub logo_image: Option<String>,
}

impl UpdateBrandRequest {
    /// Trim strings and upper-case the country
    pub fn normalize(&mut self) {
        trim_opt(&mut self.name);
        normalize_country(&mut self.country);
        trim_opt(&mut self.logo_image);
    }

    /// Apply the changes on top of a stored brand
    pub fn apply_to(self, brand: &mut Brand) {
        if let Some(name) = self.name {
            brand.name = name;
        }
        if self.creation_year.is_some() {
            brand.creation_year = self.creation_year;
        }
        if self.country.is_some() {
            brand.country = self.country;
        }
        if self.logo_image.is_some() {
            brand.logo_image = self.logo_image;
        }
    }
}

fn normalize_country(country: &mut Option<String>) {
    if let Some(value) = country.as_mut() {
        *value = value.trim().to_uppercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(json: serde_json::Value) -> CreateBrandRequest {
        let mut request: CreateBrandRequest = serde_json::from_value(json).unwrap();
        request.normalize();
        request
    }

    #[test]
    fn test_country_is_case_normalized() {
        let request = normalized(json!({ "name": "Seat", "country": " spain " }));
        assert_eq!(request.country.as_deref(), Some("SPAIN"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_country_is_rejected() {
        let request = normalized(json!({ "name": "Skoda", "country": "czechia" }));
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("country"));
    }

    #[test]
    fn test_creation_year_bounds() {
        let request = normalized(json!({ "name": "Peugeot", "creationYear": 1802 }));
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("creation_year"));

        let request = normalized(json!({ "name": "Peugeot", "creationYear": 1810 }));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_name_length() {
        assert!(normalized(json!({ "name": "VW" })).validate().is_err());
        assert!(normalized(json!({ "name": "  VW  " })).validate().is_err());
        assert!(normalized(json!({ "name": "Volkswagen Group Ltd." })).validate().is_err());
        assert!(normalized(json!({ "name": "Lancia" })).validate().is_ok());
    }

    #[test]
    fn test_update_only_validates_present_fields() {
        let mut update = UpdateBrandRequest {
            country: Some("italy".into()),
            ..Default::default()
        };
        update.normalize();
        assert!(update.validate().is_ok());
        assert_eq!(update.country.as_deref(), Some("ITALY"));
    }
}
