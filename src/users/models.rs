use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::cars::Car;
use crate::validation::{trim, trim_opt};

/// Postal address embedded in a user
/// All three fields are required when an address is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub street: String,
    pub number: i32,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub city: String,
}

impl Address {
    fn normalize(&mut self) {
        trim(&mut self.street);
        trim(&mut self.city);
    }
}

/// Domain model representing a stored user
/// Carries the password hash, so it is never serialized directly
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            address: user.address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User detail with the back-reference to the cars it owns
#[derive(Debug, Serialize, Deserialize)]
pub struct UserWithCars {
    #[serde(flatten)]
    pub user: UserResponse,
    pub cars: Vec<Car>,
}

/// Signup request DTO
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 45))]
    pub first_name: String,
    #[validate(length(min = 1, max = 45))]
    pub last_name: String,
    pub phone: Option<String>,
    #[validate]
    pub address: Option<Address>,
}

impl CreateUserRequest {
    /// Trim every string field before validation
    pub fn normalize(&mut self) {
        trim(&mut self.email);
        trim(&mut self.password);
        trim(&mut self.first_name);
        trim(&mut self.last_name);
        trim_opt(&mut self.phone);
        if let Some(address) = self.address.as_mut() {
            address.normalize();
        }
    }
}

/// Partial update DTO, omitted fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 45))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 45))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[validate]
    pub address: Option<Address>,
}

impl UpdateUserRequest {
    /// Trim every string field before validation
    pub fn normalize(&mut self) {
        trim_opt(&mut self.email);
        trim_opt(&mut self.password);
        trim_opt(&mut self.first_name);
        trim_opt(&mut self.last_name);
        trim_opt(&mut self.phone);
        if let Some(address) = self.address.as_mut() {
            address.normalize();
        }
    }
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// Trim the credentials the same way signup stored them
    pub fn normalize(&mut self) {
        trim(&mut self.email);
        trim(&mut self.password);
    }
}

/// Login response DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Store input for a new user, the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// Store input for a partial user update, the password is already hashed
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl UserChanges {
    /// Apply the changes on top of a stored user
    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if self.phone.is_some() {
            user.phone = self.phone;
        }
        if self.address.is_some() {
            user.address = self.address;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateUserRequest {
        serde_json::from_value(json!({
            "email": "fran@mail.com",
            "password": "12345678",
            "firstName": "Fran",
            "lastName": "Linde",
            "phone": "666555444",
            "address": { "street": "Calle Falsa", "number": 123, "city": "Madrid" }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_single_letter_names_pass() {
        let mut request = valid_request();
        request.first_name = "A".into();
        request.last_name = "B".into();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_short_password_fails() {
        let mut request = valid_request();
        request.password = "1234567".into();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_bad_email_fails() {
        let mut request = valid_request();
        request.email = "not-an-email".into();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_address_city_fails() {
        let mut request = valid_request();
        request.address = Some(Address {
            street: "Calle Falsa".into(),
            number: 1,
            city: "   ".into(),
        });
        request.normalize();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_whitespace_only_name_fails_after_normalize() {
        let mut request = valid_request();
        request.first_name = "    ".into();
        request.normalize();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_address_requires_all_fields() {
        let result: Result<CreateUserRequest, _> = serde_json::from_value(json!({
            "email": "fran@mail.com",
            "password": "12345678",
            "firstName": "Fran",
            "lastName": "Linde",
            "address": { "street": "Calle Falsa" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_login_request_is_trimmed_before_validation() {
        let mut request: LoginRequest = serde_json::from_value(json!({
            "email": "  fran@mail.com ",
            "password": "12345678"
        }))
        .unwrap();
        assert!(request.validate().is_err());

        request.normalize();
        assert_eq!(request.email, "fran@mail.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateUserRequest::default().validate().is_ok());
    }

    #[test]
    fn test_response_never_contains_password() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone: None,
            address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"firstName\":\"A\""));
    }

    #[test]
    fn test_changes_keep_untouched_fields() {
        let mut user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone: Some("1".into()),
            address: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        UserChanges {
            first_name: Some("C".into()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.first_name, "C");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.phone.as_deref(), Some("1"));
    }
}
