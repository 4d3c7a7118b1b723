// Validation utilities module
// Custom validation functions for domain-specific rules

use chrono::{Datelike, Utc};
use validator::ValidationError;

/// Countries a brand may belong to
pub const ALLOWED_COUNTRIES: [&str; 6] = ["SPAIN", "ITALY", "USA", "GERMANY", "JAPAN", "FRANCE"];

/// Year the oldest car brand (Peugeot) was founded
pub const MIN_CREATION_YEAR: i32 = 1803;

/// Validates that a country is one of the accepted values
/// Expects the value already upper-cased by normalization
pub fn validate_country(country: &str) -> Result<(), ValidationError> {
    if ALLOWED_COUNTRIES.contains(&country) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_country");
        error.message = Some(format!("Country must be one of {}", ALLOWED_COUNTRIES.join(", ")).into());
        Err(error)
    }
}

/// Validates that a creation year lies between 1803 and the current year
pub fn validate_creation_year(year: i32) -> Result<(), ValidationError> {
    let current_year = Utc::now().year();
    if year < MIN_CREATION_YEAR {
        let mut error = ValidationError::new("creation_year_too_old");
        error.message =
            Some("The oldest car brand is Peugeot and it was founded in 1803".into());
        Err(error)
    } else if year > current_year {
        let mut error = ValidationError::new("creation_year_in_future");
        error.message = Some(format!("Creation year cannot be after {}", current_year).into());
        Err(error)
    } else {
        Ok(())
    }
}

/// Validates that a required string is not blank once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Trim a required string in place
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim an optional string in place
pub fn trim_opt(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim(inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_countries() {
        for country in ALLOWED_COUNTRIES {
            assert!(validate_country(country).is_ok());
        }
        assert!(validate_country("spain").is_err());
        assert!(validate_country("PORTUGAL").is_err());
        assert!(validate_country("").is_err());
    }

    #[test]
    fn test_creation_year_bounds() {
        let current_year = Utc::now().year();
        assert!(validate_creation_year(1803).is_ok());
        assert!(validate_creation_year(current_year).is_ok());
        assert!(validate_creation_year(1802).is_err());
        assert!(validate_creation_year(current_year + 1).is_err());
    }

    #[test]
    fn test_trim() {
        let mut value = "  Ford  ".to_string();
        trim(&mut value);
        assert_eq!(value, "Ford");

        let mut optional = Some(" 666 ".to_string());
        trim_opt(&mut optional);
        assert_eq!(optional.as_deref(), Some("666"));
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Madrid").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    proptest! {
        #[test]
        fn prop_years_inside_range_pass(year in 1803i32..2024) {
            prop_assert!(validate_creation_year(year).is_ok());
        }

        #[test]
        fn prop_years_before_1803_fail(year in -5000i32..1803) {
            prop_assert!(validate_creation_year(year).is_err());
        }
    }
}
