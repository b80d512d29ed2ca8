//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - Public view of a registered user
//! - [`Address`] - Delivery address owned by a user
//!
//! # Request DTOs
//!
//! - [`UpdateProfileDto`] - Update name and/or phone
//! - [`CreateAddressDto`] - Add a delivery address

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use foodhub_auth::Role;

/// A registered user. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A user together with the bcrypt hash used at login.
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Input for creating a user. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_default: bool,
}

/// DTO for updating the caller's own profile.
///
/// Omitted fields are left unchanged.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone must be between 5 and 20 characters"))]
    pub phone: Option<String>,
}

/// DTO for adding a delivery address to the caller's account.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateAddressDto {
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateAddressDto> for NewAddress {
    fn from(dto: CreateAddressDto) -> Self {
        Self {
            street: dto.street,
            city: dto.city,
            postal_code: dto.postal_code,
            latitude: dto.latitude,
            longitude: dto.longitude,
            is_default: dto.is_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_dto() -> CreateAddressDto {
        CreateAddressDto {
            street: "12 Baker Street".to_string(),
            city: "London".to_string(),
            postal_code: "NW1 6XE".to_string(),
            latitude: 51.5237,
            longitude: -0.1585,
            is_default: true,
        }
    }

    #[test]
    fn test_valid_address_passes() {
        assert!(address_dto().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_fail() {
        let mut dto = address_dto();
        dto.latitude = 91.0;
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));

        let mut dto = address_dto();
        dto.longitude = -180.5;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_empty_street_fails() {
        let mut dto = address_dto();
        dto.street = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_profile_allows_omitted_fields() {
        let dto = UpdateProfileDto {
            name: None,
            phone: None,
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateProfileDto {
            name: Some(String::new()),
            phone: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_hash() {
        let credentials = UserCredentials {
            user: User {
                id: Uuid::new_v4(),
                email: "a@b.test".to_string(),
                name: "A".to_string(),
                phone: "5550100".to_string(),
                role: Role::Customer,
                created_at: Utc::now(),
            },
            password_hash: "$2b$04$secret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("$2b$04$secret"));
    }

    #[test]
    fn test_user_serializes_role_lowercase() {
        let user = User {
            id: Uuid::nil(),
            email: "c@d.test".to_string(),
            name: "C".to_string(),
            phone: "5550101".to_string(),
            role: Role::Courier,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "courier");
        assert!(json.get("password_hash").is_none());
    }
}
