use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// The five roles known to the system.
///
/// Stored as the canonical display string in the `users.role` column and in
/// token claims; parsed back at the boundaries that need to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Parent,
    Driver,
    #[serde(rename = "Bus Assistant")]
    BusAssistant,
    #[serde(rename = "Transport Manager")]
    TransportManager,
    #[serde(rename = "School Admin")]
    SchoolAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Parent => "Parent",
            UserRole::Driver => "Driver",
            UserRole::BusAssistant => "Bus Assistant",
            UserRole::TransportManager => "Transport Manager",
            UserRole::SchoolAdmin => "School Admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Parent" => Some(UserRole::Parent),
            "Driver" => Some(UserRole::Driver),
            "Bus Assistant" => Some(UserRole::BusAssistant),
            "Transport Manager" => Some(UserRole::TransportManager),
            "School Admin" => Some(UserRole::SchoolAdmin),
            _ => None,
        }
    }

    /// Drivers and bus assistants must be registered against a vehicle.
    pub fn requires_number_plate(&self) -> bool {
        matches!(self, UserRole::Driver | UserRole::BusAssistant)
    }

    /// Roles accepted by the public registration endpoint. School Admin
    /// accounts are created through the CLI only.
    pub const REGISTERABLE: [UserRole; 4] = [
        UserRole::Parent,
        UserRole::Driver,
        UserRole::BusAssistant,
        UserRole::TransportManager,
    ];
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id as a string.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// A row in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub number_plate: Option<String>,
    pub role: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_numeric_only(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("numeric_only")
            .with_message("must contain numbers only.".into()))
    }
}

fn validate_registerable_role(value: &str) -> Result<(), ValidationError> {
    let known = UserRole::parse(value.trim())
        .is_some_and(|role| UserRole::REGISTERABLE.contains(&role));

    if known {
        Ok(())
    } else {
        Err(ValidationError::new("role").with_message("Invalid role selected.".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "firstName is required."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "lastName is required."))]
    pub last_name: String,
    #[validate(
        custom(function = validate_numeric_only),
        length(min = 9, max = 20, message = "phoneNumber length is invalid.")
    )]
    pub phone_number: String,
    /// Required for Driver and Bus Assistant; ignored for other roles.
    #[validate(length(max = 20, message = "numberPlate must be at most 20 characters."))]
    pub number_plate: Option<String>,
    #[validate(custom(function = validate_registerable_role))]
    pub role: String,
    #[validate(length(
        min = 6,
        max = 255,
        message = "Password must be between 6 and 255 characters."
    ))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "password is invalid."))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Registration result: the normalized identity the frontend redirects with.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub email: String,
    pub role: UserRole,
}

/// A fresh access/refresh pair plus the identity it was minted for.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub email: String,
    pub role: UserRole,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NumberPlatesData {
    pub number_plates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_canonical_strings() {
        for role in [
            UserRole::Parent,
            UserRole::Driver,
            UserRole::BusAssistant,
            UserRole::TransportManager,
            UserRole::SchoolAdmin,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("Conductor"), None);
    }

    #[test]
    fn only_drivers_and_assistants_need_plates() {
        assert!(UserRole::Driver.requires_number_plate());
        assert!(UserRole::BusAssistant.requires_number_plate());
        assert!(!UserRole::Parent.requires_number_plate());
        assert!(!UserRole::TransportManager.requires_number_plate());
        assert!(!UserRole::SchoolAdmin.requires_number_plate());
    }

    #[test]
    fn school_admin_is_not_registerable() {
        assert!(!UserRole::REGISTERABLE.contains(&UserRole::SchoolAdmin));
        assert!(validate_registerable_role("School Admin").is_err());
        assert!(validate_registerable_role("Parent").is_ok());
    }
}
