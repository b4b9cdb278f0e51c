use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::utils::serde::{coerce_i64, coerce_optional_f64};

/// What a request is asking the transport office for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestType {
    Fuel,
    Service,
    #[serde(rename = "Repair and Maintenance")]
    RepairAndMaintenance,
    Compliance,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Fuel => "Fuel",
            RequestType::Service => "Service",
            RequestType::RepairAndMaintenance => "Repair and Maintenance",
            RequestType::Compliance => "Compliance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Fuel" => Some(RequestType::Fuel),
            "Service" => Some(RequestType::Service),
            "Repair and Maintenance" => Some(RequestType::RepairAndMaintenance),
            "Compliance" => Some(RequestType::Compliance),
            _ => None,
        }
    }
}

/// Cost category the workshop books the request under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestCategory {
    #[serde(rename = "Fuels & Oils")]
    FuelsAndOils,
    #[serde(rename = "Body Works and Body Parts")]
    BodyWorks,
    Mechanical,
    Wiring,
    #[serde(rename = "Puncture & Tires")]
    PunctureAndTires,
    Insurance,
    #[serde(rename = "RSL")]
    Rsl,
    #[serde(rename = "Inspection / Speed Governors")]
    InspectionSpeedGovernors,
}

impl RequestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCategory::FuelsAndOils => "Fuels & Oils",
            RequestCategory::BodyWorks => "Body Works and Body Parts",
            RequestCategory::Mechanical => "Mechanical",
            RequestCategory::Wiring => "Wiring",
            RequestCategory::PunctureAndTires => "Puncture & Tires",
            RequestCategory::Insurance => "Insurance",
            RequestCategory::Rsl => "RSL",
            RequestCategory::InspectionSpeedGovernors => "Inspection / Speed Governors",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Fuels & Oils" => Some(RequestCategory::FuelsAndOils),
            "Body Works and Body Parts" => Some(RequestCategory::BodyWorks),
            "Mechanical" => Some(RequestCategory::Mechanical),
            "Wiring" => Some(RequestCategory::Wiring),
            "Puncture & Tires" => Some(RequestCategory::PunctureAndTires),
            "Insurance" => Some(RequestCategory::Insurance),
            "RSL" => Some(RequestCategory::Rsl),
            "Inspection / Speed Governors" => Some(RequestCategory::InspectionSpeedGovernors),
            _ => None,
        }
    }
}

/// The transport office staff who can countersign a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ConfirmedBy {
    Erick,
    Douglas,
    James,
}

impl ConfirmedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmedBy::Erick => "Erick",
            ConfirmedBy::Douglas => "Douglas",
            ConfirmedBy::James => "James",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Erick" => Some(ConfirmedBy::Erick),
            "Douglas" => Some(ConfirmedBy::Douglas),
            "James" => Some(ConfirmedBy::James),
            _ => None,
        }
    }
}

/// A row in `fuel_maintenance_requests`. Append-only: no update or delete
/// path exists.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FuelMaintenanceRequest {
    pub id: i64,
    pub request_date: NaiveDate,
    pub number_plate: String,
    pub current_mileage: i64,
    pub request_type: String,
    pub requested_by: String,
    pub category: String,
    pub description: String,
    pub amount: Option<f64>,
    pub confirmed_by: String,
    pub created_by_user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_amount_shape(dto: &CreateFuelMaintenanceRequest) -> Result<(), ValidationError> {
    // The Fuel-specific rules live in the service; here only reject amounts
    // that could never be stored for the remaining request types.
    if dto.request_type.trim() != "Fuel" {
        if let Some(amount) = dto.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ValidationError::new("amount")
                    .with_message("amount must be a valid non-negative number.".into()));
            }
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_amount_shape, skip_on_field_errors = false))]
pub struct CreateFuelMaintenanceRequest {
    pub request_date: NaiveDate,
    #[validate(length(
        min = 3,
        max = 20,
        message = "numberPlate must be between 3 and 20 characters."
    ))]
    pub number_plate: String,
    #[serde(deserialize_with = "coerce_i64")]
    #[validate(range(min = 0, message = "currentMileage must be a non-negative integer."))]
    pub current_mileage: i64,
    pub request_type: String,
    #[validate(length(min = 1, max = 255, message = "requestedBy is required."))]
    pub requested_by: String,
    pub category: String,
    #[validate(length(min = 1, max = 2000, message = "description is required."))]
    pub description: String,
    /// Mandatory and positive for Fuel requests; discarded for the rest.
    #[serde(default, deserialize_with = "coerce_optional_f64")]
    pub amount: Option<f64>,
    pub confirmed_by: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestData {
    pub request: FuelMaintenanceRequest,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestsData {
    pub requests: Vec<FuelMaintenanceRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_type_parses_all_four_values() {
        for value in ["Fuel", "Service", "Repair and Maintenance", "Compliance"] {
            let parsed = RequestType::parse(value).expect("known request type");
            assert_eq!(parsed.as_str(), value);
        }
        assert_eq!(RequestType::parse("Tow"), None);
    }

    #[test]
    fn category_parses_all_eight_values() {
        let values = [
            "Fuels & Oils",
            "Body Works and Body Parts",
            "Mechanical",
            "Wiring",
            "Puncture & Tires",
            "Insurance",
            "RSL",
            "Inspection / Speed Governors",
        ];
        for value in values {
            let parsed = RequestCategory::parse(value).expect("known category");
            assert_eq!(parsed.as_str(), value);
        }
        assert_eq!(RequestCategory::parse("Paint"), None);
    }

    #[test]
    fn confirmed_by_is_a_closed_set() {
        for value in ["Erick", "Douglas", "James"] {
            assert!(ConfirmedBy::parse(value).is_some());
        }
        assert_eq!(ConfirmedBy::parse("erick"), None);
        assert_eq!(ConfirmedBy::parse("Jane"), None);
    }
}
