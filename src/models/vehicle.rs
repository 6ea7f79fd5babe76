//! Vehicle model, its wire form and the create/update form payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::{lenient_bool, lenient_f64, lenient_i64, lenient_list, lenient_string, lenient_timestamp};
use super::{GeoPoint, ValidationError};
use crate::constants::{
    DEFAULT_DRIVER, DEFAULT_MAX_ALLOWED_WEIGHT, DEFAULT_OWNER, DEFAULT_PLATE, DEFAULT_VEHICLE_NAME,
    DEFAULT_VEHICLE_TYPE,
};
use crate::export::Tabular;
use crate::utils::format::{format_number, format_weight};

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    #[default]
    Inactive,
    Maintenance,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [Self::Active, Self::Inactive, Self::Maintenance];

    /// Parse a backend status string; unknown values map to `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }

    /// Next status in the cycle, used by the status selector in forms
    pub fn next(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Maintenance,
            Self::Maintenance => Self::Active,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle exactly as the backend sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVehicle {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub driver: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub owner: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub max_allowed_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub last_reported_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub average_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub weight_alert: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_currently_overloaded: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_report_generated: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_reported_location: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_image: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub alert_history: Option<Vec<serde_json::Value>>,
}

/// Normalized vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    /// Registration plate, the identifier shown to users
    pub plate: String,
    pub name: String,
    /// Vehicle type, e.g. "Truck"
    pub kind: String,
    pub driver: String,
    pub owner: String,
    pub max_allowed_weight: f64,
    pub current_weight: f64,
    pub average_weight: Option<f64>,
    pub status: VehicleStatus,
    pub weight_alert: bool,
    pub last_report_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub location: Option<GeoPoint>,
    pub alert_count: usize,
}

impl From<RawVehicle> for Vehicle {
    fn from(raw: RawVehicle) -> Self {
        let max_allowed_weight = raw.max_allowed_weight.unwrap_or(DEFAULT_MAX_ALLOWED_WEIGHT);
        let current_weight = raw.current_weight.or(raw.last_reported_weight).unwrap_or(0.0);
        Self {
            id: raw.id.unwrap_or_default(),
            plate: raw.vehicle_id.unwrap_or_else(|| DEFAULT_PLATE.to_string()),
            name: raw.vehicle_name.unwrap_or_else(|| DEFAULT_VEHICLE_NAME.to_string()),
            kind: raw.description.unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_string()),
            driver: raw.driver.unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
            owner: raw.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            max_allowed_weight,
            current_weight,
            average_weight: raw.average_weight,
            status: raw
                .status
                .as_deref()
                .and_then(VehicleStatus::parse)
                .unwrap_or_default(),
            weight_alert: raw.weight_alert.or(raw.is_currently_overloaded).unwrap_or(false),
            last_report_at: raw.last_report_generated.or(raw.last_reported_location),
            image_url: raw.vehicle_image,
            location: GeoPoint::from_parts(raw.latitude, raw.longitude),
            alert_count: raw.alert_history.map(|h| h.len()).unwrap_or(0),
        }
    }
}

impl Vehicle {
    /// Current weight minus the maximum allowed weight; positive means over limit
    pub fn overload(&self) -> f64 {
        self.current_weight - self.max_allowed_weight
    }

    /// Over the limit, or flagged by the backend
    pub fn is_overloaded(&self) -> bool {
        self.weight_alert || (self.max_allowed_weight > 0.0 && self.overload() > 0.0)
    }

    /// Case-insensitive match against plate, type and driver
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.plate, &self.kind, &self.driver]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Tabular for Vehicle {
    fn headers() -> Vec<&'static str> {
        vec![
            "Plate Number",
            "Type",
            "Driver",
            "Owner",
            "Max Weight (kg)",
            "Current Weight (kg)",
            "Status",
            "Last Report",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.plate.clone(),
            self.kind.clone(),
            self.driver.clone(),
            self.owner.clone(),
            self.max_allowed_weight.to_string(),
            self.current_weight.to_string(),
            self.status.to_string(),
            self.last_report_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[4] = format_weight(self.max_allowed_weight);
        cells[5] = format_weight(self.current_weight);
        cells
    }

    fn column_widths() -> Vec<u16> {
        vec![14, 10, 16, 16, 14, 14, 12, 17]
    }
}

/// Vehicle create/edit form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDraft {
    pub plate: String,
    pub name: String,
    pub kind: String,
    pub driver: String,
    pub owner: String,
    pub max_allowed_weight: String,
    pub status: VehicleStatus,
}

/// Validated body for `POST /vehicles/` and `PATCH /vehicles/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePayload {
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub description: String,
    pub driver: String,
    pub owner: String,
    pub max_allowed_weight: f64,
    pub status: VehicleStatus,
}

impl VehicleDraft {
    /// Pre-fill the form from an existing vehicle
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            plate: vehicle.plate.clone(),
            name: vehicle.name.clone(),
            kind: vehicle.kind.clone(),
            driver: vehicle.driver.clone(),
            owner: vehicle.owner.clone(),
            max_allowed_weight: format_number(vehicle.max_allowed_weight).replace(',', ""),
            status: vehicle.status,
        }
    }

    /// Validate the form; the error names the first offending field
    pub fn validate(&self) -> Result<VehiclePayload, ValidationError> {
        let plate = self.plate.trim();
        if plate.is_empty() {
            return Err(ValidationError::new("plate", "Plate number is required"));
        }
        if plate.len() > 20 {
            return Err(ValidationError::new("plate", "Plate number must be at most 20 characters"));
        }
        if self.owner.trim().is_empty() {
            return Err(ValidationError::new("owner", "Owner is required"));
        }

        let max_allowed_weight: f64 = self
            .max_allowed_weight
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| ValidationError::new("max_allowed_weight", "Max weight must be a number"))?;
        if !max_allowed_weight.is_finite() || max_allowed_weight <= 0.0 {
            return Err(ValidationError::new(
                "max_allowed_weight",
                "Max weight must be greater than zero",
            ));
        }

        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        Ok(VehiclePayload {
            vehicle_id: plate.to_string(),
            vehicle_name: or_default(&self.name, DEFAULT_VEHICLE_NAME),
            description: or_default(&self.kind, DEFAULT_VEHICLE_TYPE),
            driver: or_default(&self.driver, DEFAULT_DRIVER),
            owner: self.owner.trim().to_string(),
            max_allowed_weight,
            status: self.status,
        })
    }
}
