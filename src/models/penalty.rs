//! Overload penalties and the process-wide penalty rate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::{lenient_bool, lenient_f64, lenient_i64, lenient_string, lenient_timestamp, nested, value_to_i64, value_to_string};
use super::{GeoPoint, ValidationError};
use crate::constants::{DEFAULT_PENALTY_RATE, DEFAULT_PLATE};
use crate::export::Tabular;
use crate::utils::format::{format_number, format_optional, NOT_AVAILABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyStatus {
    #[default]
    Unpaid,
    Paid,
    Disputed,
    Waived,
}

impl PenaltyStatus {
    pub const ALL: [PenaltyStatus; 4] = [Self::Unpaid, Self::Paid, Self::Disputed, Self::Waived];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            "disputed" => Some(Self::Disputed),
            "waived" => Some(Self::Waived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Disputed => "disputed",
            Self::Waived => "waived",
        }
    }
}

impl std::fmt::Display for PenaltyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vehicle a penalty belongs to, as embedded in the penalty payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRef {
    pub id: Option<i64>,
    pub plate: Option<String>,
    pub name: Option<String>,
    pub registration: Option<String>,
    pub owner: Option<String>,
}

impl VehicleRef {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| nested(Some(value), key).and_then(value_to_string);
        Self {
            id: nested(Some(value), "id")
                .and_then(value_to_i64)
                .or_else(|| value_to_i64(value)),
            plate: field("vehicle_id"),
            name: field("vehicle_name"),
            registration: field("registration_number"),
            owner: field("owner"),
        }
    }

    /// Grouping key; penalties without a plate fall into `"unknown"`
    pub fn group_key(&self) -> String {
        self.plate.clone().unwrap_or_else(|| "unknown".to_string())
    }

    pub fn plate_or_default(&self) -> &str {
        self.plate.as_deref().unwrap_or(DEFAULT_PLATE)
    }

    /// Case-insensitive match against plate, registration and owner
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.plate, &self.registration, &self.owner]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPenalty {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    pub vehicle: Value,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub overload_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_bool")]
    pub paid: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_string")]
    pub reference_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub id: i64,
    pub vehicle: VehicleRef,
    /// Overload in kg; `None` when the backend sent nothing usable
    pub overload_amount: Option<f64>,
    /// Amount in the configured currency; `None` when missing
    pub amount: Option<f64>,
    pub paid: bool,
    pub status: PenaltyStatus,
    pub reference_number: Option<String>,
    pub notes: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
}

impl From<RawPenalty> for Penalty {
    fn from(raw: RawPenalty) -> Self {
        let status = raw.status.as_deref().and_then(PenaltyStatus::parse);
        let paid = raw.paid.unwrap_or(status == Some(PenaltyStatus::Paid));
        let status = status.unwrap_or(if paid { PenaltyStatus::Paid } else { PenaltyStatus::Unpaid });
        Self {
            id: raw.id.unwrap_or_default(),
            vehicle: VehicleRef::from_value(&raw.vehicle),
            overload_amount: raw.overload_amount,
            amount: raw.amount,
            paid,
            status,
            reference_number: raw.reference_number,
            notes: raw.notes.unwrap_or_default(),
            timestamp: raw.timestamp,
            paid_date: raw.paid_date,
            location: GeoPoint::from_parts(raw.latitude, raw.longitude),
        }
    }
}

impl Tabular for Penalty {
    fn headers() -> Vec<&'static str> {
        vec!["Date", "Time", "Vehicle", "Overload (kg)", "Amount", "Status", "Reference"]
    }

    fn cells(&self) -> Vec<String> {
        let (date, time) = self
            .timestamp
            .map(|ts| (ts.format("%Y-%m-%d").to_string(), ts.format("%H:%M").to_string()))
            .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()));
        let status = if self.paid && self.status == PenaltyStatus::Paid {
            "paid ✓".to_string()
        } else {
            self.status.to_string()
        };
        vec![
            date,
            time,
            self.vehicle.plate_or_default().to_string(),
            format_optional(self.overload_amount),
            format_optional(self.amount),
            status,
            self.reference_number
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ]
    }

    fn column_widths() -> Vec<u16> {
        vec![11, 6, 14, 14, 12, 12, 18]
    }
}

/// Current penalty rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRate {
    pub amount: f64,
    pub effective_from: Option<DateTime<Utc>>,
    pub notes: String,
}

impl Default for PenaltyRate {
    fn default() -> Self {
        Self {
            amount: DEFAULT_PENALTY_RATE,
            effective_from: None,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPenaltyRate {
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rate: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

impl From<RawPenaltyRate> for PenaltyRate {
    fn from(raw: RawPenaltyRate) -> Self {
        Self {
            amount: raw.amount.or(raw.rate).unwrap_or(DEFAULT_PENALTY_RATE),
            effective_from: raw.effective_from,
            notes: raw.notes.unwrap_or_default(),
        }
    }
}

impl PenaltyRate {
    pub fn display_amount(&self) -> String {
        format_number(self.amount)
    }
}

/// Body of `POST /penalties/rate/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateUpdate {
    pub rate: f64,
    pub notes: String,
}

impl RateUpdate {
    /// Validate the rate form input
    pub fn parse(amount: &str, notes: &str) -> Result<Self, ValidationError> {
        let rate: f64 = amount
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| ValidationError::new("rate", "Rate must be a number"))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::new("rate", "Rate must be greater than zero"));
        }
        Ok(Self {
            rate,
            notes: notes.trim().to_string(),
        })
    }
}

/// Validate a payment reference number for mark-paid
pub fn validate_reference(reference: &str) -> Result<String, ValidationError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ValidationError::new("reference_number", "Reference number is required"));
    }
    if reference.chars().count() > 50 {
        return Err(ValidationError::new(
            "reference_number",
            "Reference number must be at most 50 characters",
        ));
    }
    Ok(reference.to_string())
}
