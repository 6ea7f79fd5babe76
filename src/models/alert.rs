//! Weight alerts raised by the monitoring backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::{
    lenient_bool, lenient_f64, lenient_i64, lenient_string, lenient_timestamp, nested, value_to_f64,
    value_to_i64, value_to_string,
};
use super::GeoPoint;
use crate::constants::{DEFAULT_LOCATION, DEFAULT_MAX_ALLOWED_WEIGHT, DEFAULT_PLATE};
use crate::export::Tabular;
use crate::utils::format::{format_overload, format_weight};

/// Alert severity as shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    #[default]
    Normal,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 3] = [Self::Critical, Self::Warning, Self::Normal];

    /// Accepts the backend's `high|medium|low` as well as `critical|warning|normal`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" | "critical" => Some(Self::Critical),
            "medium" | "warning" => Some(Self::Warning),
            "low" | "normal" => Some(Self::Normal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Normal => "normal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Overload,
    SensorMalfunction,
    WeightWarning,
    PenaltyIssued,
    #[default]
    Other,
}

impl AlertType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "overload" => Self::Overload,
            "sensor_malfunction" => Self::SensorMalfunction,
            "weight_warning" => Self::WeightWarning,
            "penalty_issued" => Self::PenaltyIssued,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overload => "Overload",
            Self::SensorMalfunction => "Sensor Malfunction",
            Self::WeightWarning => "Weight Warning",
            Self::PenaltyIssued => "Penalty Issued",
            Self::Other => "Other",
        }
    }
}

/// Where an alert was raised: a place name, a bare coordinate pair, or nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertLocation {
    Named(String),
    Coordinates(GeoPoint),
    Unknown,
}

impl AlertLocation {
    fn resolve(text: Option<String>, point: Option<GeoPoint>) -> Self {
        match (text, point) {
            (Some(text), _) if !text.trim().is_empty() => match GeoPoint::parse(&text) {
                Some(parsed) => Self::Coordinates(parsed),
                None => Self::Named(text.trim().to_string()),
            },
            (_, Some(point)) => Self::Coordinates(point),
            _ => Self::Unknown,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.to_string().to_lowercase().contains(&needle.to_lowercase())
    }
}

impl std::fmt::Display for AlertLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Coordinates(point) => write!(f, "{point}"),
            Self::Unknown => f.write_str(DEFAULT_LOCATION),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAlert {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    /// Either a nested vehicle object or a bare primary key
    pub vehicle: Value,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub alert_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_bool")]
    pub notified: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub map_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    /// Plate of the vehicle that raised the alert
    pub vehicle_plate: String,
    pub vehicle_pk: Option<i64>,
    pub alert_type: AlertType,
    pub message: String,
    pub severity: AlertSeverity,
    pub weight: f64,
    pub max_allowed_weight: f64,
    /// Measured weight minus max allowed weight
    pub overload: f64,
    pub location: AlertLocation,
    pub coordinates: Option<GeoPoint>,
    pub timestamp: Option<DateTime<Utc>>,
    pub notified: bool,
    pub map_url: Option<String>,
}

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        let vehicle = Some(&raw.vehicle);
        let vehicle_plate = nested(vehicle, "vehicle_id")
            .and_then(value_to_string)
            .or(raw.vehicle_id)
            .unwrap_or_else(|| DEFAULT_PLATE.to_string());
        let vehicle_pk = nested(vehicle, "id")
            .and_then(value_to_i64)
            .or_else(|| value_to_i64(&raw.vehicle));
        let max_allowed_weight = nested(vehicle, "max_allowed_weight")
            .and_then(value_to_f64)
            .unwrap_or(DEFAULT_MAX_ALLOWED_WEIGHT);
        let weight = raw.current_weight.unwrap_or(0.0);

        let point = GeoPoint::from_parts(raw.latitude, raw.longitude);
        let location = AlertLocation::resolve(raw.location, point);
        let coordinates = match &location {
            AlertLocation::Coordinates(parsed) => Some(*parsed),
            _ => point,
        };

        Self {
            id: raw.id.unwrap_or_default(),
            vehicle_plate,
            vehicle_pk,
            alert_type: raw.alert_type.as_deref().map(AlertType::parse).unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            severity: raw
                .severity
                .as_deref()
                .and_then(AlertSeverity::parse)
                .unwrap_or_default(),
            weight,
            max_allowed_weight,
            overload: weight - max_allowed_weight,
            location,
            coordinates,
            timestamp: raw.timestamp,
            notified: raw.notified.unwrap_or(false),
            map_url: raw.map_url.filter(|url| !url.is_empty()),
        }
    }
}

impl Alert {
    pub fn is_overload(&self) -> bool {
        self.overload > 0.0
    }
}

/// Stable sort putting unnotified alerts first, newest first within each group
pub fn sort_unnotified_first(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.notified
            .cmp(&b.notified)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}

impl Tabular for Alert {
    fn headers() -> Vec<&'static str> {
        vec!["Vehicle ID", "Weight", "Overload", "Location", "Time", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.vehicle_plate.clone(),
            format_weight(self.weight),
            format_overload(self.overload),
            self.location.to_string(),
            self.timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            self.severity.label().to_string(),
        ]
    }

    fn column_widths() -> Vec<u16> {
        vec![14, 14, 14, 28, 17, 10]
    }
}
