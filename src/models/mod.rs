//! Domain models for vehicles, alerts, penalties and reports.
//!
//! Every entity has a lenient wire form (see [`wire`]) that mirrors whatever the
//! backend sends, and a normalized domain form with documented defaults. The
//! conversion never fails: missing or malformed fields fall back to defaults.

pub mod alert;
pub mod auth;
pub mod penalty;
pub mod report;
pub mod vehicle;
pub mod wire;

pub use alert::{Alert, AlertLocation, AlertSeverity, AlertType};
pub use auth::{Credentials, Registration, TokenPair};
pub use penalty::{Penalty, PenaltyRate, PenaltyStatus, VehicleRef};
pub use report::{AlertFrequency, ReportSummary, WeightTrend};
pub use vehicle::{Vehicle, VehicleDraft, VehiclePayload, VehicleStatus};

use serde::{Deserialize, Serialize};

/// A form field failed validation; `field` names the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }

    /// Build a point from two optional halves; both must be present
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::new(latitude?, longitude?)
    }

    /// Parse a `"lat,lon"` string
    pub fn parse(text: &str) -> Option<Self> {
        let (lat, lon) = text.split_once(',')?;
        Self::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
