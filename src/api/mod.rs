//! API client layer for the monitoring backend.
//!
//! [`MonitoringApi`] is the seam between the dashboard and the REST backend:
//! [`HttpApi`] talks to the real server, tests plug in an in-memory version.
//! Every collection endpoint returns a normalized [`Collection`] regardless of
//! whether the backend sent a bare array or a `{results, count}` envelope.

use async_trait::async_trait;

pub mod auth;
pub mod client;
pub mod normalize;

pub use auth::{classify_status, with_refresh};
pub use client::HttpApi;
pub use normalize::{decode_collection, decode_single, normalize_collection};

use crate::models::auth::RegisterPayload;
use crate::models::penalty::RateUpdate;
use crate::models::{
    Alert, AlertFrequency, Credentials, Penalty, PenaltyRate, PenaltyStatus, ReportSummary, TokenPair,
    ValidationError, Vehicle, VehiclePayload, WeightTrend,
};
use crate::utils::datetime::DateRange;

/// Errors surfaced by API calls.
///
/// Malformed response bodies have no variant: missing or unparsable fields are
/// replaced by defaults during normalization and only logged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401 before the refresh attempt
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403 before the refresh attempt
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No usable session: missing token, or auth still failing after one refresh
    #[error("Session expired, please log in again")]
    Unauthenticated,

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// 401/403 responses that may succeed after a token refresh
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_))
    }

    /// Errors that should send the user back to the login dialog
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Errors worth offering a retry for
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation {
            field: e.field,
            message: e.message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("request timed out".to_string())
        } else if e.is_connect() {
            Self::Network(format!("cannot connect: {}", e))
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// A normalized collection response
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    /// Total number of records on the server, across all pages
    pub total_count: usize,
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    /// A collection whose count is just its length
    pub fn from_items(items: Vec<T>) -> Self {
        let total_count = items.len();
        Self { items, total_count }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Server-side penalty filters, sent as query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenaltyQuery {
    pub range: Option<DateRange>,
    pub vehicle_id: Option<String>,
    pub status: Option<PenaltyStatus>,
    pub paid: Option<bool>,
    pub min_overload: Option<f64>,
    pub max_overload: Option<f64>,
}

impl PenaltyQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(range) = &self.range {
            params.push(("start_date", range.start_param()));
            params.push(("end_date", range.end_param()));
        }
        if let Some(vehicle) = self.vehicle_id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            params.push(("vehicle_id", vehicle.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(paid) = self.paid {
            params.push(("paid", paid.to_string()));
        }
        if let Some(min) = self.min_overload {
            params.push(("min_overload", min.to_string()));
        }
        if let Some(max) = self.max_overload {
            params.push(("max_overload", max.to_string()));
        }
        params
    }
}

/// The monitoring backend, one method per endpoint.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    // Auth
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;
    async fn register(&self, payload: &RegisterPayload) -> Result<(), ApiError>;
    /// Exchange the stored refresh token for a new access token
    async fn refresh_token(&self) -> Result<String, ApiError>;

    // Vehicles
    async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<Collection<Vehicle>, ApiError>;
    async fn create_vehicle(&self, payload: &VehiclePayload) -> Result<Vehicle, ApiError>;
    async fn update_vehicle(&self, id: i64, payload: &VehiclePayload) -> Result<Vehicle, ApiError>;
    async fn delete_vehicle(&self, id: i64) -> Result<(), ApiError>;

    // Alerts and reports
    async fn list_alerts(&self) -> Result<Collection<Alert>, ApiError>;
    async fn report_summary(&self, range: &DateRange) -> Result<ReportSummary, ApiError>;
    async fn alert_frequency(&self) -> Result<AlertFrequency, ApiError>;
    async fn weight_trends(&self) -> Result<WeightTrend, ApiError>;

    // Penalties
    async fn list_penalties(&self, query: &PenaltyQuery) -> Result<Collection<Penalty>, ApiError>;
    async fn mark_penalty_paid(&self, id: i64, reference: &str) -> Result<(), ApiError>;
    async fn update_penalty_status(&self, id: i64, status: PenaltyStatus) -> Result<(), ApiError>;
    async fn get_penalty_rate(&self) -> Result<PenaltyRate, ApiError>;
    async fn set_penalty_rate(&self, update: &RateUpdate) -> Result<PenaltyRate, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn penalty_query_params_skip_unset_filters() {
        let query = PenaltyQuery {
            range: Some(DateRange::new(
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            )),
            vehicle_id: Some("  ".to_string()),
            paid: Some(false),
            ..Default::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("start_date", "2025-04-01".to_string()),
                ("end_date", "2025-04-30".to_string()),
                ("paid", "false".to_string()),
            ]
        );
    }

    #[test]
    fn auth_errors_are_refreshable() {
        assert!(ApiError::Unauthorized(String::new()).is_auth());
        assert!(ApiError::Forbidden(String::new()).is_auth());
        assert!(!ApiError::Unauthenticated.is_auth());
        assert!(ApiError::Unauthenticated.requires_login());
    }
}
