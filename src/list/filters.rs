//! Filter definitions for the vehicle, alert and penalty lists.
//!
//! Each filter is plain data edited by the UI; `predicate()` turns it into the
//! closure handed to [`ListController::apply_filter`](super::ListController::apply_filter).

use crate::api::PenaltyQuery;
use crate::models::{Alert, AlertSeverity, Penalty, PenaltyStatus, ValidationError, Vehicle, VehicleStatus};
use crate::utils::datetime::DateRange;

/// Parse an optional numeric filter field; blank means "no bound"
pub fn parse_bound(field: &str, input: &str) -> Result<Option<f64>, ValidationError> {
    let input = input.trim().replace(',', "");
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| ValidationError::new(field, "Must be a number"))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    /// Case-insensitive substring of plate, type or driver
    pub search: String,
    pub status: Option<VehicleStatus>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        vehicle.matches_search(&self.search) && self.status.map_or(true, |s| vehicle.status == s)
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.status.is_some()
    }

    pub fn predicate(&self) -> impl Fn(&Vehicle) -> bool + Send + Sync + 'static {
        let filter = self.clone();
        move |vehicle| filter.matches(vehicle)
    }

    /// Step the status filter through all → each status → all
    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(VehicleStatus::ALL[0]),
            Some(current) => VehicleStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| VehicleStatus::ALL.get(i + 1).copied()),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub severity: Option<AlertSeverity>,
    /// Case-insensitive substring of the location text
    pub location: String,
    pub min_overload: Option<f64>,
    /// Case-insensitive substring of the vehicle plate
    pub vehicle: String,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        let location = self.location.trim();
        let vehicle = self.vehicle.trim().to_lowercase();
        self.severity.map_or(true, |s| alert.severity == s)
            && (location.is_empty() || alert.location.contains(location))
            && self.min_overload.map_or(true, |min| alert.overload >= min)
            && (vehicle.is_empty() || alert.vehicle_plate.to_lowercase().contains(&vehicle))
    }

    pub fn is_active(&self) -> bool {
        self.severity.is_some()
            || !self.location.trim().is_empty()
            || self.min_overload.is_some()
            || !self.vehicle.trim().is_empty()
    }

    pub fn predicate(&self) -> impl Fn(&Alert) -> bool + Send + Sync + 'static {
        let filter = self.clone();
        move |alert| filter.matches(alert)
    }

    pub fn cycle_severity(&mut self) {
        self.severity = match self.severity {
            None => Some(AlertSeverity::ALL[0]),
            Some(current) => AlertSeverity::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| AlertSeverity::ALL.get(i + 1).copied()),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenaltyFilter {
    pub range: Option<DateRange>,
    /// Case-insensitive substring of plate, registration or owner
    pub vehicle: String,
    pub status: Option<PenaltyStatus>,
    pub paid: Option<bool>,
    pub min_overload: Option<f64>,
    pub max_overload: Option<f64>,
}

impl PenaltyFilter {
    /// Missing overload amounts compare as 0
    pub fn matches(&self, penalty: &Penalty) -> bool {
        let overload = penalty.overload_amount.unwrap_or(0.0);
        penalty.vehicle.matches(&self.vehicle)
            && self.status.map_or(true, |s| penalty.status == s)
            && self.paid.map_or(true, |p| penalty.paid == p)
            && self.min_overload.map_or(true, |min| overload >= min)
            && self.max_overload.map_or(true, |max| overload <= max)
    }

    pub fn is_active(&self) -> bool {
        !self.vehicle.trim().is_empty()
            || self.status.is_some()
            || self.paid.is_some()
            || self.min_overload.is_some()
            || self.max_overload.is_some()
    }

    pub fn predicate(&self) -> impl Fn(&Penalty) -> bool + Send + Sync + 'static {
        let filter = self.clone();
        move |penalty| filter.matches(penalty)
    }

    /// The same filters as server query parameters
    pub fn to_query(&self) -> PenaltyQuery {
        PenaltyQuery {
            range: self.range,
            vehicle_id: Some(self.vehicle.trim().to_string()).filter(|v| !v.is_empty()),
            status: self.status,
            paid: self.paid,
            min_overload: self.min_overload,
            max_overload: self.max_overload,
        }
    }

    pub fn cycle_status(&mut self) {
        self.status = match self.status {
            None => Some(PenaltyStatus::ALL[0]),
            Some(current) => PenaltyStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| PenaltyStatus::ALL.get(i + 1).copied()),
        };
    }

    /// all → unpaid → paid → all
    pub fn cycle_paid(&mut self) {
        self.paid = match self.paid {
            None => Some(false),
            Some(false) => Some(true),
            Some(true) => None,
        };
    }
}
