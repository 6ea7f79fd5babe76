//! Dashboard service: the data layer between the views and the monitoring API.
//!
//! [`DashboardService`] wraps a [`MonitoringApi`] implementation and offers the
//! operations the views need:
//! - fetching whole collections (walking server pages for vehicles)
//! - report bundles fetched concurrently, with zero-series fallbacks
//! - dashboard overview counters
//! - validated mutations (vehicles, penalties, penalty rate)
//!
//! Mutations never patch local state; the caller refetches afterwards.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::aggregate::{group_penalties_by_vehicle, outstanding_total, VehiclePenaltySummary};
use crate::api::{ApiError, MonitoringApi, PenaltyQuery};
use crate::list::PenaltyFilter;
use crate::logger::Logger;
use crate::models::alert::sort_unnotified_first;
use crate::models::penalty::{validate_reference, RateUpdate};
use crate::models::{
    Alert, AlertFrequency, AlertSeverity, Credentials, Penalty, PenaltyRate, PenaltyStatus, Registration,
    ReportSummary, TokenPair, Vehicle, VehicleDraft, VehicleStatus, WeightTrend,
};
use crate::utils::datetime::DateRange;

/// Upper bound on server pages walked for one vehicle fetch
const MAX_VEHICLE_PAGES: usize = 1000;
/// Number of alerts shown on the dashboard
const LATEST_ALERTS: usize = 5;

/// Everything the Reports view shows for one date range
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBundle {
    pub range: DateRange,
    pub summary: ReportSummary,
    pub frequency: AlertFrequency,
    pub trends: WeightTrend,
}

/// Overview counters for the Dashboard view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub overloaded_vehicles: usize,
    pub critical_alerts: usize,
    pub unpaid_penalties: usize,
    pub unpaid_amount: f64,
    /// Newest alerts first, unnotified before notified
    pub latest_alerts: Vec<Alert>,
    pub vehicles: Vec<Vehicle>,
}

impl DashboardSnapshot {
    pub fn from_parts(vehicles: Vec<Vehicle>, alerts: Vec<Alert>, penalties: &[Penalty]) -> Self {
        let groups: Vec<VehiclePenaltySummary> = group_penalties_by_vehicle(penalties);
        let unpaid_penalties = groups.iter().map(|g| g.summary.unsettled_count()).sum();
        let unpaid_amount = outstanding_total(groups.iter().map(|g| &g.summary));

        let mut latest_alerts = alerts.clone();
        latest_alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        latest_alerts.truncate(LATEST_ALERTS);
        sort_unnotified_first(&mut latest_alerts);

        Self {
            total_vehicles: vehicles.len(),
            active_vehicles: vehicles.iter().filter(|v| v.status == VehicleStatus::Active).count(),
            overloaded_vehicles: vehicles.iter().filter(|v| v.is_overloaded()).count(),
            critical_alerts: alerts
                .iter()
                .filter(|a| a.severity == AlertSeverity::Critical)
                .count(),
            unpaid_penalties,
            unpaid_amount,
            latest_alerts,
            vehicles,
        }
    }
}

/// Data access layer for the dashboard views.
///
/// Cheap to clone; every clone shares the same API client, so background
/// tasks can each own one.
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn MonitoringApi>,
    logger: Logger,
    fetch_page_size: usize,
}

impl DashboardService {
    /// Creates a service over `api`.
    ///
    /// # Arguments
    /// * `api` - Monitoring backend implementation
    /// * `logger` - In-app log buffer shown in the logs dialog
    /// * `fetch_page_size` - Server page size used when walking vehicle pages
    pub fn new(api: Arc<dyn MonitoringApi>, logger: Logger, fetch_page_size: usize) -> Self {
        Self {
            api,
            logger,
            fetch_page_size: fetch_page_size.max(1),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        credentials.validate()?;
        let tokens = self.api.login(credentials).await?;
        self.logger.log(format!("Logged in as {}", credentials.username.trim()));
        Ok(tokens)
    }

    /// Validate and submit a registration form
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let payload = registration.validate()?;
        self.api.register(&payload).await?;
        self.logger.log(format!("Registered {}", payload.email));
        Ok(())
    }

    /// Fetch every vehicle, walking server pages until the reported count is reached
    pub async fn fetch_all_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        let mut vehicles = Vec::new();
        for page in 1..=MAX_VEHICLE_PAGES {
            let collection = self.api.list_vehicles(page, self.fetch_page_size).await?;
            let received = collection.items.len();
            vehicles.extend(collection.items);
            debug!(
                "Vehicle page {}: {} items ({} of {})",
                page,
                received,
                vehicles.len(),
                collection.total_count
            );
            if received == 0 || received < self.fetch_page_size || vehicles.len() >= collection.total_count {
                break;
            }
        }
        info!("✅ Fetched {} vehicles from API", vehicles.len());
        self.logger.log(format!("Fetched {} vehicles", vehicles.len()));
        Ok(vehicles)
    }

    /// Fetch all alerts, unnotified first
    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let mut alerts = self.api.list_alerts().await?.items;
        sort_unnotified_first(&mut alerts);
        info!("✅ Fetched {} alerts from API", alerts.len());
        self.logger.log(format!("Fetched {} alerts", alerts.len()));
        Ok(alerts)
    }

    /// Fetch penalties with the filter sent as server query parameters
    pub async fn fetch_penalties(&self, filter: &PenaltyFilter) -> Result<Vec<Penalty>, ApiError> {
        let penalties = self.api.list_penalties(&filter.to_query()).await?.items;
        info!("✅ Fetched {} penalties from API", penalties.len());
        self.logger.log(format!("Fetched {} penalties", penalties.len()));
        Ok(penalties)
    }

    /// Summary, frequency and trends for `range`, fetched concurrently.
    ///
    /// Only a summary failure is an error; frequency and trend failures fall
    /// back to their zero series.
    pub async fn fetch_report(&self, range: DateRange) -> Result<ReportBundle, ApiError> {
        let (summary, frequency, trends) = tokio::join!(
            self.api.report_summary(&range),
            self.api.alert_frequency(),
            self.api.weight_trends()
        );

        let summary = summary?;
        let frequency = frequency.unwrap_or_else(|e| {
            warn!("Alert frequency unavailable, using empty series: {}", e);
            self.logger.log(format!("Alert frequency unavailable: {}", e));
            AlertFrequency::default()
        });
        let trends = trends.unwrap_or_else(|e| {
            warn!("Weight trends unavailable, using empty series: {}", e);
            self.logger.log(format!("Weight trends unavailable: {}", e));
            WeightTrend::default()
        });

        let mut summary = summary;
        sort_unnotified_first(&mut summary.overload_alerts);

        Ok(ReportBundle {
            range,
            summary,
            frequency,
            trends,
        })
    }

    /// Vehicles, alerts and unpaid penalties folded into overview counters
    pub async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, ApiError> {
        let unpaid = PenaltyQuery {
            paid: Some(false),
            ..Default::default()
        };
        let (vehicles, alerts, penalties) = tokio::join!(
            self.fetch_all_vehicles(),
            self.api.list_alerts(),
            self.api.list_penalties(&unpaid)
        );
        let vehicles = vehicles?;
        let alerts = alerts?.items;
        let penalties = penalties.map(|c| c.items).unwrap_or_else(|e| {
            warn!("Penalties unavailable for dashboard: {}", e);
            Vec::new()
        });
        Ok(DashboardSnapshot::from_parts(vehicles, alerts, &penalties))
    }

    /// Create (`id == None`) or update a vehicle from its form
    pub async fn save_vehicle(&self, id: Option<i64>, draft: &VehicleDraft) -> Result<Vehicle, ApiError> {
        let payload = draft.validate()?;
        let vehicle = match id {
            Some(id) => self.api.update_vehicle(id, &payload).await?,
            None => self.api.create_vehicle(&payload).await?,
        };
        self.logger.log(format!(
            "{} vehicle {}",
            if id.is_some() { "Updated" } else { "Created" },
            payload.vehicle_id
        ));
        Ok(vehicle)
    }

    pub async fn delete_vehicle(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete_vehicle(id).await?;
        self.logger.log(format!("Deleted vehicle #{}", id));
        Ok(())
    }

    pub async fn mark_penalty_paid(&self, id: i64, reference: &str) -> Result<(), ApiError> {
        let reference = validate_reference(reference)?;
        self.api.mark_penalty_paid(id, &reference).await?;
        self.logger.log(format!("Penalty #{} marked as paid ({})", id, reference));
        Ok(())
    }

    pub async fn update_penalty_status(&self, id: i64, status: PenaltyStatus) -> Result<(), ApiError> {
        self.api.update_penalty_status(id, status).await?;
        self.logger.log(format!("Penalty #{} status set to {}", id, status));
        Ok(())
    }

    pub async fn penalty_rate(&self) -> Result<PenaltyRate, ApiError> {
        self.api.get_penalty_rate().await
    }

    /// Validate and submit a new penalty rate
    pub async fn update_penalty_rate(&self, amount: &str, notes: &str) -> Result<PenaltyRate, ApiError> {
        let update = RateUpdate::parse(amount, notes)?;
        let rate = self.api.set_penalty_rate(&update).await?;
        self.logger.log(format!("Penalty rate set to {}", update.rate));
        Ok(rate)
    }
}
