use async_trait::async_trait;
use chrono::NaiveDate;
use loadwatch::api::{decode_single, ApiError, Collection, MonitoringApi, PenaltyQuery};
use loadwatch::list::PenaltyFilter;
use loadwatch::logger::Logger;
use loadwatch::models::alert::RawAlert;
use loadwatch::models::auth::RegisterPayload;
use loadwatch::models::penalty::{RateUpdate, RawPenalty};
use loadwatch::models::vehicle::RawVehicle;
use loadwatch::models::{
    Alert, AlertFrequency, Credentials, Penalty, PenaltyRate, PenaltyStatus, Registration, ReportSummary, TokenPair,
    Vehicle, VehicleDraft, VehiclePayload, VehicleStatus, WeightTrend,
};
use loadwatch::service::{DashboardService, DashboardSnapshot};
use loadwatch::utils::datetime::DateRange;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// In-memory backend recording the calls it receives
#[derive(Default)]
struct FakeApi {
    vehicles: Vec<Vehicle>,
    alerts: Vec<Alert>,
    penalties: Vec<Penalty>,
    fail_trends: bool,
    fail_summary: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitoringApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.record("login");
        if credentials.password == "secret" {
            Ok(TokenPair::new("access", "refresh"))
        } else {
            Err(ApiError::Unauthorized("Invalid credentials".to_string()))
        }
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<(), ApiError> {
        self.record(format!("register {}", payload.username));
        Ok(())
    }

    async fn refresh_token(&self) -> Result<String, ApiError> {
        Ok("access-2".to_string())
    }

    async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<Collection<Vehicle>, ApiError> {
        self.record(format!("vehicles page {page}"));
        let start = (page - 1) * page_size;
        let items = self.vehicles.iter().skip(start).take(page_size).cloned().collect();
        Ok(Collection::new(items, self.vehicles.len()))
    }

    async fn create_vehicle(&self, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        self.record(format!("create {}", payload.vehicle_id));
        Ok(vehicle(0, &payload.vehicle_id))
    }

    async fn update_vehicle(&self, id: i64, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        self.record(format!("update {id} {}", payload.vehicle_id));
        Ok(vehicle(id, &payload.vehicle_id))
    }

    async fn delete_vehicle(&self, id: i64) -> Result<(), ApiError> {
        self.record(format!("delete {id}"));
        Ok(())
    }

    async fn list_alerts(&self) -> Result<Collection<Alert>, ApiError> {
        Ok(Collection::from_items(self.alerts.clone()))
    }

    async fn report_summary(&self, range: &DateRange) -> Result<ReportSummary, ApiError> {
        self.record(format!("summary {range}"));
        if self.fail_summary {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(ReportSummary {
            critical_alerts: 2,
            warning_alerts: 1,
            normal_vehicles: 7,
            overload_alerts: self.alerts.clone(),
        })
    }

    async fn alert_frequency(&self) -> Result<AlertFrequency, ApiError> {
        Ok(AlertFrequency {
            months: vec!["Jul".to_string()],
            critical: vec![4.0],
            warning: vec![1.0],
        })
    }

    async fn weight_trends(&self) -> Result<WeightTrend, ApiError> {
        if self.fail_trends {
            Err(ApiError::Network("timeout".to_string()))
        } else {
            Ok(WeightTrend {
                times: vec!["6AM".to_string()],
                average_weights: vec![14000.0],
            })
        }
    }

    async fn list_penalties(&self, query: &PenaltyQuery) -> Result<Collection<Penalty>, ApiError> {
        let params: Vec<String> = query.to_params().iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.record(format!("penalties {}", params.join("&")));
        let items = self
            .penalties
            .iter()
            .filter(|p| query.paid.map_or(true, |paid| p.paid == paid))
            .cloned()
            .collect();
        Ok(Collection::from_items(items))
    }

    async fn mark_penalty_paid(&self, id: i64, reference: &str) -> Result<(), ApiError> {
        self.record(format!("paid {id} {reference}"));
        Ok(())
    }

    async fn update_penalty_status(&self, id: i64, status: PenaltyStatus) -> Result<(), ApiError> {
        self.record(format!("status {id} {status}"));
        Ok(())
    }

    async fn get_penalty_rate(&self) -> Result<PenaltyRate, ApiError> {
        Ok(PenaltyRate::default())
    }

    async fn set_penalty_rate(&self, update: &RateUpdate) -> Result<PenaltyRate, ApiError> {
        self.record(format!("rate {}", update.rate));
        Ok(PenaltyRate {
            amount: update.rate,
            effective_from: None,
            notes: update.notes.clone(),
        })
    }
}

fn vehicle(id: i64, plate: &str) -> Vehicle {
    decode_single::<RawVehicle, Vehicle>(
        json!({"id": id, "vehicle_id": plate, "max_allowed_weight": 15000, "current_weight": 16000, "status": "active"}),
        "vehicle",
    )
}

fn alert(id: i64, severity: &str, notified: bool, timestamp: &str) -> Alert {
    decode_single::<RawAlert, Alert>(
        json!({"id": id, "vehicle_id": "T 1 AAA", "severity": severity, "notified": notified, "timestamp": timestamp}),
        "alert",
    )
}

fn penalty(id: i64, plate: &str, amount: f64, paid: bool) -> Penalty {
    decode_single::<RawPenalty, Penalty>(
        json!({"id": id, "vehicle": {"vehicle_id": plate}, "amount": amount, "paid": paid}),
        "penalty",
    )
}

fn service(api: FakeApi, page_size: usize) -> (DashboardService, Arc<FakeApi>) {
    let api = Arc::new(api);
    (DashboardService::new(api.clone(), Logger::new(), page_size), api)
}

#[tokio::test]
async fn test_vehicle_pages_are_walked() {
    let fleet = (1..=250).map(|i| vehicle(i, &format!("T {i}"))).collect();
    let (service, api) = service(
        FakeApi {
            vehicles: fleet,
            ..Default::default()
        },
        100,
    );

    let vehicles = service.fetch_all_vehicles().await.unwrap();
    assert_eq!(vehicles.len(), 250);
    assert_eq!(
        api.calls(),
        vec!["vehicles page 1", "vehicles page 2", "vehicles page 3"]
    );
}

#[tokio::test]
async fn test_empty_fleet_stops_after_one_page() {
    let (service, api) = service(FakeApi::default(), 100);
    assert!(service.fetch_all_vehicles().await.unwrap().is_empty());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_alerts_put_unnotified_first() {
    let (service, _) = service(
        FakeApi {
            alerts: vec![
                alert(1, "critical", true, "2025-04-30T12:00:00Z"),
                alert(2, "warning", false, "2025-04-01T12:00:00Z"),
                alert(3, "warning", false, "2025-04-20T12:00:00Z"),
            ],
            ..Default::default()
        },
        100,
    );

    let ids: Vec<i64> = service.fetch_alerts().await.unwrap().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_report_falls_back_to_empty_trends() {
    let (service, _) = service(
        FakeApi {
            fail_trends: true,
            ..Default::default()
        },
        100,
    );
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
    );

    let bundle = service.fetch_report(range).await.unwrap();
    assert_eq!(bundle.range, range);
    assert_eq!(bundle.summary.critical_alerts, 2);
    assert_eq!(bundle.frequency.total_critical(), 4.0);
    assert_eq!(bundle.trends, WeightTrend::default());
    assert_eq!(bundle.trends.peak(), 0.0);
    assert!(service.logger().get_logs().iter().any(|l| l.contains("Weight trends unavailable")));
}

#[tokio::test]
async fn test_report_summary_failure_is_an_error() {
    let (service, _) = service(
        FakeApi {
            fail_summary: true,
            ..Default::default()
        },
        100,
    );
    let range = DateRange::last_days(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(), 30);
    assert!(matches!(
        service.fetch_report(range).await,
        Err(ApiError::Server { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_dashboard_counters() {
    let (service, api) = service(
        FakeApi {
            vehicles: vec![vehicle(1, "T 1 AAA"), vehicle(2, "T 2 BBB")],
            alerts: vec![
                alert(1, "critical", false, "2025-04-30T12:00:00Z"),
                alert(2, "warning", true, "2025-04-29T12:00:00Z"),
            ],
            penalties: vec![
                penalty(1, "T 1 AAA", 50000.0, false),
                penalty(2, "T 1 AAA", 25000.5, false),
                penalty(3, "T 2 BBB", 10000.0, true),
            ],
            ..Default::default()
        },
        100,
    );

    let snapshot = service.fetch_dashboard().await.unwrap();
    assert_eq!(snapshot.total_vehicles, 2);
    assert_eq!(snapshot.active_vehicles, 2);
    assert_eq!(snapshot.overloaded_vehicles, 2);
    assert_eq!(snapshot.critical_alerts, 1);
    assert_eq!(snapshot.unpaid_penalties, 2);
    assert_eq!(snapshot.unpaid_amount, 75000.5);
    assert_eq!(snapshot.latest_alerts[0].id, 1);
    assert!(api.calls().iter().any(|c| c == "penalties paid=false"));
}

#[tokio::test]
async fn test_penalty_filter_is_sent_to_the_server() {
    let (service, api) = service(FakeApi::default(), 100);
    let filter = PenaltyFilter {
        vehicle: "T 1 AAA".to_string(),
        status: Some(PenaltyStatus::Unpaid),
        ..Default::default()
    };

    service.fetch_penalties(&filter).await.unwrap();
    assert_eq!(api.calls(), vec!["penalties vehicle_id=T 1 AAA&status=unpaid"]);
}

#[tokio::test]
async fn test_invalid_forms_never_reach_the_api() {
    let (service, api) = service(FakeApi::default(), 100);

    let err = service.save_vehicle(None, &VehicleDraft::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "plate"));

    let err = service.mark_penalty_paid(4, "   ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "reference_number"));

    let err = service.update_penalty_rate("-5", "").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "rate"));

    let err = service.login(&Credentials::new("", "secret")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "username"));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_mutations_reach_the_api() {
    let (service, api) = service(FakeApi::default(), 100);
    let draft = VehicleDraft {
        plate: " T 9 NEW ".to_string(),
        owner: "Coastal Haulage".to_string(),
        max_allowed_weight: "15,000".to_string(),
        status: VehicleStatus::Active,
        ..Default::default()
    };

    service.save_vehicle(None, &draft).await.unwrap();
    service.save_vehicle(Some(9), &draft).await.unwrap();
    service.delete_vehicle(9).await.unwrap();
    service.mark_penalty_paid(4, " RCPT-001 ").await.unwrap();
    service.update_penalty_status(4, PenaltyStatus::Waived).await.unwrap();
    let rate = service.update_penalty_rate("75,000", "new tariff").await.unwrap();
    assert_eq!(rate.amount, 75000.0);

    assert_eq!(
        api.calls(),
        vec![
            "create T 9 NEW",
            "update 9 T 9 NEW",
            "delete 9",
            "paid 4 RCPT-001",
            "status 4 waived",
            "rate 75000",
        ]
    );
}

#[tokio::test]
async fn test_login_and_register() {
    let (service, api) = service(FakeApi::default(), 100);

    let tokens = service.login(&Credentials::new("admin", "secret")).await.unwrap();
    assert_eq!(tokens.access, "access");
    assert!(service.login(&Credentials::new("admin", "wrong")).await.unwrap_err().is_auth());

    let registration = Registration {
        full_name: "Asha Mussa".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+255700000000".to_string(),
        password: "longenough".to_string(),
        confirm_password: "different".to_string(),
    };
    let err = service.register(&registration).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "confirm_password"));

    let registration = Registration {
        confirm_password: "longenough".to_string(),
        ..registration
    };
    service.register(&registration).await.unwrap();
    assert_eq!(api.calls(), vec!["login", "login", "register asha@example.com"]);
}

#[test]
fn dashboard_unpaid_amount_is_exact() {
    let penalties = vec![penalty(1, "A", 0.10, false), penalty(2, "B", 0.20, false), penalty(3, "B", 5.0, true)];
    let snapshot = DashboardSnapshot::from_parts(Vec::new(), Vec::new(), &penalties);
    assert_eq!(snapshot.unpaid_penalties, 2);
    assert_eq!(snapshot.unpaid_amount, 0.3);
}
