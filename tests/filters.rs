use loadwatch::api::decode_single;
use loadwatch::list::filters::parse_bound;
use loadwatch::list::{AlertFilter, PenaltyFilter, VehicleFilter};
use loadwatch::models::alert::RawAlert;
use loadwatch::models::penalty::RawPenalty;
use loadwatch::models::vehicle::RawVehicle;
use loadwatch::models::{Alert, AlertSeverity, Penalty, PenaltyStatus, Vehicle, VehicleStatus};
use serde_json::{json, Value};

fn vehicle(value: Value) -> Vehicle {
    decode_single::<RawVehicle, Vehicle>(value, "vehicle")
}

fn alert(value: Value) -> Alert {
    decode_single::<RawAlert, Alert>(value, "alert")
}

fn penalty(value: Value) -> Penalty {
    decode_single::<RawPenalty, Penalty>(value, "penalty")
}

#[test]
fn test_vehicle_search_is_case_insensitive() {
    let truck = vehicle(json!({"vehicle_id": "T 123 ABC", "description": "Tanker", "driver": "Asha Mussa", "status": "active"}));
    let mut filter = VehicleFilter {
        search: "asha".to_string(),
        status: None,
    };
    assert!(filter.matches(&truck));

    filter.search = "TANK".to_string();
    assert!(filter.matches(&truck));

    filter.status = Some(VehicleStatus::Maintenance);
    assert!(!filter.matches(&truck));
}

#[test]
fn test_vehicle_status_cycle_returns_to_all() {
    let mut filter = VehicleFilter::default();
    assert!(!filter.is_active());
    for expected in VehicleStatus::ALL {
        filter.cycle_status();
        assert_eq!(filter.status, Some(expected));
    }
    filter.cycle_status();
    assert_eq!(filter.status, None);
}

#[test]
fn test_alert_filters_combine() {
    let critical = alert(json!({
        "vehicle": {"vehicle_id": "T 555 XYZ", "max_allowed_weight": 15000},
        "severity": "critical",
        "current_weight": 18000,
        "location": "Kibaha"
    }));
    let warning = alert(json!({"vehicle_id": "T 777 KLM", "severity": "warning", "location": "Chalinze"}));

    let filter = AlertFilter {
        severity: Some(AlertSeverity::Critical),
        location: "kib".to_string(),
        min_overload: Some(2000.0),
        vehicle: "555".to_string(),
    };
    assert!(filter.matches(&critical));
    assert!(!filter.matches(&warning));

    let too_strict = AlertFilter {
        min_overload: Some(5000.0),
        ..filter
    };
    assert!(!too_strict.matches(&critical));
}

#[test]
fn test_penalty_overload_bounds_treat_missing_as_zero() {
    let no_overload = penalty(json!({"status": "unpaid"}));
    let heavy = penalty(json!({"overload_amount": "4200", "vehicle": {"vehicle_id": "T 1 AAA"}}));

    let filter = PenaltyFilter {
        min_overload: Some(1000.0),
        ..Default::default()
    };
    assert!(!filter.matches(&no_overload));
    assert!(filter.matches(&heavy));

    let capped = PenaltyFilter {
        max_overload: Some(100.0),
        ..Default::default()
    };
    assert!(capped.matches(&no_overload));
    assert!(!capped.matches(&heavy));
}

#[test]
fn test_penalty_filter_becomes_query() {
    let filter = PenaltyFilter {
        vehicle: "  T 1 AAA ".to_string(),
        status: Some(PenaltyStatus::Disputed),
        paid: Some(false),
        ..Default::default()
    };
    let params = filter.to_query().to_params();
    assert!(params.contains(&("vehicle_id", "T 1 AAA".to_string())));
    assert!(params.contains(&("status", "disputed".to_string())));
    assert!(params.contains(&("paid", "false".to_string())));
    assert_eq!(params.len(), 3);
}

#[test]
fn test_paid_cycle() {
    let mut filter = PenaltyFilter::default();
    filter.cycle_paid();
    assert_eq!(filter.paid, Some(false));
    filter.cycle_paid();
    assert_eq!(filter.paid, Some(true));
    filter.cycle_paid();
    assert_eq!(filter.paid, None);
}

#[test]
fn test_parse_bound() {
    assert_eq!(parse_bound("min_overload", "  "), Ok(None));
    assert_eq!(parse_bound("min_overload", "1,500"), Ok(Some(1500.0)));
    let err = parse_bound("min_overload", "heavy").unwrap_err();
    assert_eq!(err.field, "min_overload");
}
