use loadwatch::aggregate::{group_alerts_by_vehicle, group_by, group_penalties_by_vehicle, grand_total, outstanding_total};
use loadwatch::api::decode_single;
use loadwatch::export::Tabular;
use loadwatch::models::alert::RawAlert;
use loadwatch::models::penalty::RawPenalty;
use loadwatch::models::{Alert, Penalty};
use serde_json::{json, Value};

fn penalty(value: Value) -> Penalty {
    decode_single::<RawPenalty, Penalty>(value, "penalty")
}

fn penalties() -> Vec<Penalty> {
    vec![
        penalty(json!({"id": 1, "vehicle": {"vehicle_id": "T 1 AAA", "registration_number": "REG-1"}, "amount": "50000.10", "overload_amount": 1200, "paid": true})),
        penalty(json!({"id": 2, "vehicle": {"vehicle_id": "T 2 BBB"}, "amount": 25000, "overload_amount": "300.5"})),
        penalty(json!({"id": 3, "vehicle": {"vehicle_id": "T 1 AAA"}, "amount": "0.20", "overload_amount": null})),
        penalty(json!({"id": 4, "vehicle": 12, "amount": null})),
    ]
}

#[test]
fn test_groups_by_plate() {
    let groups = group_penalties_by_vehicle(&penalties());
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["T 1 AAA", "T 2 BBB", "unknown"]);

    let first = &groups[0];
    assert_eq!(first.registration, "REG-1");
    assert_eq!(first.summary.count, 2);
    assert_eq!(first.summary.settled_count, 1);
    assert_eq!(first.summary.unsettled_count(), 1);
    assert_eq!(first.summary.total_amount, 50000.30);
    assert_eq!(first.summary.outstanding_amount, 0.20);
    assert_eq!(first.summary.total_secondary, 1200.0);
    assert_eq!(
        first.summary.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[test]
fn test_missing_amounts_count_as_zero() {
    let groups = group_penalties_by_vehicle(&penalties());
    let unknown = groups.iter().find(|g| g.key == "unknown").unwrap();
    assert_eq!(unknown.summary.count, 1);
    assert_eq!(unknown.summary.total_amount, 0.0);
    assert_eq!(unknown.plate, "N/A");
}

#[test]
fn test_totals_do_not_depend_on_order() {
    let mut reversed = penalties();
    reversed.reverse();

    let forward = group_by(&penalties(), |p| p.vehicle.group_key());
    let backward = group_by(&reversed, |p| p.vehicle.group_key());

    assert_eq!(grand_total(forward.values()), grand_total(backward.values()));
    assert_eq!(grand_total(forward.values()), 75000.30);
    assert_eq!(outstanding_total(forward.values()), 25000.20);
}

#[test]
fn test_empty_input() {
    assert!(group_penalties_by_vehicle(&[]).is_empty());
    let groups = group_by(&Vec::<Penalty>::new(), |p| p.id);
    assert_eq!(grand_total(groups.values()), 0.0);
}

#[test]
fn test_alerts_sum_only_excess_weight() {
    let alerts: Vec<Alert> = [
        json!({"vehicle": {"vehicle_id": "T 9 ZZZ", "max_allowed_weight": 10000}, "current_weight": 12500, "notified": true}),
        json!({"vehicle": {"vehicle_id": "T 9 ZZZ", "max_allowed_weight": 10000}, "current_weight": 9000}),
    ]
    .into_iter()
    .map(|v| decode_single::<RawAlert, Alert>(v, "alert"))
    .collect();

    let groups = group_alerts_by_vehicle(&alerts);
    let summary = &groups["T 9 ZZZ"];
    assert_eq!(summary.total_amount, 2500.0);
    assert_eq!(summary.outstanding_amount, 0.0);
    assert_eq!(summary.total_secondary, 21500.0);
}

#[test]
fn test_grouped_rows_match_headers() {
    let groups = group_penalties_by_vehicle(&penalties());
    for group in &groups {
        assert_eq!(group.cells().len(), loadwatch::aggregate::VehiclePenaltySummary::headers().len());
    }
    assert_eq!(groups[0].cells()[4], "50000.3");
}

#[test]
fn test_paid_and_unpaid_split_per_vehicle() {
    let records = vec![
        penalty(json!({"id": 1, "vehicle": {"vehicle_id": "X"}, "amount": 50000, "paid": true, "status": "paid"})),
        penalty(json!({"id": 2, "vehicle": {"vehicle_id": "X"}, "amount": 50000, "paid": false})),
        penalty(json!({"id": 3, "vehicle": {"vehicle_id": "Y"}, "amount": 30000, "paid": false})),
    ];
    let groups = group_penalties_by_vehicle(&records);
    assert_eq!(groups.len(), 2);

    let x = &groups[0];
    assert_eq!(x.key, "X");
    assert_eq!(x.summary.count, 2);
    assert_eq!(x.summary.settled_count, 1);
    assert_eq!(x.summary.total_amount, 100000.0);
    assert_eq!(x.summary.outstanding_amount, 50000.0);

    let y = &groups[1];
    assert_eq!(y.key, "Y");
    assert_eq!(y.summary.settled_count, 0);
    assert_eq!(y.summary.outstanding_amount, 30000.0);

    assert_eq!(grand_total(groups.iter().map(|g| &g.summary)), 130000.0);
    assert_eq!(outstanding_total(groups.iter().map(|g| &g.summary)), 80000.0);
}

#[test]
fn test_totals_across_groups_are_exact() {
    let records = vec![
        penalty(json!({"id": 1, "vehicle": {"vehicle_id": "A"}, "amount": "0.10"})),
        penalty(json!({"id": 2, "vehicle": {"vehicle_id": "B"}, "amount": "0.20"})),
    ];
    let groups = group_penalties_by_vehicle(&records);
    assert_eq!(grand_total(groups.iter().map(|g| &g.summary)), 0.3);
    assert_eq!(outstanding_total(groups.iter().map(|g| &g.summary)), 0.3);
}
