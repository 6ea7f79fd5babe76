use loadwatch::api::decode_single;
use loadwatch::export::{export_path, to_csv_string, write_csv_file, write_pdf_file, Tabular};
use loadwatch::list::{ListController, PageReset, VehicleFilter};
use loadwatch::models::vehicle::RawVehicle;
use loadwatch::models::{Vehicle, VehicleStatus};
use serde_json::json;
use std::path::Path;

fn fleet(n: usize) -> Vec<Vehicle> {
    (0..n)
        .map(|i| {
            let status = if i % 10 == 0 { "maintenance" } else { "active" };
            decode_single::<RawVehicle, Vehicle>(
                json!({
                    "id": i,
                    "vehicle_id": format!("T {:03} ABC", i),
                    "owner": "Coastal Haulage",
                    "max_allowed_weight": 15000,
                    "current_weight": 12000,
                    "status": status
                }),
                "vehicle",
            )
        })
        .collect()
}

#[test]
fn test_export_uses_the_whole_filtered_set() {
    let mut list = ListController::new(2);
    list.load(fleet(50), PageReset::Reset);
    let filter = VehicleFilter {
        search: String::new(),
        status: Some(VehicleStatus::Maintenance),
    };
    list.apply_filter(filter.predicate());
    assert_eq!(list.visible().len(), 2);

    let csv = to_csv_string(list.filtered()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], Vehicle::headers().join(","));
    assert!(lines[1].starts_with("T 000 ABC,Truck"));
}

#[test]
fn test_csv_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exports").join("vehicles.csv");

    let written = write_csv_file(&path, &fleet(3)).unwrap();
    assert_eq!(written, 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[2][0], "T 002 ABC");
    assert_eq!(&rows[2][3], "Coastal Haulage");
}

#[test]
fn test_csv_quotes_commas() {
    let vehicle = decode_single::<RawVehicle, Vehicle>(json!({"vehicle_id": "T 1", "owner": "Mwanga, Ltd"}), "vehicle");
    let csv = to_csv_string(&[vehicle]).unwrap();
    assert!(csv.contains("\"Mwanga, Ltd\""));
}

#[test]
fn test_empty_export_has_only_headers() {
    let csv = to_csv_string::<Vehicle>(&[]).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn test_pdf_report_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vehicle-report.pdf");

    let written = write_pdf_file(&path, "Vehicle Management Report", "Generated on 2025-04-30", &fleet(60)).unwrap();
    assert_eq!(written, 60);

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_path() {
    assert_eq!(export_path(None, "vehicles.csv"), Path::new("vehicles.csv"));
    assert_eq!(
        export_path(Some(Path::new("/tmp/out")), "vehicles.csv"),
        Path::new("/tmp/out/vehicles.csv")
    );
}
