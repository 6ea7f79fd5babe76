use ratatui::style::Color;

use crate::models::{AlertSeverity, PenaltyStatus, VehicleStatus};

/// Terminal color for an alert severity
#[must_use]
pub fn severity_color(severity: AlertSeverity) -> Color {
    match severity {
        AlertSeverity::Critical => Color::Rgb(231, 76, 60),
        AlertSeverity::Warning => Color::Rgb(230, 126, 34),
        AlertSeverity::Normal => Color::Rgb(46, 204, 113),
    }
}

/// Terminal color for a vehicle status
#[must_use]
pub fn vehicle_status_color(status: VehicleStatus) -> Color {
    match status {
        VehicleStatus::Active => Color::Rgb(46, 204, 113),
        VehicleStatus::Inactive => Color::Rgb(153, 153, 153),
        VehicleStatus::Maintenance => Color::Rgb(230, 126, 34),
    }
}

/// Terminal color for a penalty status
#[must_use]
pub fn penalty_status_color(status: PenaltyStatus) -> Color {
    match status {
        PenaltyStatus::Paid => Color::Rgb(46, 204, 113),
        PenaltyStatus::Unpaid => Color::Rgb(231, 76, 60),
        PenaltyStatus::Disputed => Color::Rgb(230, 126, 34),
        PenaltyStatus::Waived => Color::Rgb(52, 152, 219),
    }
}
