//! Reusable UI components

pub mod data_table;
pub mod location_map;
pub mod status_bar;

// Component architecture
pub mod alerts_component;
pub mod dashboard_component;
pub mod dialog_component;
pub mod dialogs;
pub mod penalties_component;
pub mod reports_component;
pub mod sidebar_component;
pub mod vehicles_component;

// Component exports
pub use alerts_component::AlertsComponent;
pub use dashboard_component::DashboardComponent;
pub use dialog_component::DialogComponent;
pub use penalties_component::PenaltiesComponent;
pub use reports_component::ReportsComponent;
pub use sidebar_component::SidebarComponent;
pub use status_bar::{StatusBar, StatusInfo};
pub use vehicles_component::VehiclesComponent;
