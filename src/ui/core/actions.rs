use crate::api::ApiError;
use crate::export::ExportFormat;
use crate::list::{AlertFilter, PageReset, PenaltyFilter, RequestTicket, VehicleFilter};
use crate::models::{
    Alert, Credentials, Penalty, PenaltyRate, PenaltyStatus, Registration, TokenPair, Vehicle, VehicleDraft,
};
use crate::service::{DashboardSnapshot, ReportBundle};
use crate::utils::datetime::DateRange;

/// The screens reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Dashboard,
    Vehicles,
    Alerts,
    Reports,
    Penalties,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Vehicles,
        View::Alerts,
        View::Reports,
        View::Penalties,
    ];

    /// Name used in the config file
    pub fn name(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Vehicles => "vehicles",
            View::Alerts => "alerts",
            View::Reports => "reports",
            View::Penalties => "penalties",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Vehicles => "Vehicle Management",
            View::Alerts => "Alerts",
            View::Reports => "Reports",
            View::Penalties => "Penalties",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            View::Dashboard => "/dashboard",
            View::Vehicles => "/vehicle-management",
            View::Alerts => "/alerts",
            View::Reports => "/reports",
            View::Penalties => "/penalties",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            View::Dashboard => "📊",
            View::Vehicles => "🚚",
            View::Alerts => "🚨",
            View::Reports => "📈",
            View::Penalties => "💰",
        }
    }

    /// Accepts the config name or the route (`/vehicle-management`), case-insensitive
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().trim_start_matches('/').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|view| view.name() == key || view.route().trim_start_matches('/') == key)
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogType {
    Login,
    Register,
    VehicleForm {
        id: Option<i64>,
        draft: VehicleDraft,
    },
    DeleteVehicle {
        id: i64,
        plate: String,
    },
    MarkPenaltyPaid {
        id: i64,
    },
    PenaltyStatus {
        id: i64,
        current: PenaltyStatus,
    },
    PenaltyRate {
        current: PenaltyRate,
    },
    VehicleFilter(VehicleFilter),
    AlertFilter(AlertFilter),
    PenaltyFilter(PenaltyFilter),
    ReportRange(DateRange),
    Error(String),
    Info(String),
    Help,
    Logs,
}

impl DialogType {
    /// Dialogs that must stay open until the user is authenticated
    pub fn is_auth(&self) -> bool {
        matches!(self, DialogType::Login | DialogType::Register)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SwitchView(View),
    NextView,
    PreviousView,
    NextRow,
    PreviousRow,

    // Pagination
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,

    // Loading
    Refresh,
    AutoRefresh,
    VehiclesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Vehicle>, ApiError>,
        reset: PageReset,
    },
    AlertsLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Alert>, ApiError>,
        reset: PageReset,
    },
    PenaltiesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<Penalty>, ApiError>,
        reset: PageReset,
    },
    ReportLoaded {
        ticket: RequestTicket,
        result: Result<ReportBundle, ApiError>,
    },
    DashboardLoaded {
        ticket: RequestTicket,
        result: Result<DashboardSnapshot, ApiError>,
    },
    PenaltyRateLoaded(Result<PenaltyRate, ApiError>),

    // Filters
    ApplyVehicleFilter(VehicleFilter),
    ApplyAlertFilter(AlertFilter),
    ApplyPenaltyFilter(PenaltyFilter),
    SetReportRange(DateRange),
    ClearFilter,
    TogglePenaltyGrouping,

    // Session
    Login(Credentials),
    LoginCompleted(Result<TokenPair, ApiError>),
    Register(Registration),
    RegisterCompleted(Result<(), ApiError>),
    Logout,

    // Mutations
    SaveVehicle {
        id: Option<i64>,
        draft: VehicleDraft,
    },
    DeleteVehicle(i64),
    MarkPenaltyPaid {
        id: i64,
        reference: String,
    },
    UpdatePenaltyStatus {
        id: i64,
        status: PenaltyStatus,
    },
    UpdatePenaltyRate {
        amount: String,
        notes: String,
    },
    MutationCompleted {
        success: &'static str,
        failure: &'static str,
        result: Result<(), ApiError>,
    },
    Export(ExportFormat),

    // Dialogs
    ShowDialog(DialogType),
    HideDialog,

    // Application
    Quit,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_parse_names_and_routes() {
        assert_eq!(View::parse("vehicles"), Some(View::Vehicles));
        assert_eq!(View::parse("/vehicle-management"), Some(View::Vehicles));
        assert_eq!(View::parse(" Reports "), Some(View::Reports));
        assert_eq!(View::parse("/login"), None);
    }

    #[test]
    fn view_cycling_wraps() {
        assert_eq!(View::Penalties.next(), View::Dashboard);
        assert_eq!(View::Dashboard.previous(), View::Penalties);
    }
}
