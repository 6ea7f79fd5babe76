use crate::api::ApiError;
use crate::constants::{
    ERROR_EXPORT, ERROR_LOAD_ALERTS, ERROR_LOAD_DASHBOARD, ERROR_LOAD_PENALTIES, ERROR_LOAD_RATE, ERROR_LOAD_REPORT, ERROR_LOAD_VEHICLES,
    ERROR_LOGIN_FAILED, ERROR_NOTHING_TO_EXPORT, ERROR_PENALTY_PAID, ERROR_PENALTY_STATUS, ERROR_RATE_UPDATE,
    ERROR_REGISTER_FAILED, ERROR_SESSION_EXPIRED, ERROR_VEHICLE_DELETE, ERROR_VEHICLE_SAVE, EXPORT_ALERTS_CSV,
    EXPORT_PENALTIES_CSV, EXPORT_VEHICLES_CSV, EXPORT_VEHICLES_PDF, SUCCESS_EXPORTED, SUCCESS_LOGGED_IN,
    SUCCESS_LOGGED_OUT, SUCCESS_PENALTY_PAID, SUCCESS_PENALTY_STATUS, SUCCESS_RATE_UPDATED, SUCCESS_REGISTERED,
    SUCCESS_VEHICLE_CREATED, SUCCESS_VEHICLE_DELETED, SUCCESS_VEHICLE_UPDATED,
};
use crate::export::{export_path, write_csv_file, write_pdf_file, ExportFormat, Tabular};
use crate::list::{LoadOutcome, PageReset};
use crate::models::ValidationError;
use crate::ui::components::{
    alerts_component, dashboard_component, penalties_component, reports_component, vehicles_component,
    AlertsComponent, DashboardComponent, DialogComponent, PenaltiesComponent, ReportsComponent, SidebarComponent,
    StatusBar, StatusInfo, VehiclesComponent,
};
use crate::ui::core::{
    actions::{Action, DialogType, View},
    event_handler::EventType,
    task_manager::TaskManager,
    AppContext, Component,
};
use crate::ui::layout::LayoutManager;
use crate::utils::datetime::{format_today, DateRange};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info, warn};
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc;

const VEHICLE_REPORT_TITLE: &str = "Vehicle Management Report";

/// Root component: owns every view, the dialog layer and the background tasks
pub struct AppComponent {
    // Component composition
    sidebar: SidebarComponent,
    dashboard: DashboardComponent,
    vehicles: VehiclesComponent,
    alerts: AlertsComponent,
    reports: ReportsComponent,
    penalties: PenaltiesComponent,
    dialog: DialogComponent,

    // Services
    context: AppContext,
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,

    // Simple UI state
    current_view: View,
    should_quit: bool,
    notice: Option<String>,
    user: Option<String>,
    pending_user: Option<String>,
}

impl AppComponent {
    pub fn new(context: AppContext) -> Self {
        let (task_manager, background_action_rx) = TaskManager::new();
        let current_view = context.config.default_view();
        let mut sidebar = SidebarComponent::new();
        sidebar.select(current_view);

        let (dashboard, vehicles, alerts, reports, penalties) = Self::build_views(&context);
        let dialog = DialogComponent::new(context.logger.clone());

        Self {
            sidebar,
            dashboard,
            vehicles,
            alerts,
            reports,
            penalties,
            dialog,
            context,
            task_manager,
            background_action_rx,
            current_view,
            should_quit: false,
            notice: None,
            user: None,
            pending_user: None,
        }
    }

    fn build_views(
        context: &AppContext,
    ) -> (
        DashboardComponent,
        VehiclesComponent,
        AlertsComponent,
        ReportsComponent,
        PenaltiesComponent,
    ) {
        let config = &context.config;
        let page_size = config.ui.page_size;
        let currency = config.display.currency.clone();
        let range = DateRange::last_days(Local::now().date_naive(), config.reports.default_range_days);
        (
            DashboardComponent::new(currency.clone()),
            VehiclesComponent::new(page_size),
            AlertsComponent::new(page_size),
            ReportsComponent::new(range, page_size, config.reports.weight_limit_line),
            PenaltiesComponent::new(page_size, currency),
        )
    }

    /// Drop every loaded record, e.g. after logout
    fn reset_views(&mut self) {
        let (dashboard, vehicles, alerts, reports, penalties) = Self::build_views(&self.context);
        self.dashboard = dashboard;
        self.vehicles = vehicles;
        self.alerts = alerts;
        self.reports = reports;
        self.penalties = penalties;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn dialog(&self) -> &DialogComponent {
        &self.dialog
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    /// Show the login form, or load the start view when a session was restored
    pub fn start(&mut self) {
        if self.context.session.is_authenticated() {
            self.context.logger.log("Session restored".to_string());
            self.load_view(self.current_view, PageReset::Reset);
        } else {
            self.dialog.open(DialogType::Login);
        }
    }

    fn load_view(&mut self, view: View, reset: PageReset) {
        let service = self.context.service.clone();
        match view {
            View::Dashboard => {
                let ticket = self.dashboard.begin_load();
                self.task_manager.spawn_dashboard_load(service, ticket);
            }
            View::Vehicles => {
                let ticket = self.vehicles.begin_load();
                self.task_manager.spawn_vehicle_load(service, ticket, reset);
            }
            View::Alerts => {
                let ticket = self.alerts.begin_load();
                self.task_manager.spawn_alert_load(service, ticket, reset);
            }
            View::Reports => {
                let (ticket, range) = self.reports.begin_load();
                self.task_manager.spawn_report_load(service, range, ticket);
            }
            View::Penalties => {
                let ticket = self.penalties.begin_load();
                let filter = self.penalties.filter.clone();
                self.task_manager
                    .spawn_penalty_load(service.clone(), filter, ticket, reset);
                self.task_manager.spawn_rate_load(service);
            }
        }
    }

    fn switch_to(&mut self, view: View) {
        info!("Switching to {}", view.route());
        self.current_view = view;
        self.sidebar.select(view);
        self.notice = None;
        if self.context.session.is_authenticated() {
            self.load_view(view, PageReset::Preserve);
        }
    }

    /// Back to the login form when the session can no longer be refreshed
    fn expire_session(&mut self, error: &ApiError) -> bool {
        if !error.requires_login() {
            return false;
        }
        warn!("Session expired: {}", error);
        self.context.logger.log(ERROR_SESSION_EXPIRED.to_string());
        self.context.session.clear();
        self.user = None;
        self.dialog.open(DialogType::Login);
        self.dialog
            .reject(ValidationError::new("username", ERROR_SESSION_EXPIRED));
        true
    }

    /// Act on a finished load: stale responses are dropped, errors of applied
    /// ones are logged or end the session
    fn settle_load(&mut self, what: &str, outcome: LoadOutcome, error: Option<ApiError>, message: &str) {
        if outcome == LoadOutcome::Stale {
            debug!("Discarded stale {} response", what);
            return;
        }
        if let Some(e) = error {
            if !self.expire_session(&e) {
                self.context.logger.log(format!("{}: {}", message, e));
            }
        }
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ShowDialog(DialogType::Help),
            KeyCode::Char('G') => Action::ShowDialog(DialogType::Logs),
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('L') => Action::Logout,
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn spawn_mutation<Fut>(&mut self, description: String, success: &'static str, failure: &'static str, op: Fut)
    where
        Fut: std::future::Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        self.context.logger.log(format!("Background: {}", description));
        self.task_manager.spawn_mutation(description, success, failure, op);
    }

    fn export(&mut self, format: ExportFormat) {
        let dir = self.context.config.export.directory.clone();
        let result = match (self.current_view, format) {
            (View::Vehicles, ExportFormat::Csv) => {
                Self::write_export(dir.as_deref(), EXPORT_VEHICLES_CSV, self.vehicles.list.filtered(), |p, rows| {
                    write_csv_file(p, rows)
                })
            }
            (View::Vehicles, ExportFormat::Pdf) => {
                let generated = format!("Generated on {}", format_today());
                Self::write_export(dir.as_deref(), EXPORT_VEHICLES_PDF, self.vehicles.list.filtered(), |p, rows| {
                    write_pdf_file(p, VEHICLE_REPORT_TITLE, &generated, rows)
                })
            }
            (View::Alerts, ExportFormat::Csv) => {
                Self::write_export(dir.as_deref(), EXPORT_ALERTS_CSV, self.alerts.list.filtered(), |p, rows| {
                    write_csv_file(p, rows)
                })
            }
            (View::Penalties, ExportFormat::Csv) => {
                Self::write_export(dir.as_deref(), EXPORT_PENALTIES_CSV, self.penalties.groups(), |p, rows| {
                    write_csv_file(p, rows)
                })
            }
            (view, format) => {
                debug!("No {} export for {}", format.label(), view.name());
                return;
            }
        };

        match result {
            Ok(Some((path, rows))) => {
                self.context
                    .logger
                    .log(format!("Exported {} rows to {}", rows, path.display()));
                self.notice = Some(format!("{} {} rows to {}", SUCCESS_EXPORTED, rows, path.display()));
            }
            Ok(None) => self.notice = Some(ERROR_NOTHING_TO_EXPORT.to_string()),
            Err(e) => {
                self.context.logger.log(format!("{}: {:#}", ERROR_EXPORT, e));
                self.dialog
                    .open(DialogType::Error(format!("{}\n\n{:#}", ERROR_EXPORT, e)));
            }
        }
    }

    /// Write `rows` with `writer`; `Ok(None)` when there is nothing to export
    fn write_export<T, W>(
        dir: Option<&std::path::Path>,
        file_name: &str,
        rows: &[T],
        writer: W,
    ) -> anyhow::Result<Option<(std::path::PathBuf, usize)>>
    where
        T: Tabular,
        W: FnOnce(&std::path::Path, &[T]) -> anyhow::Result<usize>,
    {
        if rows.is_empty() {
            return Ok(None);
        }
        let path = export_path(dir, file_name);
        let written = writer(&path, rows)?;
        Ok(Some((path, written)))
    }

    /// Handle app-level actions that require business logic
    pub fn handle_app_action(&mut self, action: Action) -> Action {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.task_manager.cancel_all_tasks();
            }
            Action::SwitchView(view) => self.switch_to(view),
            Action::NextView => self.switch_to(self.current_view.next()),
            Action::PreviousView => self.switch_to(self.current_view.previous()),
            Action::Refresh | Action::AutoRefresh if !self.context.session.is_authenticated() => {}
            Action::Refresh => {
                self.notice = None;
                self.load_view(self.current_view, PageReset::Preserve);
            }
            Action::AutoRefresh => {
                debug!("Auto-refreshing {}", self.current_view.name());
                self.load_view(self.current_view, PageReset::Preserve);
            }

            // Loads
            Action::VehiclesLoaded { ticket, result, reset } => {
                let error = result.as_ref().err().cloned();
                let outcome = self.vehicles.finish_load(ticket, result, reset);
                self.settle_load("vehicles", outcome, error, ERROR_LOAD_VEHICLES);
            }
            Action::AlertsLoaded { ticket, result, reset } => {
                let error = result.as_ref().err().cloned();
                let outcome = self.alerts.finish_load(ticket, result, reset);
                self.settle_load("alerts", outcome, error, ERROR_LOAD_ALERTS);
            }
            Action::PenaltiesLoaded { ticket, result, reset } => {
                let error = result.as_ref().err().cloned();
                let outcome = self.penalties.finish_load(ticket, result, reset);
                self.settle_load("penalties", outcome, error, ERROR_LOAD_PENALTIES);
            }
            Action::ReportLoaded { ticket, result } => {
                let error = result.as_ref().err().cloned();
                let outcome = self.reports.finish_load(ticket, result);
                self.settle_load("report", outcome, error, ERROR_LOAD_REPORT);
            }
            Action::DashboardLoaded { ticket, result } => {
                let error = result.as_ref().err().cloned();
                let outcome = self.dashboard.finish_load(ticket, result);
                self.settle_load("dashboard", outcome, error, ERROR_LOAD_DASHBOARD);
            }
            Action::PenaltyRateLoaded(result) => match result {
                Ok(rate) => self.penalties.rate = Some(rate),
                Err(e) => self.settle_load("penalty rate", LoadOutcome::Applied, Some(e), ERROR_LOAD_RATE),
            },

            // Server-side filters
            Action::ApplyPenaltyFilter(_) => self.load_view(View::Penalties, PageReset::Reset),
            Action::SetReportRange(_) => self.load_view(View::Reports, PageReset::Reset),

            // Session
            Action::Login(credentials) => {
                self.pending_user = Some(credentials.username.trim().to_string());
                let service = self.context.service.clone();
                self.task_manager.spawn("Login", async move {
                    Action::LoginCompleted(service.login(&credentials).await)
                });
            }
            Action::LoginCompleted(Ok(tokens)) => {
                self.context.session.acquire(tokens);
                self.user = self.pending_user.take();
                self.dialog.close();
                self.notice = Some(SUCCESS_LOGGED_IN.to_string());
                self.load_view(self.current_view, PageReset::Reset);
            }
            Action::LoginCompleted(Err(e)) => {
                self.context.logger.log(format!("Login failed: {}", e));
                let message = match e {
                    ApiError::Validation { message, .. } => message,
                    _ => ERROR_LOGIN_FAILED.to_string(),
                };
                if self.dialog.dialog_type != Some(DialogType::Login) {
                    self.dialog.open(DialogType::Login);
                }
                self.dialog.reject(ValidationError::new("username", message));
            }
            Action::Register(registration) => {
                let service = self.context.service.clone();
                self.task_manager.spawn("Register", async move {
                    Action::RegisterCompleted(service.register(&registration).await)
                });
            }
            Action::RegisterCompleted(Ok(())) => {
                self.dialog.open(DialogType::Login);
                self.notice = Some(SUCCESS_REGISTERED.to_string());
            }
            Action::RegisterCompleted(Err(e)) => {
                self.context.logger.log(format!("{}: {}", ERROR_REGISTER_FAILED, e));
                let error = match e {
                    ApiError::Validation { field, message } => ValidationError::new(field, message),
                    other => ValidationError::new("email", format!("{}: {}", ERROR_REGISTER_FAILED, other)),
                };
                self.dialog.reject(error);
            }
            Action::Logout => {
                self.task_manager.cancel_all_tasks();
                let dropped = self.discard_background_actions();
                if dropped > 0 {
                    debug!("Dropped {} results queued before logout", dropped);
                }
                self.context.session.clear();
                self.context.logger.log("Logged out".to_string());
                self.user = None;
                self.reset_views();
                self.notice = Some(SUCCESS_LOGGED_OUT.to_string());
                self.dialog.open(DialogType::Login);
            }

            // Mutations
            Action::SaveVehicle { id, draft } => {
                let service = self.context.service.clone();
                let success = if id.is_some() {
                    SUCCESS_VEHICLE_UPDATED
                } else {
                    SUCCESS_VEHICLE_CREATED
                };
                self.spawn_mutation(format!("Save vehicle {}", draft.plate), success, ERROR_VEHICLE_SAVE, async move {
                    service.save_vehicle(id, &draft).await.map(|_| ())
                });
            }
            Action::DeleteVehicle(id) => {
                let service = self.context.service.clone();
                self.spawn_mutation(
                    format!("Delete vehicle #{}", id),
                    SUCCESS_VEHICLE_DELETED,
                    ERROR_VEHICLE_DELETE,
                    async move { service.delete_vehicle(id).await },
                );
            }
            Action::MarkPenaltyPaid { id, reference } => {
                let service = self.context.service.clone();
                self.spawn_mutation(
                    format!("Mark penalty #{} paid", id),
                    SUCCESS_PENALTY_PAID,
                    ERROR_PENALTY_PAID,
                    async move { service.mark_penalty_paid(id, &reference).await },
                );
            }
            Action::UpdatePenaltyStatus { id, status } => {
                let service = self.context.service.clone();
                self.spawn_mutation(
                    format!("Set penalty #{} to {}", id, status),
                    SUCCESS_PENALTY_STATUS,
                    ERROR_PENALTY_STATUS,
                    async move { service.update_penalty_status(id, status).await },
                );
            }
            Action::UpdatePenaltyRate { amount, notes } => {
                let service = self.context.service.clone();
                self.spawn_mutation(
                    "Update penalty rate".to_string(),
                    SUCCESS_RATE_UPDATED,
                    ERROR_RATE_UPDATE,
                    async move { service.update_penalty_rate(&amount, &notes).await.map(|_| ()) },
                );
            }
            Action::MutationCompleted { success, failure, result } => match result {
                Ok(()) => {
                    self.context.logger.log(success.to_string());
                    self.notice = Some(success.to_string());
                    self.load_view(self.current_view, PageReset::Preserve);
                }
                Err(e) => {
                    if !self.expire_session(&e) {
                        self.context.logger.log(format!("{}: {}", failure, e));
                        self.dialog.open(DialogType::Error(format!("{}\n\n{}", failure, e)));
                    }
                }
            },
            Action::Export(format) => self.export(format),

            other => return other,
        }
        Action::None
    }

    /// Drain the actions finished background tasks sent back
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(action) = self.background_action_rx.try_recv() {
            actions.push(action);
        }

        let cleaned = self.task_manager.cleanup_finished_tasks();
        if cleaned > 0 {
            debug!("Background: cleaned up {} finished tasks", cleaned);
        }
        actions
    }

    /// Throw away results still queued from cancelled tasks
    fn discard_background_actions(&mut self) -> usize {
        let mut dropped = 0;
        while self.background_action_rx.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }

    /// Log requests that outlived the configured API timeout
    pub fn warn_slow_tasks(&self) {
        for description in self.task_manager.long_running(self.context.config.api.timeout()) {
            warn!("Background task still running: {}", description);
        }
    }

    /// Check if any background operations are running
    pub fn is_busy(&self) -> bool {
        self.task_manager.task_count() > 0
    }

    /// Process an event through the component hierarchy
    pub fn handle_event(&mut self, event_type: EventType) {
        let action = match event_type {
            EventType::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::Quit
            }
            EventType::Key(key) => {
                if self.dialog.is_visible() {
                    // Dialog has priority when visible
                    self.dialog.handle_key_events(key)
                } else {
                    let sidebar_action = self.sidebar.handle_key_events(key);
                    if !matches!(sidebar_action, Action::None) {
                        sidebar_action
                    } else {
                        let view_action = self.current_component().handle_key_events(key);
                        if !matches!(view_action, Action::None) {
                            view_action
                        } else {
                            self.handle_global_key(key)
                        }
                    }
                }
            }
            EventType::Refresh => Action::AutoRefresh,
            EventType::Resize(_, _) | EventType::Tick | EventType::Other => Action::None,
        };

        let action = self.update(action);
        self.handle_app_action(action);
    }

    fn current_component(&mut self) -> &mut dyn Component {
        match self.current_view {
            View::Dashboard => &mut self.dashboard,
            View::Vehicles => &mut self.vehicles,
            View::Alerts => &mut self.alerts,
            View::Reports => &mut self.reports,
            View::Penalties => &mut self.penalties,
        }
    }

    fn status_info(&self) -> StatusInfo {
        let (loading, hints) = match self.current_view {
            View::Dashboard => (self.dashboard.is_loading(), dashboard_component::HINTS),
            View::Vehicles => (self.vehicles.list.is_loading(), vehicles_component::HINTS),
            View::Alerts => (self.alerts.list.is_loading(), alerts_component::HINTS),
            View::Reports => (self.reports.is_loading(), reports_component::HINTS),
            View::Penalties => (self.penalties.list.is_loading(), penalties_component::HINTS),
        };
        StatusInfo {
            loading,
            notice: self.notice.clone(),
            hints,
            user: self.user.clone(),
        }
    }

    /// Load error of the active view, shown as a banner above it
    fn current_error(&self) -> Option<String> {
        let error = match self.current_view {
            View::Dashboard => self.dashboard.error(),
            View::Vehicles => self.vehicles.list.error(),
            View::Alerts => self.alerts.list.error(),
            View::Reports => self.reports.error(),
            View::Penalties => self.penalties.list.error(),
        };
        error.map(str::to_string)
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        // This shouldn't be called directly - use handle_event instead
        self.handle_global_key(key)
    }

    fn update(&mut self, action: Action) -> Action {
        // Process through component hierarchy
        let action = self.dialog.update(action);
        let action = self.sidebar.update(action);

        // Return for app-level handling
        self.current_component().update(action)
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let (top, status_area) = LayoutManager::main_layout(rect);
        let sidebar_width = LayoutManager::sidebar_width(self.context.config.ui.sidebar_width, rect.width);
        let (sidebar_area, main_area) = LayoutManager::top_pane_layout(top, sidebar_width);

        self.sidebar.render(f, sidebar_area);

        let error = self.current_error();
        let (banner_area, view_area) = LayoutManager::banner_layout(main_area, error.is_some());
        if let (Some(area), Some(message)) = (banner_area, error.as_deref()) {
            StatusBar::render_error_banner(f, area, message);
        }
        self.current_component().render(f, view_area);

        StatusBar::render(f, status_area, &self.status_info());

        // Render dialog on top if visible
        if self.dialog.is_visible() {
            self.dialog.render(f, rect);
        }
    }
}
