use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use loadwatch::api::{ApiError, Collection, MonitoringApi, PenaltyQuery};
use loadwatch::config::Config;
use loadwatch::constants::{ERROR_LOGIN_FAILED, ERROR_SESSION_EXPIRED, ERROR_VEHICLE_SAVE, SUCCESS_VEHICLE_CREATED};
use loadwatch::logger::Logger;
use loadwatch::models::auth::RegisterPayload;
use loadwatch::models::penalty::RateUpdate;
use loadwatch::models::{
    Alert, AlertFrequency, Credentials, Penalty, PenaltyRate, PenaltyStatus, ReportSummary, TokenPair, Vehicle,
    VehiclePayload, WeightTrend,
};
use loadwatch::service::DashboardService;
use loadwatch::session::Session;
use loadwatch::ui::components::dialogs::Form;
use loadwatch::ui::core::{Action, AppContext, Component, DialogType, EventType};
use loadwatch::ui::AppComponent;
use loadwatch::utils::datetime::DateRange;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend that can't be reached, except for the vehicle list
#[derive(Default)]
struct OfflineApi {
    /// The next vehicle listing reports an expired session
    expire_next_vehicle_load: AtomicBool,
}

fn offline<T>() -> Result<T, ApiError> {
    Err(ApiError::Network("connection refused".to_string()))
}

#[async_trait]
impl MonitoringApi for OfflineApi {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenPair, ApiError> {
        offline()
    }

    async fn register(&self, _payload: &RegisterPayload) -> Result<(), ApiError> {
        offline()
    }

    async fn refresh_token(&self) -> Result<String, ApiError> {
        offline()
    }

    async fn list_vehicles(&self, _page: usize, _page_size: usize) -> Result<Collection<Vehicle>, ApiError> {
        if self.expire_next_vehicle_load.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Unauthenticated);
        }
        Ok(Collection::new(Vec::new(), 0))
    }

    async fn create_vehicle(&self, _payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        offline()
    }

    async fn update_vehicle(&self, _id: i64, _payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        offline()
    }

    async fn delete_vehicle(&self, _id: i64) -> Result<(), ApiError> {
        offline()
    }

    async fn list_alerts(&self) -> Result<Collection<Alert>, ApiError> {
        offline()
    }

    async fn report_summary(&self, _range: &DateRange) -> Result<ReportSummary, ApiError> {
        offline()
    }

    async fn alert_frequency(&self) -> Result<AlertFrequency, ApiError> {
        offline()
    }

    async fn weight_trends(&self) -> Result<WeightTrend, ApiError> {
        offline()
    }

    async fn list_penalties(&self, _query: &PenaltyQuery) -> Result<Collection<Penalty>, ApiError> {
        offline()
    }

    async fn mark_penalty_paid(&self, _id: i64, _reference: &str) -> Result<(), ApiError> {
        offline()
    }

    async fn update_penalty_status(&self, _id: i64, _status: PenaltyStatus) -> Result<(), ApiError> {
        offline()
    }

    async fn get_penalty_rate(&self) -> Result<PenaltyRate, ApiError> {
        offline()
    }

    async fn set_penalty_rate(&self, _update: &RateUpdate) -> Result<PenaltyRate, ApiError> {
        offline()
    }
}

fn app(session: Session) -> AppComponent {
    app_with(OfflineApi::default(), session, Config::default())
}

fn app_with(api: OfflineApi, session: Session, config: Config) -> AppComponent {
    let service = DashboardService::new(Arc::new(api), Logger::new(), 100);
    AppComponent::new(AppContext::new(service, session, config))
}

fn vehicles_first() -> Config {
    let mut config = Config::default();
    config.ui.default_view = "vehicles".to_string();
    config
}

fn signed_in() -> Session {
    let session = Session::in_memory();
    session.acquire(TokenPair::new("access", "refresh"));
    session
}

fn key(code: KeyCode) -> EventType {
    EventType::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn form_error(app: &AppComponent) -> Option<String> {
    app.dialog().form().and_then(Form::error).map(str::to_string)
}

/// Feed finished background work back through the app, waiting for at least one result
async fn drain(app: &mut AppComponent) -> Vec<Action> {
    for _ in 0..100 {
        let actions = app.process_background_actions();
        if !actions.is_empty() {
            return actions;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Vec::new()
}

#[tokio::test]
async fn signed_out_start_shows_login() {
    let mut app = app(Session::in_memory());
    app.start();

    assert!(app.dialog().is_auth());
    assert_eq!(app.dialog().dialog_type, Some(DialogType::Login));
    assert_eq!(app.active_task_count(), 0);
}

#[tokio::test]
async fn escape_on_login_quits() {
    let mut app = app(Session::in_memory());
    app.start();

    app.handle_event(key(KeyCode::Esc));
    assert!(app.should_quit());
}

#[tokio::test]
async fn failed_login_stays_on_the_form() {
    let mut app = app(Session::in_memory());
    app.start();

    app.handle_app_action(Action::Login(Credentials::new("admin", "secret")));
    let actions = drain(&mut app).await;
    assert!(actions.iter().any(|a| matches!(a, Action::LoginCompleted(Err(_)))));
    for action in actions {
        app.handle_app_action(action);
    }

    assert_eq!(app.dialog().dialog_type, Some(DialogType::Login));
    assert_eq!(form_error(&app).as_deref(), Some(ERROR_LOGIN_FAILED));
}

#[tokio::test]
async fn successful_login_closes_the_form() {
    let session = Session::in_memory();
    let mut app = app(session.clone());
    app.start();

    app.handle_app_action(Action::Login(Credentials::new("admin", "secret")));
    app.handle_app_action(Action::LoginCompleted(Ok(TokenPair::new("access", "refresh"))));

    assert!(!app.dialog().is_visible());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn hide_dialog_does_not_dismiss_login() {
    let mut app = app(Session::in_memory());
    app.start();

    let action = app.update(Action::HideDialog);
    app.handle_app_action(action);
    assert!(app.dialog().is_auth());
}

#[tokio::test]
async fn expired_session_returns_to_login() {
    let session = signed_in();
    let mut app = app(session.clone());
    app.start();
    assert!(!app.dialog().is_visible());

    app.handle_app_action(Action::MutationCompleted {
        success: SUCCESS_VEHICLE_CREATED,
        failure: ERROR_VEHICLE_SAVE,
        result: Err(ApiError::Unauthenticated),
    });

    assert!(!session.is_authenticated());
    assert_eq!(app.dialog().dialog_type, Some(DialogType::Login));
    assert_eq!(form_error(&app).as_deref(), Some(ERROR_SESSION_EXPIRED));
}

#[tokio::test]
async fn failed_mutation_shows_error_dialog() {
    let mut app = app(signed_in());
    app.start();

    app.handle_app_action(Action::MutationCompleted {
        success: SUCCESS_VEHICLE_CREATED,
        failure: ERROR_VEHICLE_SAVE,
        result: Err(ApiError::Network("connection refused".to_string())),
    });

    assert!(matches!(app.dialog().dialog_type, Some(DialogType::Error(ref m)) if m.starts_with(ERROR_VEHICLE_SAVE)));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let session = signed_in();
    let mut app = app(session.clone());
    app.start();

    app.handle_event(key(KeyCode::Char('L')));

    assert!(!session.is_authenticated());
    assert!(app.dialog().is_auth());
    assert_eq!(app.active_task_count(), 0);
}

#[tokio::test]
async fn ctrl_c_quits_even_with_a_dialog_open() {
    let mut app = app(Session::in_memory());
    app.start();

    app.handle_event(EventType::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(app.should_quit());
}

#[tokio::test]
async fn results_queued_before_logout_are_dropped() {
    let session = signed_in();
    let mut app = app(session.clone());
    app.start();
    // let the dashboard load finish without handling its result
    tokio::time::sleep(Duration::from_millis(100)).await;

    app.handle_event(key(KeyCode::Char('L')));
    assert!(app.process_background_actions().is_empty());

    app.handle_app_action(Action::LoginCompleted(Ok(TokenPair::new("access", "refresh"))));
    let actions = drain(&mut app).await;
    assert!(actions.iter().all(|a| matches!(a, Action::DashboardLoaded { .. })));
    for action in actions {
        app.handle_app_action(action);
    }
    assert!(session.is_authenticated());
    assert!(!app.dialog().is_visible());
}

#[tokio::test]
async fn stale_auth_failure_keeps_the_session() {
    let api = OfflineApi {
        expire_next_vehicle_load: AtomicBool::new(true),
    };
    let session = signed_in();
    let mut app = app_with(api, session.clone(), vehicles_first());
    app.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.handle_event(key(KeyCode::Char('r')));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut actions = app.process_background_actions();
    assert_eq!(actions.len(), 2);
    // newest answer first, then the expired one it superseded
    actions.reverse();
    for action in actions {
        app.handle_app_action(action);
    }

    assert!(session.is_authenticated());
    assert!(!app.dialog().is_visible());
}

#[tokio::test]
async fn applied_auth_failure_ends_the_session() {
    let api = OfflineApi {
        expire_next_vehicle_load: AtomicBool::new(true),
    };
    let session = signed_in();
    let mut app = app_with(api, session.clone(), vehicles_first());
    app.start();

    for action in drain(&mut app).await {
        app.handle_app_action(action);
    }

    assert!(!session.is_authenticated());
    assert_eq!(form_error(&app).as_deref(), Some(ERROR_SESSION_EXPIRED));
}
