//! HTTP implementation of [`MonitoringApi`] on top of reqwest.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use uuid::Uuid;

use super::normalize::{decode_collection, decode_single};
use super::{classify_status, with_refresh, ApiError, Collection, MonitoringApi, PenaltyQuery};
use crate::models::alert::RawAlert;
use crate::models::auth::RegisterPayload;
use crate::models::penalty::{RateUpdate, RawPenalty, RawPenaltyRate};
use crate::models::report::{RawAlertFrequency, RawReportSummary, RawWeightTrend};
use crate::models::vehicle::RawVehicle;
use crate::models::{
    Alert, AlertFrequency, Credentials, Penalty, PenaltyRate, PenaltyStatus, ReportSummary, TokenPair, Vehicle,
    VehiclePayload, WeightTrend,
};
use crate::session::Session;
use crate::utils::datetime::DateRange;

const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Monitoring backend reached over HTTP.
///
/// Authenticated calls read the bearer token from the shared [`Session`]; a
/// 401/403 triggers exactly one refresh-and-retry through [`with_refresh`].
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration, session: Session) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and return the decoded JSON body (`Null` when empty)
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} [{}] failed: {}", method, path, request_id, e);
            ApiError::from(e)
        })?;
        let status = response.status();
        info!("{} {} [{}] -> {}", method, path, request_id, status.as_u16());

        let text = response.text().await?;
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("{} {} [{}] returned invalid JSON: {}", method, path, request_id, e);
            Value::Null
        }))
    }

    async fn send_with_session(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.session.access_token().ok_or(ApiError::Unauthenticated)?;
        self.send(method, path, query, body, Some(&token)).await
    }

    /// Authenticated request with a single refresh-and-retry on 401/403
    async fn authed(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let result = with_refresh(
            || self.send_with_session(method.clone(), path, query, body),
            || async { self.refresh_token().await.map(|_| ()) },
        )
        .await;
        if matches!(result, Err(ApiError::Unauthenticated)) && self.session.is_authenticated() {
            debug!("Clearing session after unrecoverable auth failure");
            self.session.clear();
        }
        result
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.authed(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.authed(Method::POST, path, &[], Some(body)).await
    }

    fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, ApiError> {
        serde_json::to_value(payload).map_err(|e| ApiError::Validation {
            field: "body".to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MonitoringApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        credentials.validate()?;
        let body = Self::to_body(credentials)?;
        let value = self.send(Method::POST, "auth/login/", &[], Some(&body), None).await?;
        let tokens: TokenPair = serde_json::from_value(value).map_err(|_| ApiError::Server {
            status: 200,
            message: "login response did not contain tokens".to_string(),
        })?;
        self.session.acquire(tokens.clone());
        Ok(tokens)
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<(), ApiError> {
        let body = Self::to_body(payload)?;
        self.send(Method::POST, "auth/register/", &[], Some(&body), None).await?;
        Ok(())
    }

    async fn refresh_token(&self) -> Result<String, ApiError> {
        let refresh = self.session.refresh_token().ok_or(ApiError::Unauthenticated)?;
        let body = json!({ "refresh": refresh });
        let value = self
            .send(Method::POST, "auth/token/refresh/", &[], Some(&body), None)
            .await?;
        let access = value
            .get("access")
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .ok_or(ApiError::Unauthenticated)?;
        self.session.update_access(access.clone());
        Ok(access)
    }

    async fn list_vehicles(&self, page: usize, page_size: usize) -> Result<Collection<Vehicle>, ApiError> {
        let query = [("page", page.to_string()), ("page_size", page_size.to_string())];
        let value = self.get("vehicles/", &query).await?;
        Ok(decode_collection::<RawVehicle, Vehicle>(value, "vehicle"))
    }

    async fn create_vehicle(&self, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        let value = self.post("vehicles/", &Self::to_body(payload)?).await?;
        Ok(decode_single::<RawVehicle, Vehicle>(value, "vehicle"))
    }

    async fn update_vehicle(&self, id: i64, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        let body = Self::to_body(payload)?;
        let value = self
            .authed(Method::PATCH, &format!("vehicles/{}/", id), &[], Some(&body))
            .await?;
        Ok(decode_single::<RawVehicle, Vehicle>(value, "vehicle"))
    }

    async fn delete_vehicle(&self, id: i64) -> Result<(), ApiError> {
        self.authed(Method::DELETE, &format!("vehicles/{}/", id), &[], None)
            .await?;
        Ok(())
    }

    async fn list_alerts(&self) -> Result<Collection<Alert>, ApiError> {
        let value = self.get("alerts/", &[]).await?;
        Ok(decode_collection::<RawAlert, Alert>(value, "alert"))
    }

    async fn report_summary(&self, range: &DateRange) -> Result<ReportSummary, ApiError> {
        let query = [("start_date", range.start_param()), ("end_date", range.end_param())];
        let value = self.get("reports/summary/", &query).await?;
        Ok(decode_single::<RawReportSummary, ReportSummary>(value, "report summary"))
    }

    async fn alert_frequency(&self) -> Result<AlertFrequency, ApiError> {
        let value = self.get("reports/alert-frequency/", &[]).await?;
        Ok(decode_single::<RawAlertFrequency, AlertFrequency>(value, "alert frequency"))
    }

    async fn weight_trends(&self) -> Result<WeightTrend, ApiError> {
        let value = self.get("reports/weight-trends/", &[]).await?;
        Ok(decode_single::<RawWeightTrend, WeightTrend>(value, "weight trends"))
    }

    async fn list_penalties(&self, query: &PenaltyQuery) -> Result<Collection<Penalty>, ApiError> {
        let value = self.get("penalties/", &query.to_params()).await?;
        Ok(decode_collection::<RawPenalty, Penalty>(value, "penalty"))
    }

    async fn mark_penalty_paid(&self, id: i64, reference: &str) -> Result<(), ApiError> {
        let body = json!({ "reference_number": reference });
        self.post(&format!("penalties/{}/mark-paid/", id), &body).await?;
        Ok(())
    }

    async fn update_penalty_status(&self, id: i64, status: PenaltyStatus) -> Result<(), ApiError> {
        let body = json!({ "status": status.as_str() });
        self.post(&format!("penalties/{}/status/", id), &body).await?;
        Ok(())
    }

    async fn get_penalty_rate(&self) -> Result<PenaltyRate, ApiError> {
        let value = self.get("penalties/rate/", &[]).await?;
        Ok(decode_single::<RawPenaltyRate, PenaltyRate>(value, "penalty rate"))
    }

    async fn set_penalty_rate(&self, update: &RateUpdate) -> Result<PenaltyRate, ApiError> {
        let value = self.post("penalties/rate/", &Self::to_body(update)?).await?;
        let mut rate: PenaltyRate = decode_single::<RawPenaltyRate, PenaltyRate>(value.clone(), "penalty rate");
        if value.is_null() {
            rate.amount = update.rate;
            rate.notes = update.notes.clone();
        }
        Ok(rate)
    }
}
