//! Auth failure handling: status classification and the single refresh retry.

use std::future::Future;

use log::{debug, warn};
use serde_json::Value;

use super::ApiError;

/// Run `op`; on a 401/403 run `refresh` once and retry `op` once.
///
/// A second auth failure, or a failed refresh, becomes
/// [`ApiError::Unauthenticated`]. Non-auth errors pass through untouched.
pub async fn with_refresh<T, Op, OpFut, Refresh, RefreshFut>(mut op: Op, refresh: Refresh) -> Result<T, ApiError>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, ApiError>>,
    Refresh: FnOnce() -> RefreshFut,
    RefreshFut: Future<Output = Result<(), ApiError>>,
{
    match op().await {
        Err(e) if e.is_auth() => {
            debug!("Auth failure ({}), refreshing token once", e);
            if let Err(refresh_err) = refresh().await {
                warn!("Token refresh failed: {}", refresh_err);
                return Err(ApiError::Unauthenticated);
            }
            match op().await {
                Err(e) if e.is_auth() => {
                    warn!("Still unauthorized after refresh: {}", e);
                    Err(ApiError::Unauthenticated)
                }
                other => other,
            }
        }
        other => other,
    }
}

/// Map a non-success HTTP status and its body to an [`ApiError`]
pub fn classify_status(status: u16, body: &str) -> ApiError {
    let json: Option<Value> = serde_json::from_str(body).ok();
    let message = json
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.chars().take(200).collect()
            }
        });

    match status {
        401 => ApiError::Unauthorized(message),
        403 => ApiError::Forbidden(message),
        404 => ApiError::NotFound(message),
        400 | 422 => {
            let field = json
                .as_ref()
                .and_then(first_field_error)
                .map(|(field, _)| field)
                .unwrap_or_else(|| "request".to_string());
            ApiError::Validation { field, message }
        }
        _ => ApiError::Server { status, message },
    }
}

/// `error`, `detail` or `message`, else the first field error
fn error_message(body: &Value) -> Option<String> {
    ["error", "detail", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
        .or_else(|| first_field_error(body).map(|(field, msg)| format!("{}: {}", field, msg)))
}

/// First `{"field": ["message", ..]}` pair of a validation error body
fn first_field_error(body: &Value) -> Option<(String, String)> {
    let map = body.as_object()?;
    map.iter()
        .filter(|(key, _)| !matches!(key.as_str(), "error" | "detail" | "message"))
        .find_map(|(key, value)| {
            let message = match value {
                Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
                Value::String(s) => Some(s.clone()),
                _ => None,
            }?;
            Some((key.clone(), message))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_names_the_field() {
        let err = classify_status(400, r#"{"vehicle_id": ["vehicle with this vehicle id already exists."]}"#);
        assert_eq!(
            err,
            ApiError::Validation {
                field: "vehicle_id".to_string(),
                message: "vehicle_id: vehicle with this vehicle id already exists.".to_string(),
            }
        );
    }

    #[test]
    fn login_error_field_is_used() {
        let err = classify_status(401, r#"{"error": "Invalid credentials"}"#);
        assert_eq!(err, ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    #[test]
    fn plain_text_bodies_are_kept() {
        let err = classify_status(502, "Bad Gateway");
        assert_eq!(
            err,
            ApiError::Server {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
        assert_eq!(classify_status(404, ""), ApiError::NotFound("HTTP 404".to_string()));
    }
}
