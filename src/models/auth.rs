//! Login, registration and token payloads.

use serde::{Deserialize, Serialize};

use super::ValidationError;

const MIN_PASSWORD_LEN: usize = 8;

/// Access/refresh token pair returned by `POST /auth/login/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: Some(refresh.into()),
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::new("username", "Username is required"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "Password is required"));
        }
        Ok(())
    }
}

/// Registration form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of `POST /auth/register/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub password: String,
}

impl Registration {
    /// Validate the form; the error names the first offending field
    pub fn validate(&self) -> Result<RegisterPayload, ValidationError> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();

        if full_name.is_empty() {
            return Err(ValidationError::new("full_name", "Full name is required"));
        }
        if email.is_empty() {
            return Err(ValidationError::new("email", "Email is required"));
        }
        if !email.contains('@') {
            return Err(ValidationError::new("email", "Email address is not valid"));
        }
        if phone.is_empty() {
            return Err(ValidationError::new("phone", "Phone number is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::new("confirm_password", "Passwords do not match"));
        }

        Ok(RegisterPayload {
            username: email.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            phone: phone.to_string(),
            password: self.password.clone(),
        })
    }
}
