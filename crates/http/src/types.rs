//! Request and response bodies of the HealthTrack API

use healthtrack_core::{Role, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Login credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Account type to authenticate against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<Role>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_type: None,
        }
    }

    #[must_use]
    pub const fn user_type(mut self, role: Role) -> Self {
        self.user_type = Some(role);
        self
    }
}

/// Sign-up data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub user_type: Role,
    /// Additional profile fields (name, phone, healthId, ...)
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>, user_type: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_type,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Body returned by login and register: a token plus the profile fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl AuthResponse {
    /// Split into the token and the remaining profile
    pub fn into_parts(self) -> (String, UserProfile) {
        (self.token, self.profile)
    }
}

/// Roles offered at sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<Role>,
}

/// Answer of the availability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Error body sent with 4xx answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Human readable summary, `None` when the body carries nothing useful
    pub fn summary(&self) -> Option<String> {
        match (self.error.as_deref(), self.message.as_deref()) {
            (Some(error), Some(message)) if !message.is_empty() => {
                Some(format!("{error}: {message}"))
            }
            (Some(error), _) => Some(error.to_string()),
            (None, Some(message)) => Some(message.to_string()),
            (None, None) => None,
        }
    }
}
