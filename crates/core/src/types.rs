use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Account role as issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Patient account
    User,
    Doctor,
}

impl Role {
    pub const ALL: [Self; 2] = [Self::User, Self::Doctor];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Doctor => "DOCTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" | "PATIENT" => Ok(Self::User),
            "DOCTOR" => Ok(Self::Doctor),
            other => Err(CoreError::unknown_role(other)),
        }
    }
}

/// Profile record supplied by the server.
///
/// Only `role` and `username` carry meaning for the client. The login and
/// register responses report the account name as `email`, the profile
/// endpoint as `username`. Anything the client does not know about is kept in
/// `extra`, as are known fields the server sent as an explicit `null`, so the
/// record serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Map<String, JsonValue>",
    into = "Map<String, JsonValue>"
)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub health_id: Option<i64>,
    pub phone: Option<String>,
    pub extra: Map<String, JsonValue>,
}

impl UserProfile {
    /// Build a profile from an arbitrary JSON object
    pub fn from_value(value: JsonValue) -> Result<Self, CoreError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Remove a known field, leaving an explicit `null` behind in `fields`
fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, JsonValue>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match fields.remove(key) {
        None => Ok(None),
        Some(JsonValue::Null) => {
            fields.insert(key.to_string(), JsonValue::Null);
            Ok(None)
        }
        Some(value) => serde_json::from_value(value).map(Some),
    }
}

fn put_field(fields: &mut Map<String, JsonValue>, key: &str, value: Option<JsonValue>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value);
    }
}

impl TryFrom<Map<String, JsonValue>> for UserProfile {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, JsonValue>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: take_field(&mut fields, "id")?,
            username: take_field(&mut fields, "username")?,
            email: take_field(&mut fields, "email")?,
            name: take_field(&mut fields, "name")?,
            role: take_field(&mut fields, "role")?,
            health_id: take_field(&mut fields, "healthId")?,
            phone: take_field(&mut fields, "phone")?,
            extra: fields,
        })
    }
}

impl From<UserProfile> for Map<String, JsonValue> {
    fn from(profile: UserProfile) -> Self {
        let mut fields = profile.extra;
        put_field(&mut fields, "id", profile.id.map(JsonValue::from));
        put_field(&mut fields, "username", profile.username.map(JsonValue::from));
        put_field(&mut fields, "email", profile.email.map(JsonValue::from));
        put_field(&mut fields, "name", profile.name.map(JsonValue::from));
        put_field(&mut fields, "role", profile.role.map(|role| JsonValue::from(role.as_str())));
        put_field(&mut fields, "healthId", profile.health_id.map(JsonValue::from));
        put_field(&mut fields, "phone", profile.phone.map(JsonValue::from));
        fields
    }
}
