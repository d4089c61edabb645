//! HealthTrack HTTP client
//!
//! Two client types keep credentials explicit: [`PublicApiClient`] never
//! sends an `Authorization` header, [`AuthenticatedApiClient`] attaches its
//! bearer token to every request it builds. Nothing is shared through
//! global default headers.

pub mod auth;
pub mod error;
pub mod typed;
pub mod user;

pub use error::ClientError;
pub use typed::{AuthenticatedApiClient, PublicApiClient, TypedClientBuilder};

use crate::types::ApiErrorBody;
use tracing::debug;

/// Default user agent sent with every request
pub const USER_AGENT: &str = concat!("healthtrack-client/", env!("CARGO_PKG_VERSION"));

/// Send a request and decode a JSON answer, mapping error statuses
async fn execute<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "API response");

    if status.is_success() {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    } else {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.summary())
            .or_else(|| (!text.is_empty()).then_some(text))
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::from_status(status, message))
    }
}
