//! Sign-up availability checks

use super::{error::ClientError, typed::PublicApiClient};
use crate::types::ExistsResponse;
use reqwest::Method;

impl PublicApiClient {
    /// Whether an account with this username exists
    pub async fn username_exists(&self, username: &str) -> Result<bool, ClientError> {
        self.check_exists("/api/user/check-username", "username", username)
            .await
    }

    /// Whether a patient with this health ID is registered
    pub async fn health_id_exists(&self, health_id: i64) -> Result<bool, ClientError> {
        self.check_exists(
            "/api/user/check-health-id",
            "healthId",
            &health_id.to_string(),
        )
        .await
    }

    /// Whether the phone number is already in use
    pub async fn phone_exists(&self, phone: &str) -> Result<bool, ClientError> {
        self.check_exists("/api/user/check-phone", "phone", phone)
            .await
    }

    async fn check_exists(&self, path: &str, param: &str, value: &str) -> Result<bool, ClientError> {
        let request = self.request(Method::GET, path).query(&[(param, value)]);
        let response: ExistsResponse = self.execute(request).await?;
        Ok(response.exists)
    }
}
