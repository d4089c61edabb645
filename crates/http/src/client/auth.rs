//! Authentication endpoints

use super::{
    error::ClientError,
    typed::{AuthenticatedApiClient, PublicApiClient},
};
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, RolesResponse};
use healthtrack_core::UserProfile;
use reqwest::Method;

/// Authentication endpoints for public client
impl PublicApiClient {
    /// Exchange credentials for a token and profile
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/login")
            .json(credentials);
        self.execute(request).await
    }

    /// Create an account; answers like [`PublicApiClient::login`]
    pub async fn register(&self, user_data: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/register")
            .json(user_data);
        self.execute(request).await
    }

    /// Roles that can be chosen at sign-up
    pub async fn roles(&self) -> Result<RolesResponse, ClientError> {
        let request = self.request(Method::GET, "/api/auth/roles");
        self.execute(request).await
    }
}

/// Endpoints that require a session token
impl AuthenticatedApiClient {
    /// Get the signed-in user's profile
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let request = self.request(Method::GET, "/api/user/profile");
        self.execute(request).await
    }
}
