//! Type-safe API clients that enforce authentication requirements at compile time

use super::{ClientError, USER_AGENT};
use reqwest::{Client, ClientBuilder, header};
use std::fmt;
use std::time::Duration;

/// Client for public endpoints that don't require authentication
#[derive(Clone, Debug)]
pub struct PublicApiClient {
    client: Client,
    base_url: String,
}

/// Client for endpoints that require a session token
#[derive(Clone)]
pub struct AuthenticatedApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for AuthenticatedApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn build_http_client(
    timeout: Option<Duration>,
    user_agent: Option<String>,
) -> Result<Client, ClientError> {
    let user_agent = user_agent.unwrap_or_else(|| USER_AGENT.to_string());

    #[cfg(not(target_arch = "wasm32"))]
    let client = {
        let mut builder = ClientBuilder::new().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()?
    };

    #[cfg(target_arch = "wasm32")]
    let client = {
        let _ = timeout; // Timeouts not supported on WASM
        ClientBuilder::new().user_agent(user_agent).build()?
    };

    Ok(client)
}

impl PublicApiClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        TypedClientBuilder::new().base_url(base_url).build_public()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        super::execute(request).await
    }

    /// Attach a session token, sharing the connection pool
    pub fn authenticate(&self, token: impl Into<String>) -> AuthenticatedApiClient {
        AuthenticatedApiClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: token.into(),
        }
    }
}

impl AuthenticatedApiClient {
    /// Create a new authenticated client
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        TypedClientBuilder::new()
            .base_url(base_url)
            .build_authenticated(token)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder with authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        super::execute(request).await
    }

    /// Create a public client (useful for calling public endpoints)
    pub fn to_public(&self) -> PublicApiClient {
        PublicApiClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Type-safe builder that creates the appropriate client type
#[derive(Debug, Default)]
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout. Without one, requests wait for the
    /// transport to give up.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    fn take_base_url(&mut self) -> Result<String, ClientError> {
        let base_url = self
            .base_url
            .take()
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        Ok(base_url.trim_end_matches('/').to_string())
    }

    /// Build a public client
    pub fn build_public(mut self) -> Result<PublicApiClient, ClientError> {
        let base_url = self.take_base_url()?;
        let client = build_http_client(self.timeout, self.user_agent)?;
        Ok(PublicApiClient { client, base_url })
    }

    /// Build an authenticated client
    pub fn build_authenticated(
        self,
        token: impl Into<String>,
    ) -> Result<AuthenticatedApiClient, ClientError> {
        Ok(self.build_public()?.authenticate(token))
    }
}
