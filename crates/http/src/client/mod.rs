//! Garage HTTP client
//!
//! Thin wrapper over `reqwest` giving every frontend module the same
//! defaults: 30 second timeout, the page's anti-forgery token on every
//! request, and one envelope-aware execute path.

pub mod error;
pub mod upload;

use error::ClientError;
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::types::ApiEnvelope;

/// Header carrying the anti-forgery token echoed back on every call.
pub const VERIFICATION_TOKEN_HEADER: &str = "RequestVerificationToken";

/// Every request aborts and takes the error path after this long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Garage API client
#[derive(Clone)]
pub struct GarageClient {
    client: Client,
    base_url: String,
    verification_token: Option<String>,
}

impl GarageClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> GarageClientBuilder {
        GarageClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder with the shared default headers.
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = &self.verification_token {
            request = request.header(VERIFICATION_TOKEN_HEADER, token);
        }

        request
    }

    /// GET with query-string parameters.
    pub fn get<T: Serialize + ?Sized>(&self, path: &str, query: &T) -> reqwest::RequestBuilder {
        self.request(Method::GET, path).query(query)
    }

    /// POST with form-encoded parameters.
    pub fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        fields: &T,
    ) -> reqwest::RequestBuilder {
        self.request(Method::POST, path).form(fields)
    }

    /// PUT with a JSON text body (`content-type: application/json`).
    pub fn put_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path).json(body)
    }

    /// DELETE with query-string parameters.
    pub fn delete<T: Serialize + ?Sized>(&self, path: &str, query: &T) -> reqwest::RequestBuilder {
        self.request(Method::DELETE, path).query(query)
    }

    /// Execute a request and deserialize the success body.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let raw = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, raw))
        }
    }

    /// Execute a request and parse the standard API envelope.
    pub async fn execute_envelope(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiEnvelope, ClientError> {
        self.execute(request).await
    }
}

/// Builder for GarageClient
#[derive(Default)]
pub struct GarageClientBuilder {
    base_url: Option<String>,
    verification_token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl GarageClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the anti-forgery token read from the page markup at load time.
    /// When absent the header is simply omitted.
    pub fn verification_token(mut self, token: impl Into<String>) -> Self {
        self.verification_token = Some(token.into());
        self
    }

    /// Override the default 30 second request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GarageClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| "garage-client/0.1.0".to_string()),
            )
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(GarageClient {
            client,
            base_url,
            verification_token: self.verification_token,
        })
    }
}

/// Per-call request descriptor: target, verb, payload and optional
/// overrides, built fresh for every dispatch and never persisted.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub url: String,
    pub method: Method,
    pub payload: Payload,
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
}

/// Payload attached to a [`RequestSpec`].
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    None,
    /// Query-string parameters (GET/DELETE).
    Query(Vec<(String, String)>),
    /// Form-encoded fields (POST).
    Form(Vec<(String, String)>),
    /// JSON text body (PUT, or explicit JSON POST).
    Json(serde_json::Value),
}

impl RequestSpec {
    fn new(method: Method, url: impl Into<String>, payload: Payload) -> Self {
        Self {
            url: url.into(),
            method,
            payload,
            timeout: None,
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self::new(Method::GET, url, Payload::Query(query))
    }

    pub fn post_form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::new(Method::POST, url, Payload::Form(fields))
    }

    pub fn put_json<T: Serialize>(url: impl Into<String>, body: &T) -> Result<Self, ClientError> {
        Ok(Self::new(
            Method::PUT,
            url,
            Payload::Json(serde_json::to_value(body)?),
        ))
    }

    pub fn delete(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self::new(Method::DELETE, url, Payload::Query(query))
    }

    /// Add a header for this call only.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the client timeout for this call only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Turn the descriptor into a ready-to-send request builder.
    pub fn build(self, client: &GarageClient) -> reqwest::RequestBuilder {
        let mut request = client.request(self.method, &self.url);

        match &self.payload {
            Payload::None => {}
            Payload::Query(pairs) => request = request.query(pairs),
            Payload::Form(fields) => request = request.form(fields),
            Payload::Json(value) => request = request.json(value),
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }
}
