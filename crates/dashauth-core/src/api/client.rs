//! API client for the dashboard backend.
//!
//! Every call goes through `authenticated_request`, which attaches the
//! stored bearer token and turns non-success responses into `ApiError`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, AuthMeResponse};
use crate::auth::CredentialStore;
use crate::utils::mask_token;

// ============================================================================
// Constants
// ============================================================================

/// "Who am I" endpoint used for token validation
pub const AUTH_ME_ENDPOINT: &str = "/auth/me";

/// Options for a single request. Defaults to a bodiless GET.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: header::HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: header::HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: header::HeaderName, value: header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// API client for the dashboard backend.
/// Clone is cheap - the connection pool and credential store are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl ApiClient {
    /// Create a new API client against `base_url` (e.g. `http://host/api`)
    pub fn new(base_url: &str, credentials: Arc<CredentialStore>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// JSON content type, then caller headers, then the bearer token if one is stored.
    fn request_headers(&self, extra: &header::HeaderMap) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(token) = self.credentials.get() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| {
                    ApiError::InvalidRequest(format!(
                        "token {} is not a valid header value",
                        mask_token(&token)
                    ))
                })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Send a request decorated with the stored credential and decode the JSON body.
    ///
    /// A 401 clears the credential store before returning `ApiError::Unauthorized`.
    /// Any other failure leaves the credential alone.
    pub async fn authenticated_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        let headers = self.request_headers(&options.headers)?;

        debug!(method = %options.method, url = %url, "Sending request");

        let mut request = self.client.request(options.method, &url).headers(headers);
        if let Some(ref body) = options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Request failed");
            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Clears whatever is stored now, even a token set after this request was sent
                self.credentials.clear();
            }
            return Err(ApiError::from_status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Ask the backend who the stored token belongs to
    pub async fn auth_status(&self) -> Result<AuthMeResponse, ApiError> {
        self.authenticated_request(AUTH_ME_ENDPOINT, RequestOptions::default())
            .await
    }
}
