//! Typed HTTP calls against the identity service.
//!
//! An [`ApiCall`] describes one request (method, path, optional JSON body)
//! together with the type its success body decodes into. [`ApiClient`]
//! executes calls with the bearer token attached and normalizes failures
//! into [`IamError`] variants.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::token::AccessToken;
use crate::{IamError, IamResult};

/// A single request to the identity service, decoding into `T`.
#[derive(Debug)]
pub struct ApiCall<T> {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    _response: PhantomData<fn() -> T>,
}

impl<T> ApiCall<T> {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            _response: PhantomData,
        }
    }

    /// GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// PUT request without body.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// POST request with a JSON body.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> IamResult<Self> {
        let mut call = Self::new(Method::POST, path);
        call.body = Some(serde_json::to_value(body)?);
        Ok(call)
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builds the shared HTTP client.
pub fn build_http_client(timeout: Duration) -> IamResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| IamError::Setup(format!("failed to create HTTP client: {e}")))
}

/// Authenticated client for the identity service API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: AccessToken,
}

impl ApiClient {
    /// Creates a client for `base_url` that sends `token` on every request.
    pub fn new(client: reqwest::Client, base_url: &str, token: AccessToken) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes a call and decodes the success body.
    pub async fn fetch<T: DeserializeOwned>(&self, call: ApiCall<T>) -> IamResult<T> {
        let request = describe(&call, &self.base_url);
        let response = self.send(&call).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| IamError::from_transport(&e, &request))?;

        serde_json::from_slice(&bytes).map_err(|e| IamError::Decode(format!("{request}: {e}")))
    }

    /// Executes a call and returns only the success status.
    pub async fn status<T>(&self, call: ApiCall<T>) -> IamResult<StatusCode> {
        let response = self.send(&call).await?;
        Ok(response.status())
    }

    async fn send<T>(&self, call: &ApiCall<T>) -> IamResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, call.path);
        let request = describe(call, &self.base_url);
        tracing::debug!(%request, "sending");

        let mut builder = self
            .client
            .request(call.method.clone(), &url)
            .bearer_auth(self.token.secret());
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = IamError::from_transport(&e, &request);
            tracing::warn!(%request, error = %err, "request failed");
            err
        })?;

        check_status(response, &request).await
    }
}

/// Maps error statuses to [`IamError::Response`].
async fn check_status(response: reqwest::Response, request: &str) -> IamResult<reqwest::Response> {
    let status = response.status();
    tracing::debug!(%request, status = status.as_u16(), "response");

    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::warn!(%request, status = status.as_u16(), %body, "error response");
    Err(IamError::Response {
        status: status.as_u16(),
        body,
    })
}

fn describe<T>(call: &ApiCall<T>, base_url: &str) -> String {
    format!("{} {}{}", call.method, base_url, call.path)
}
