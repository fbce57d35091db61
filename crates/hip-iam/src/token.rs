//! Client-credentials token acquisition.

use serde::Deserialize;

use crate::config::IamConfig;
use crate::{IamError, IamResult};

/// Bearer token for the identity service API.
///
/// Obtained fresh for every top-level operation and never refreshed.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchanges client credentials for an access token.
///
/// # Errors
///
/// Returns [`IamError::Auth`] if the endpoint is unreachable, replies with a
/// non-success status, or returns a body without a usable token.
pub async fn get_auth_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    scope: &str,
) -> IamResult<AccessToken> {
    tracing::info!(token_url, client_id, "getAuthToken");

    let form = [
        ("grant_type", "client_credentials"),
        ("scope", scope),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = client
        .post(token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| IamError::Auth(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IamError::Auth(format!(
            "token endpoint returned {}: {body}",
            status.as_u16()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| IamError::Auth(format!("malformed token response: {e}")))?;

    if token.access_token.trim().is_empty() {
        return Err(IamError::Auth("token endpoint returned an empty access token".to_string()));
    }

    tracing::debug!(
        token_type = token.token_type.as_deref().unwrap_or("unknown"),
        expires_in = token.expires_in,
        "access token obtained"
    );
    Ok(AccessToken::new(token.access_token))
}

/// Convenience wrapper taking the configured credentials.
pub async fn authenticate(client: &reqwest::Client, iam: &IamConfig) -> IamResult<AccessToken> {
    get_auth_token(
        client,
        &iam.token_url,
        &iam.client_id,
        &iam.client_secret,
        &iam.scope,
    )
    .await
}
