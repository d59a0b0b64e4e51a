//! OAuth 2.0 authorization-code flow for Google APIs.
//!
//! This module implements the web-server variant of the flow: the consent
//! URL sends the user to Google, Google redirects the browser back to the
//! configured redirect URI with an authorization code, and the code is
//! exchanged here for an access/refresh token pair.
//!
//! # Flow Overview
//!
//! 1. Build the authorization URL requesting offline access with forced
//!    consent (forced consent makes Google re-issue a refresh token)
//! 2. The HTTP server redirects the user's browser to it
//! 3. User grants permission; Google redirects to `/oauth2callback?code=...`
//! 4. Exchange the code for access and refresh tokens
//! 5. Later, exchange the refresh token for a new access token when the
//!    current one is near expiry

use std::time::Duration;

use tracing::info;

use crate::error::{ProviderError, ProviderResult};

use super::config::OAuthCredentials;
use super::tokens::TokenPair;

/// Google OAuth endpoints.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth client for Google APIs.
///
/// Handles consent-URL construction, authorization-code exchange, and
/// refresh-token exchange.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    http_client: reqwest::Client,
    token_url: String,
}

impl OAuthClient {
    /// Creates a new OAuth client with the given credentials.
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            credentials,
            http_client,
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Overrides the token endpoint URL. Used by tests to point at a mock
    /// server.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Builds the Google consent URL for the given scopes.
    ///
    /// Requests offline access (so a refresh token is issued) with forced
    /// consent. Pure URL construction - no side effects.
    pub fn authorization_url(&self, scopes: &[String]) -> String {
        let scope = scopes.join(" ");

        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&\
            access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scope),
        )
    }

    /// Exchanges an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<TokenPair> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let response: TokenResponse = self.post_token_request(&params, "token exchange").await?;

        info!("successfully obtained tokens");
        Ok(TokenPair::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
        ))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Returns the new access token and its lifetime in seconds. Google
    /// usually omits the refresh token on this grant; the caller keeps the
    /// stored one.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> ProviderResult<(String, Option<i64>)> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response: TokenResponse = self.post_token_request(&params, "token refresh").await?;

        info!("successfully refreshed access token");
        Ok((response.access_token, response.expires_in))
    }

    /// Posts a form-encoded grant to the token endpoint and parses the
    /// response.
    async fn post_token_request(
        &self,
        params: &[(&str, &str)],
        operation: &str,
    ) -> ProviderResult<TokenResponse> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("{} request failed: {}", operation, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "{} failed ({}): {}",
                operation, status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}
