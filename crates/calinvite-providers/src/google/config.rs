//! Google provider configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// OAuth 2.0 client identity for Google API access.
///
/// Users must provide their own OAuth client ID and secret, as Google
/// requires registered applications for API access. The redirect URI is
/// where Google sends the authorization code after consent; it must be
/// registered with the OAuth client and served by this process
/// (`/oauth2callback`).
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
    /// The redirect URI registered for the authorization-code flow.
    pub redirect_uri: String,
}

/// Structure of Google's OAuth credentials JSON file.
///
/// Supports multiple formats:
/// 1. Google Cloud Console format with a "web" or "installed" section
/// 2. Flat format with the fields at root level
#[derive(Debug, Deserialize)]
pub struct GoogleCredentialsFile {
    /// Credentials for web applications.
    pub web: Option<NestedCredentials>,
    /// Credentials for installed (desktop) applications.
    pub installed: Option<NestedCredentials>,
    /// Direct client_id (flat format).
    pub client_id: Option<String>,
    /// Direct client_secret (flat format).
    pub client_secret: Option<String>,
    /// Direct redirect_uri (flat format).
    pub redirect_uri: Option<String>,
}

/// OAuth credentials within a nested section of the credentials JSON file.
#[derive(Debug, Deserialize)]
pub struct NestedCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// The registered redirect URIs; the first one is used.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// The project ID (present in the JSON but not used).
    #[serde(default)]
    #[allow(dead_code)]
    pub project_id: Option<String>,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Loads OAuth credentials from a Google Cloud Console JSON file.
    ///
    /// The file should be the JSON downloaded from the Google Cloud Console
    /// OAuth 2.0 credentials page.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read credentials file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parses OAuth credentials from a Google credentials JSON string.
    ///
    /// Supports multiple formats:
    /// 1. Google Cloud Console format: `{"web": {"client_id": "...", "client_secret": "...", "redirect_uris": ["..."]}}`
    /// 2. Flat format: `{"client_id": "...", "client_secret": "...", "redirect_uri": "..."}`
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: GoogleCredentialsFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse credentials JSON: {}", e))?;

        // Try nested format first (web or installed section)
        if let Some(creds) = file.web.or(file.installed) {
            let redirect_uri = creds
                .redirect_uris
                .into_iter()
                .next()
                .ok_or_else(|| "credentials file has no redirect_uris".to_string())?;
            return Ok(Self::new(creds.client_id, creds.client_secret, redirect_uri));
        }

        // Try flat format
        if let (Some(client_id), Some(client_secret), Some(redirect_uri)) =
            (file.client_id, file.client_secret, file.redirect_uri)
        {
            return Ok(Self::new(client_id, client_secret, redirect_uri));
        }

        Err("credentials file must contain a 'web'/'installed' section or \
             'client_id'/'client_secret'/'redirect_uri' at root level"
            .to_string())
    }

    /// Validates that the credentials appear to be correctly formatted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err("client_id should end with .apps.googleusercontent.com");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        if self.redirect_uri.is_empty() {
            return Err("redirect_uri is required");
        }
        Ok(())
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth credentials for API access.
    pub credentials: OAuthCredentials,

    /// Path to store OAuth tokens.
    pub token_path: PathBuf,

    /// Calendar to create events in. Defaults to `"primary"`.
    pub calendar_id: String,

    /// Request timeout.
    pub timeout: Duration,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://www.googleapis.com/auth/calendar"]` - event
    /// creation needs read-write access.
    pub scopes: Vec<String>,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default OAuth scope for read-write calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar";

    /// Creates a new Google configuration with the given credentials.
    pub fn new(credentials: OAuthCredentials, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            token_path: token_path.into(),
            calendar_id: "primary".to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
        }
    }

    /// Sets the calendar to create events in.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> OAuthCredentials {
        OAuthCredentials::new(
            "test-client.apps.googleusercontent.com",
            "test-secret",
            "http://localhost:3000/oauth2callback",
        )
    }

    #[test]
    fn credentials_validation() {
        let valid = test_credentials();
        assert!(valid.validate().is_ok());

        let empty_id = OAuthCredentials::new("", "secret", "http://localhost/cb");
        assert!(empty_id.validate().is_err());

        let bad_id = OAuthCredentials::new("bad-id", "secret", "http://localhost/cb");
        assert!(bad_id.validate().is_err());

        let empty_secret =
            OAuthCredentials::new("test.apps.googleusercontent.com", "", "http://localhost/cb");
        assert!(empty_secret.validate().is_err());

        let empty_redirect = OAuthCredentials::new("test.apps.googleusercontent.com", "secret", "");
        assert!(empty_redirect.validate().is_err());
    }

    #[test]
    fn config_creation() {
        let config = GoogleConfig::new(test_credentials(), "/tmp/token.json");
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.scopes, vec![GoogleConfig::DEFAULT_SCOPE.to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_methods() {
        let config = GoogleConfig::new(test_credentials(), "/tmp/token.json")
            .with_calendar_id("work@example.com")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.calendar_id, "work@example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn config_validation_rejects_empty_scopes() {
        let config = GoogleConfig::new(test_credentials(), "/tmp/token.json").with_scopes(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn credentials_from_json_web() {
        let json = r#"{
            "web": {
                "client_id": "web-id.apps.googleusercontent.com",
                "client_secret": "web-secret",
                "redirect_uris": ["http://localhost:3000/oauth2callback"],
                "project_id": "my-project"
            }
        }"#;

        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-id.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "web-secret");
        assert_eq!(creds.redirect_uri, "http://localhost:3000/oauth2callback");
    }

    #[test]
    fn credentials_from_json_installed() {
        let json = r#"{
            "installed": {
                "client_id": "app-id.apps.googleusercontent.com",
                "client_secret": "app-secret",
                "redirect_uris": ["http://127.0.0.1:3000/oauth2callback", "urn:ietf:wg:oauth:2.0:oob"]
            }
        }"#;

        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds.redirect_uri, "http://127.0.0.1:3000/oauth2callback");
    }

    #[test]
    fn credentials_from_json_flat() {
        let json = r#"{
            "client_id": "flat-id.apps.googleusercontent.com",
            "client_secret": "flat-secret",
            "redirect_uri": "http://localhost:3000/oauth2callback"
        }"#;

        let creds = OAuthCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "flat-id.apps.googleusercontent.com");
    }

    #[test]
    fn credentials_from_json_missing_redirect() {
        let json = r#"{
            "web": {
                "client_id": "web-id.apps.googleusercontent.com",
                "client_secret": "web-secret"
            }
        }"#;

        let result = OAuthCredentials::from_json(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("redirect_uris"));
    }

    #[test]
    fn credentials_from_json_invalid() {
        let json = r#"{ "other": {} }"#;
        let result = OAuthCredentials::from_json(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("client_id"));
    }

    #[test]
    fn credentials_from_json_malformed() {
        let json = "not json";
        let result = OAuthCredentials::from_json(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("parse"));
    }
}
