//! OAuth token lifecycle manager.
//!
//! [`AuthManager`] owns the credential exchange and the persistence of the
//! current token pair. It is the only component that writes the token
//! store; the event creation path only reads the access token out of the
//! pair it is handed.
//!
//! There is no locking around the store: two overlapping refreshes could
//! race and persist inconsistent state. Acceptable for the intended
//! single-operator deployment.

use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleConfig;
use super::oauth::OAuthClient;
use super::tokens::{FileTokenStore, TokenPair, TokenStore};

/// Manages the OAuth credential exchange and token persistence.
pub struct AuthManager {
    config: GoogleConfig,
    oauth_client: OAuthClient,
    store: Box<dyn TokenStore>,
}

impl AuthManager {
    /// Creates a manager with a file-backed token store at the configured
    /// path.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        let store = Box::new(FileTokenStore::new(&config.token_path));
        Self::with_store(config, store)
    }

    /// Creates a manager with a caller-supplied token store.
    pub fn with_store(config: GoogleConfig, store: Box<dyn TokenStore>) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let oauth_client = OAuthClient::new(config.credentials.clone(), config.timeout);

        Ok(Self {
            config,
            oauth_client,
            store,
        })
    }

    /// Overrides the token endpoint URL. Used by tests.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_client = self.oauth_client.with_token_url(url);
        self
    }

    /// Returns the configured calendar to create events in.
    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> std::time::Duration {
        self.config.timeout
    }

    /// Builds the consent URL for the configured scopes.
    ///
    /// No side effects beyond URL construction.
    pub fn authorization_url(&self) -> String {
        self.oauth_client.authorization_url(&self.config.scopes)
    }

    /// Exchanges an authorization code for a token pair and persists it.
    ///
    /// On a rejected exchange nothing is written.
    pub async fn complete_auth(&self, code: &str) -> ProviderResult<TokenPair> {
        let pair = self.oauth_client.exchange_code(code).await?;
        self.store.save(&pair)?;
        info!("authentication complete, tokens persisted");
        Ok(pair)
    }

    /// Reads the persisted token pair.
    ///
    /// # Errors
    ///
    /// Returns an authentication error if no pair has been persisted yet.
    pub fn load_token(&self) -> ProviderResult<TokenPair> {
        self.store.load()?.ok_or_else(|| {
            ProviderError::authentication("not authenticated - visit /auth first")
        })
    }

    /// Returns a non-expiring token pair, refreshing first if needed.
    ///
    /// If the pair is near expiry, performs exactly one refresh exchange,
    /// persists the new pair (carrying over the stored refresh token when
    /// Google omits it), and returns it. A failed refresh means the
    /// operator has to re-authenticate.
    pub async fn ensure_fresh(&self, pair: TokenPair) -> ProviderResult<TokenPair> {
        if !pair.is_expiring() {
            return Ok(pair);
        }

        let refresh_token = pair.refresh_token.clone().ok_or_else(|| {
            ProviderError::authentication("no refresh token - re-authentication required")
        })?;

        debug!("access token expiring, refreshing");

        let (access_token, expires_in) = self
            .oauth_client
            .refresh_token(&refresh_token)
            .await
            .map_err(|e| {
                ProviderError::authentication(format!(
                    "failed to refresh access token: {}",
                    e.message()
                ))
            })?;

        let refreshed = TokenPair::new(access_token, Some(refresh_token), expires_in);
        self.store.save(&refreshed)?;

        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::config::OAuthCredentials;
    use crate::google::tokens::MemoryTokenStore;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> GoogleConfig {
        let credentials = OAuthCredentials::new(
            "test-client.apps.googleusercontent.com",
            "test-secret",
            "http://localhost:3000/oauth2callback",
        );
        GoogleConfig::new(credentials, "/tmp/unused-token.json")
            .with_timeout(Duration::from_secs(5))
    }

    fn manager_with_pair(pair: Option<TokenPair>) -> AuthManager {
        let store: Box<dyn TokenStore> = match pair {
            Some(pair) => Box::new(MemoryTokenStore::with_pair(pair)),
            None => Box::new(MemoryTokenStore::new()),
        };
        AuthManager::with_store(test_config(), store).unwrap()
    }

    fn expiring_pair() -> TokenPair {
        let mut pair = TokenPair::new("stale-access", Some("stored-refresh".to_string()), Some(3600));
        pair.expires_at = Some(Utc::now() - ChronoDuration::minutes(5));
        pair
    }

    #[test]
    fn load_token_without_pair_is_auth_error() {
        let manager = manager_with_pair(None);
        let err = manager.load_token().unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ProviderErrorCode::AuthenticationFailed
        );
    }

    #[test]
    fn load_token_returns_persisted_pair() {
        let manager = manager_with_pair(Some(TokenPair::new("access", None, Some(3600))));
        let pair = manager.load_token().unwrap();
        assert_eq!(pair.access_token, "access");
    }

    #[test]
    fn authorization_url_uses_configured_scope() {
        let manager = manager_with_pair(None);
        let url = manager.authorization_url();
        assert!(url.contains(
            &urlencoding::encode("https://www.googleapis.com/auth/calendar").into_owned()
        ));
    }

    #[tokio::test]
    async fn ensure_fresh_returns_valid_pair_unchanged() {
        let manager = manager_with_pair(None);
        let pair = TokenPair::new("valid-access", Some("refresh".to_string()), Some(3600));

        // No mock server mounted: any network call would fail the test
        let out = manager.ensure_fresh(pair).await.unwrap();
        assert_eq!(out.access_token, "valid-access");
    }

    #[tokio::test]
    async fn ensure_fresh_refreshes_exactly_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=stored-refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-access",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager =
            manager_with_pair(None).with_token_url(format!("{}/token", server.uri()));
        let out = manager.ensure_fresh(expiring_pair()).await.unwrap();

        assert_eq!(out.access_token, "fresh-access");
        assert!(!out.is_expiring());
        // Google omitted the refresh token; the stored one is carried over
        assert_eq!(out.refresh_token, Some("stored-refresh".to_string()));
    }

    #[tokio::test]
    async fn ensure_fresh_persists_refreshed_pair() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-access",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let manager =
            manager_with_pair(None).with_token_url(format!("{}/token", server.uri()));
        manager.ensure_fresh(expiring_pair()).await.unwrap();

        let persisted = manager.load_token().unwrap();
        assert_eq!(persisted.access_token, "fresh-access");
    }

    #[tokio::test]
    async fn ensure_fresh_without_refresh_token_is_auth_error() {
        let manager = manager_with_pair(None);
        let mut pair = TokenPair::new("stale", None, Some(3600));
        pair.expires_at = Some(Utc::now() - ChronoDuration::minutes(5));

        let err = manager.ensure_fresh(pair).await.unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ProviderErrorCode::AuthenticationFailed
        );
    }

    #[tokio::test]
    async fn ensure_fresh_rejected_refresh_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let manager =
            manager_with_pair(None).with_token_url(format!("{}/token", server.uri()));
        let err = manager.ensure_fresh(expiring_pair()).await.unwrap_err();
        assert_eq!(
            err.code(),
            crate::error::ProviderErrorCode::AuthenticationFailed
        );
    }

    #[tokio::test]
    async fn complete_auth_persists_pair() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager =
            manager_with_pair(None).with_token_url(format!("{}/token", server.uri()));
        manager.complete_auth("auth-code").await.unwrap();

        let persisted = manager.load_token().unwrap();
        assert_eq!(persisted.access_token, "new-access");
        assert_eq!(persisted.refresh_token, Some("new-refresh".to_string()));
    }

    #[tokio::test]
    async fn complete_auth_failure_writes_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let manager =
            manager_with_pair(None).with_token_url(format!("{}/token", server.uri()));
        assert!(manager.complete_auth("bad-code").await.is_err());
        assert!(manager.load_token().is_err());
    }
}
