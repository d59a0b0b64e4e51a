//! Server configuration.

use std::path::PathBuf;

use crate::notify::NotifierConfig;

/// Server configuration.
///
/// Loaded once at startup; implicit environment defaults from the original
/// deployment are made explicit here so every fallback rule is visible in
/// one place.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Path to the Google OAuth credentials JSON file.
    pub credentials_path: PathBuf,

    /// Path to the persisted token pair.
    pub token_path: PathBuf,

    /// Telegram notifier settings.
    pub notifier: NotifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            notifier: NotifierConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from process environment variables.
    ///
    /// Recognized variables: `PORT`, `CREDENTIALS_PATH`, `TOKEN_PATH`,
    /// `TELEGRAM_TOKEN`, `CHAT_ID`. Unset variables fall back to the
    /// defaults above; an unparseable `PORT` is rejected.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| format!("invalid PORT value: {}", port))?;
        }
        if let Ok(path) = std::env::var("CREDENTIALS_PATH") {
            config.credentials_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }

        config.notifier = NotifierConfig {
            bot_token: std::env::var("TELEGRAM_TOKEN").ok(),
            default_chat_id: std::env::var("CHAT_ID").ok(),
        };

        Ok(config)
    }

    /// Builder: set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: set the credentials file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Builder: set the token file path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Builder: set the notifier configuration.
    pub fn with_notifier(mut self, notifier: NotifierConfig) -> Self {
        self.notifier = notifier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.token_path, PathBuf::from("token.json"));
        assert!(config.notifier.bot_token.is_none());
        assert!(config.notifier.default_chat_id.is_none());
    }

    #[test]
    fn custom_config() {
        let config = ServerConfig::default()
            .with_port(8080)
            .with_credentials_path("/etc/calinvite/credentials.json")
            .with_token_path("/var/lib/calinvite/token.json")
            .with_notifier(NotifierConfig {
                bot_token: Some("bot-token".to_string()),
                default_chat_id: Some("1160662416".to_string()),
            });

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.credentials_path,
            PathBuf::from("/etc/calinvite/credentials.json")
        );
        assert_eq!(
            config.notifier.default_chat_id,
            Some("1160662416".to_string())
        );
    }
}
