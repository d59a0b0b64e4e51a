//! OAuth token storage.
//!
//! This module holds the persisted token pair and the storage abstraction
//! behind it. The token file is the sole mutable durable state in the
//! system: one JSON record, overwritten on every refresh.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// The current OAuth token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token for API requests.
    pub access_token: String,

    /// The refresh token for obtaining new access tokens.
    pub refresh_token: Option<String>,

    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    /// Seconds subtracted from the reported lifetime so a refresh happens
    /// before the token actually expires.
    const EXPIRY_BUFFER_SECS: i64 = 60;

    /// Creates a token pair from OAuth token endpoint response data.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
    ) -> Self {
        let expires_at = expires_in_secs.map(|secs| {
            Utc::now() + Duration::seconds(secs) - Duration::seconds(Self::EXPIRY_BUFFER_SECS)
        });

        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at,
        }
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expiring(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            // If no expiry is set, assume it's valid
            None => false,
        }
    }
}

/// Storage backend for the persisted token pair.
///
/// Abstracted behind a trait so tests can substitute an in-memory fake for
/// the file-backed store.
pub trait TokenStore: Send + Sync {
    /// Reads the persisted token pair. `Ok(None)` means no pair has been
    /// persisted yet.
    fn load(&self) -> ProviderResult<Option<TokenPair>>;

    /// Persists the token pair, replacing any previous record.
    fn save(&self, pair: &TokenPair) -> ProviderResult<()>;
}

/// File-backed token store.
///
/// The pair is stored as a single JSON object. Writes go to a temp file
/// first and are renamed into place, so a reader never sees a torn file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a file store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token storage path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ProviderResult<Option<TokenPair>> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token file: {}", e))
        })?;

        let pair: TokenPair = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!("failed to parse token file: {}", e))
        })?;

        debug!("loaded tokens from {:?}", self.path);
        Ok(Some(pair))
    }

    fn save(&self, pair: &TokenPair) -> ProviderResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(pair).map_err(|e| {
            ProviderError::invalid_response(format!("failed to serialize tokens: {}", e))
        })?;

        fs::write(&temp_path, &content).map_err(|e| {
            ProviderError::configuration(format!("failed to write token file: {}", e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to rename token file: {}", e))
        })?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }

        info!("saved tokens to {:?}", self.path);
        Ok(())
    }
}

/// In-memory token store for tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: std::sync::RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given pair.
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: std::sync::RwLock::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ProviderResult<Option<TokenPair>> {
        Ok(self.pair.read().unwrap().clone())
    }

    fn save(&self, pair: &TokenPair) -> ProviderResult<()> {
        *self.pair.write().unwrap() = Some(pair.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pair_creation() {
        let pair = TokenPair::new("access-token", Some("refresh-token".to_string()), Some(3600));

        assert_eq!(pair.access_token, "access-token");
        assert_eq!(pair.refresh_token, Some("refresh-token".to_string()));
        assert!(pair.expires_at.is_some());
        assert!(!pair.is_expiring());
    }

    #[test]
    fn token_pair_expiring() {
        let mut pair = TokenPair::new("access", None, Some(3600));
        // Force expiry in the past
        pair.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(pair.is_expiring());
    }

    #[test]
    fn token_pair_without_expiry_is_valid() {
        let pair = TokenPair::new("access", None, None);
        assert!(!pair.is_expiring());
    }

    #[test]
    fn token_pair_expiry_buffer() {
        // A token with 30 seconds left is inside the 60 second buffer
        let pair = TokenPair::new("access", None, Some(30));
        assert!(pair.is_expiring());
    }

    #[test]
    fn file_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = FileTokenStore::new(&path);

        let pair = TokenPair::new("access-token", Some("refresh-token".to_string()), Some(3600));
        store.save(&pair).unwrap();
        assert!(path.exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access-token");
        assert_eq!(loaded.refresh_token, Some("refresh-token".to_string()));
    }

    #[test]
    fn file_store_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.json"));

        store.save(&TokenPair::new("first", None, None)).unwrap();
        store.save(&TokenPair::new("second", None, None)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");
    }

    #[test]
    fn file_store_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token.json"));
        store.save(&TokenPair::new("access", None, None)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&TokenPair::new("access", None, None)).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "access");
    }
}
