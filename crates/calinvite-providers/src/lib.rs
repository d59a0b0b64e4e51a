//! Google OAuth and Calendar API plumbing.
//!
//! This crate provides the provider layer for the calinvite server:
//!
//! - [`AuthManager`] - OAuth token lifecycle (consent URL, code exchange,
//!   persistence, refresh)
//! - [`GoogleCalendarClient`] - event creation against the Calendar API
//! - [`TokenStore`] - swappable storage backend for the token pair
//! - [`ProviderError`] - classified error type for provider operations

pub mod error;
pub mod google;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::{
    AuthManager, FileTokenStore, GoogleCalendarClient, GoogleConfig, MemoryTokenStore,
    OAuthClient, OAuthCredentials, TokenPair, TokenStore,
};
