//! Google Calendar integration.
//!
//! This module provides everything the server needs to create events on a
//! Google calendar on the operator's behalf:
//!
//! - OAuth 2.0 authorization-code flow (web-server variant) with offline
//!   access and forced consent
//! - Token persistence with atomic file replacement
//! - Synchronous-looking token refresh before event creation
//! - Event submission with attendee notifications and a Meet link request
//!
//! # Authentication Flow
//!
//! 1. Operator provides their own OAuth client ID/secret (required by Google)
//! 2. `GET /auth` redirects the browser to Google's consent page
//! 3. Google redirects back to `/oauth2callback` with an authorization code
//! 4. The code is exchanged for access and refresh tokens
//! 5. Tokens are persisted and refreshed on demand for future requests

mod auth;
mod config;
mod events;
mod oauth;
mod tokens;

pub use auth::AuthManager;
pub use config::{GoogleConfig, OAuthCredentials};
pub use events::{ApiEvent, GoogleCalendarClient};
pub use oauth::OAuthClient;
pub use tokens::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
