//! Shared server state.

use std::sync::Arc;

use calinvite_providers::{AuthManager, GoogleCalendarClient};

/// State shared across all request handlers.
///
/// Holds the process-wide immutable pieces, chiefly the auth manager
/// (which owns the token store). Handlers run to completion
/// independently; there is no mutable in-memory state here. The Telegram
/// notifier lives outside this state: it has no inbound HTTP interface.
pub struct AppState {
    /// OAuth token lifecycle manager.
    pub auth: AuthManager,

    /// Calendar API base URL override. Tests point this at a mock server.
    pub calendar_api_base: Option<String>,
}

/// Shared handle to the server state.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Creates the server state.
    pub fn new(auth: AuthManager) -> Self {
        Self {
            auth,
            calendar_api_base: None,
        }
    }

    /// Overrides the calendar API base URL. Used by tests.
    pub fn with_calendar_api_base(mut self, base: impl Into<String>) -> Self {
        self.calendar_api_base = Some(base.into());
        self
    }

    /// Wraps the state in a shared handle.
    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Builds a calendar client for the given access token, honoring the
    /// configured base URL override.
    pub fn calendar_client(&self, access_token: &str) -> GoogleCalendarClient {
        let client = GoogleCalendarClient::new(access_token, self.auth.timeout());
        match &self.calendar_api_base {
            Some(base) => client.with_base_url(base.clone()),
            None => client,
        }
    }
}
