//! HTTP server: OAuth endpoints, event creation, Telegram notifier.
//!
//! This crate wires the provider layer into an axum application:
//! - `GET /auth` and `GET /oauth2callback` for the OAuth consent flow
//! - `POST /create-event` for calendar event creation
//! - a Telegram [`Notifier`] available as a library call
//!
//! # Example
//!
//! ```rust,no_run
//! use calinvite_server::{AppState, router};
//! use calinvite_providers::{AuthManager, GoogleConfig, OAuthCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = OAuthCredentials::from_file("credentials.json")?;
//!     let config = GoogleConfig::new(credentials, "token.json");
//!     let auth = AuthManager::new(config)?;
//!
//!     let app = router(AppState::new(auth).into_shared());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod notify;
mod routes;
mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use notify::{Notifier, NotifierConfig, NotifyError};
pub use routes::router;
pub use state::{AppState, SharedState};
