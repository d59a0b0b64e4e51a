//! HTTP request handlers.
//!
//! Three endpoints, matching the original service:
//! - `GET /auth` redirects the browser to Google's consent page
//! - `GET /oauth2callback` exchanges the authorization code for tokens
//! - `POST /create-event` creates a calendar event, refreshing the access
//!   token first if it is near expiry
//!
//! All external calls are awaited sequentially within a handler; each
//! invocation runs to completion independently.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::info;

use calinvite_core::{EventConfirmation, EventRequest};

use crate::error::ApiError;
use crate::state::SharedState;

/// `GET /auth` - 302 redirect to the Google consent URL.
pub async fn begin_auth(State(state): State<SharedState>) -> Response {
    let url = state.auth.authorization_url();
    (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
}

/// Query parameters on the OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

/// `GET /oauth2callback` - exchanges the authorization code and persists
/// the token pair.
pub async fn oauth_callback(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
) -> Result<String, ApiError> {
    let code = query
        .code
        .ok_or_else(|| ApiError::Validation("code".to_string()))?;

    state
        .auth
        .complete_auth(&code)
        .await
        .map_err(|e| ApiError::AuthExchangeFailed(e.to_string()))?;

    Ok(
        "Successfully authenticated! You can now send a POST request to /create-event."
            .to_string(),
    )
}

/// `POST /create-event` - creates a calendar event.
///
/// Loads the persisted token pair (401 if absent), refreshes it if near
/// expiry (401 if the refresh is rejected), validates the request body
/// (400), and submits the event (500 on downstream failure).
pub async fn create_event(
    State(state): State<SharedState>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventConfirmation>, ApiError> {
    let pair = state.auth.load_token()?;
    let pair = state.auth.ensure_fresh(pair).await?;

    request
        .validate()
        .map_err(|e| ApiError::Validation(e.0))?;

    let client = state.calendar_client(&pair.access_token);
    let event_url = client
        .insert_event(state.auth.calendar_id(), &request)
        .await
        .map_err(|e| ApiError::Downstream(e.to_string()))?;

    info!("created event {:?}", request.summary);
    Ok(Json(EventConfirmation::new(event_url)))
}
