//! Google Calendar event creation client.
//!
//! This module provides a low-level HTTP client for the Google Calendar
//! API's `events.insert` operation: it normalizes an [`EventRequest`] into
//! the API's event shape and submits it.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use calinvite_core::EventRequest;

use crate::error::{ProviderError, ProviderResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a new Google Calendar client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL. Used by tests to point at a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Creates an event on the given calendar.
    ///
    /// The request is normalized into the API's event shape (timezone-
    /// wrapped start/end, attendee objects, reminder overrides, a Meet
    /// conference request), submitted with update notifications to all
    /// attendees, and the created event's browser link is returned.
    ///
    /// # Errors
    ///
    /// A 401 from the API is classified as an authentication error;
    /// any other non-success status as a server error. No retries.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        request: &EventRequest,
    ) -> ProviderResult<String> {
        let event = ApiEvent::from_request(request);

        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        debug!("creating event {:?} on calendar {}", request.summary, calendar_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[("sendUpdates", "all"), ("conferenceDataVersion", "1")])
            .json(&event)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(
                "access token expired or invalid",
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "event creation failed ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        let created: CreatedEvent = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })?;

        let html_link = created.html_link.ok_or_else(|| {
            ProviderError::invalid_response("created event has no htmlLink")
        })?;

        info!("created event {} ({})", created.id.unwrap_or_default(), html_link);
        Ok(html_link)
    }
}

/// Event record in the shape the Calendar API expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    summary: String,
    description: String,
    start: ApiEventTime,
    end: ApiEventTime,
    attendees: Vec<ApiAttendee>,
    reminders: ApiReminders,
    conference_data: ApiConferenceData,
}

impl ApiEvent {
    /// Normalizes an [`EventRequest`] into the API event shape.
    ///
    /// Start and end get the request's time zone (UTC by default), the
    /// attendee emails become attendee objects, reminders are overridden
    /// to email 24h / popup 10min before, and a conference creation
    /// request asks for a Meet link.
    pub fn from_request(request: &EventRequest) -> Self {
        let time_zone = request.effective_time_zone();

        Self {
            summary: request.summary.clone(),
            description: request.description.clone(),
            start: ApiEventTime {
                date_time: request.start.clone(),
                time_zone: time_zone.to_string(),
            },
            end: ApiEventTime {
                date_time: request.end.clone(),
                time_zone: time_zone.to_string(),
            },
            attendees: request
                .attendees
                .iter()
                .map(|email| ApiAttendee {
                    email: email.clone(),
                })
                .collect(),
            reminders: ApiReminders::default(),
            conference_data: ApiConferenceData::meet_request(),
        }
    }

    #[cfg(test)]
    fn attendee_emails(&self) -> Vec<&str> {
        self.attendees.iter().map(|a| a.email.as_str()).collect()
    }
}

/// Timezone-wrapped event boundary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: String,
    time_zone: String,
}

/// Attendee in the API's shape.
#[derive(Debug, Serialize)]
struct ApiAttendee {
    email: String,
}

/// Reminder configuration: overridden defaults, email 24h before and
/// popup 10 minutes before.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiReminders {
    use_default: bool,
    overrides: Vec<ApiReminderOverride>,
}

impl Default for ApiReminders {
    fn default() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                ApiReminderOverride {
                    method: "email".to_string(),
                    minutes: 24 * 60,
                },
                ApiReminderOverride {
                    method: "popup".to_string(),
                    minutes: 10,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiReminderOverride {
    method: String,
    minutes: u32,
}

/// Conference creation request asking for a Meet link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiConferenceData {
    create_request: ApiConferenceCreateRequest,
}

impl ApiConferenceData {
    fn meet_request() -> Self {
        Self {
            create_request: ApiConferenceCreateRequest {
                // Unique per call so the API never dedupes the request
                request_id: format!("meet-meeting-{}", Utc::now().timestamp_millis()),
                conference_solution_key: ApiConferenceSolutionKey {
                    kind: "hangoutsMeet".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiConferenceCreateRequest {
    request_id: String,
    conference_solution_key: ApiConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
struct ApiConferenceSolutionKey {
    #[serde(rename = "type")]
    kind: String,
}

/// The slice of the created event we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    id: Option<String>,
    html_link: Option<String>,
}
