//! Event request types.
//!
//! This module provides the core types for the event creation flow:
//! - [`EventRequest`]: A caller-supplied description of a calendar event
//! - [`EventConfirmation`]: The confirmation returned after creation
//! - [`ValidationError`]: Rejection of a request missing required fields

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default time zone applied when the caller does not specify one.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// A validation failure for an [`EventRequest`].
///
/// Validation happens before any external call is made, so a rejected
/// request never reaches the calendar API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {0}")]
pub struct ValidationError(pub String);

/// A caller-supplied description of a calendar event to be created.
///
/// Start and end are ISO-8601 datetime strings as supplied by the caller;
/// they are passed through to the calendar API together with the time zone
/// rather than being reinterpreted locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// Event title. Required, must be non-empty. Deserializes to empty
    /// when absent so validation can reject it with the field name.
    #[serde(default)]
    pub summary: String,

    /// Free-form description. Defaults to empty.
    #[serde(default)]
    pub description: String,

    /// Event start as an ISO-8601 datetime string. Required, same
    /// absent-field handling as `summary`.
    #[serde(default)]
    pub start: String,

    /// Event end as an ISO-8601 datetime string. Required, same
    /// absent-field handling as `summary`.
    #[serde(default)]
    pub end: String,

    /// IANA time zone applied to start and end. Defaults to `"UTC"`.
    #[serde(default)]
    pub time_zone: Option<String>,

    /// Attendee email addresses. Defaults to empty.
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl EventRequest {
    /// Creates a request with the required fields set.
    pub fn new(
        summary: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Builder: set the attendee list.
    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }

    /// Returns the effective time zone for this request.
    pub fn effective_time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }

    /// Validates that summary, start, and end are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.summary.trim().is_empty() {
            missing.push("summary");
        }
        if self.start.trim().is_empty() {
            missing.push("start");
        }
        if self.end.trim().is_empty() {
            missing.push("end");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(missing.join(", ")))
        }
    }
}

/// Confirmation returned to the caller after a successful creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfirmation {
    /// Human-readable status message.
    pub message: String,

    /// A human-followable link to the created event.
    pub event_url: String,
}

impl EventConfirmation {
    /// Creates a confirmation for the given event link.
    pub fn new(event_url: impl Into<String>) -> Self {
        Self {
            message: "Event created successfully!".to_string(),
            event_url: event_url.into(),
        }
    }
}
