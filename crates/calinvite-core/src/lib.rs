//! Core types: event requests, confirmations, tracing setup

pub mod event;
pub mod tracing;

pub use event::{DEFAULT_TIME_ZONE, EventConfirmation, EventRequest, ValidationError};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
