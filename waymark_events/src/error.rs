// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the event core.

use thiserror::Error;

/// Errors returned by fallible event-core operations.
///
/// Pointer dispatch itself never fails; these surface from configuration
/// parsing, event-type parsing and the imperative event-state helpers.
#[derive(Error, Debug)]
pub enum EventsError {
    /// An event type name that is not one of `click`, `contextmenu`, `hover`, `long-hover`.
    #[error("unknown event type: {0:?}")]
    UnknownEventType(String),

    /// Configuration JSON could not be parsed.
    #[error("invalid dispatcher configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Event state was requested for a source that cannot persist it.
    #[error("source {0:?} is not application-managed and cannot hold event state")]
    NotApplicationManaged(String),

    /// A facade operation was attempted without an associated group.
    #[error("events proxy has no associated interactive group")]
    DetachedProxy,
}

/// Result alias for event-core operations.
pub type EventsResult<T> = Result<T, EventsError>;

/// Error type returned by consumer handlers.
///
/// A failing handler is logged and its siblings still run.
pub type HandlerError = Box<dyn core::error::Error>;

/// Return type of consumer handlers.
pub type HandlerResult = Result<(), HandlerError>;
