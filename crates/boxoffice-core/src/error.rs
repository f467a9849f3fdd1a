//! Error type shared by every BoxOffice crate.
//!
//! Backend errors (sqlx, redis, jsonwebtoken) are converted at the crate
//! boundary with [`AppError::with_source`] so callers only ever match on
//! [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of which backend reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested seat, booking, event, or user was not found.
    NotFound,
    /// The caller could not be identified (missing or invalid token).
    Authentication,
    /// Input validation failed. Raised before any lock is attempted.
    Validation,
    /// The resource is claimed or owned by another principal.
    OwnershipConflict,
    /// The resource is already in a terminal state (e.g. a cancelled booking).
    InvalidState,
    /// The record store failed. The whole call is surfaced as failed.
    Database,
    /// The lock coordinator could not be reached or returned an error.
    Lock,
    /// Settings are missing or contradict each other.
    Configuration,
    /// A payload could not be encoded or decoded.
    Serialization,
    /// A bug or an unexpected condition.
    Internal,
    /// A dependency is down.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Stable SCREAMING_SNAKE code used in logs.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Validation => "VALIDATION",
            Self::OwnershipConflict => "OWNERSHIP_CONFLICT",
            Self::InvalidState => "INVALID_STATE",
            Self::Database => "DATABASE",
            Self::Lock => "LOCK",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A categorized failure with a caller-facing message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category.
    pub kind: ErrorKind,
    /// Message safe to show to the caller.
    pub message: String,
    /// Backend error that caused this one, kept for logs.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    /// Build an error of any kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Build an error that wraps the backend error behind it.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    kind_constructors! {
        /// Missing seat, booking, event or user.
        not_found => NotFound;
        /// Missing, malformed or expired credentials.
        authentication => Authentication;
        /// Rejected input.
        validation => Validation;
        /// Resource owned or claimed by someone else.
        ownership_conflict => OwnershipConflict;
        /// Resource already in a terminal state.
        invalid_state => InvalidState;
        /// Record store failure.
        database => Database;
        /// Lock coordinator failure.
        lock => Lock;
        /// Bad settings.
        configuration => Configuration;
        /// Unexpected condition.
        internal => Internal;
        /// Dependency down.
        service_unavailable => ServiceUnavailable;
    }

    /// Whether the error came from an infrastructure round-trip rather than the caller's input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Database | ErrorKind::Lock | ErrorKind::ServiceUnavailable
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("Malformed JSON: {err}"), err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O failure: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, format!("Invalid settings: {err}"), err)
    }
}
