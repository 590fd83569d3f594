//! Error types for the event system
//!
//! Dispatch failures fall into two families that callers usually want to tell
//! apart:
//!
//! 1. **Invalid listeners** ([`InvalidListenerError`]): a callable failed or
//!    panicked while executing, or a service resolved from the container does
//!    not implement [`Listener`](crate::types::Listener).
//!
//! 2. **Unresolvable listener services** ([`EventsError::ListenerServiceNotFound`]):
//!    the resolver could not produce the service named by a registration.
//!
//! Every wrapping error keeps the original failure as its `source()`, so the
//! full chain is available for diagnostics.
//!
//! # Examples
//!
//! ```ignore
//! match dispatcher.dispatch(&event) {
//!     Ok(()) => {}
//!     Err(EventsError::InvalidListener(e)) => eprintln!("{} ({:?})", e, e.kind()),
//!     Err(EventsError::ListenerServiceNotFound { service_id, .. }) => {
//!         eprintln!("register '{}' in the container", service_id)
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use duktig_di::DIError;
use thiserror::Error;

/// Failure reported by a listener while handling an event
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Which way a listener turned out to be invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidListenerKind {
    /// A callable listener failed or panicked while executing
    ExecutionFailure,
    /// A resolved service does not implement the listener capability
    WrongCapability,
}

/// A registered listener could not be used for an event
#[derive(Debug, Error)]
pub enum InvalidListenerError {
    /// A callable listener returned an error or panicked
    #[error("Invalid callable as listener provided for event '{event}', and it cannot be executed")]
    ExecutionFailed {
        event: String,
        #[source]
        source: ListenerError,
    },

    /// The service resolved for a listener id is not a listener
    #[error("Invalid service as listener '{service_id}' provided for event '{event}', expected {expected}")]
    WrongCapability {
        service_id: String,
        event: String,
        expected: &'static str,
    },
}

impl InvalidListenerError {
    pub fn kind(&self) -> InvalidListenerKind {
        match self {
            Self::ExecutionFailed { .. } => InvalidListenerKind::ExecutionFailure,
            Self::WrongCapability { .. } => InvalidListenerKind::WrongCapability,
        }
    }

    /// Name of the event being dispatched when the listener failed
    pub fn event(&self) -> &str {
        match self {
            Self::ExecutionFailed { event, .. } | Self::WrongCapability { event, .. } => event.as_str(),
        }
    }
}

/// A callable listener panicked during dispatch
#[derive(Debug, Error)]
#[error("listener panicked: {message}")]
pub struct ListenerPanic {
    pub message: String,
}

/// Errors that can occur in the event system
#[derive(Debug, Error)]
pub enum EventsError {
    #[error(transparent)]
    InvalidListener(#[from] InvalidListenerError),

    /// The resolver could not produce the service named by a listener registration
    #[error("Invalid service as listener '{service_id}' provided for event '{event}', and it cannot be resolved")]
    ListenerServiceNotFound {
        service_id: String,
        event: String,
        #[source]
        source: DIError,
    },

    /// A resolved listener service returned an error from `handle`
    #[error("Listener service '{service_id}' failed while handling event '{event}'")]
    ListenerFailed {
        service_id: String,
        event: String,
        #[source]
        source: ListenerError,
    },

    /// Listener storage could not be accessed
    ///
    /// Common causes:
    /// - Lock poisoning after a panic while the registry was being modified
    /// - Configuration file that exists but cannot be read
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Listener configuration is malformed or fails validation
    #[error("Invalid listener configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EventsError {
    /// The invalid-listener details, if this is an invalid-listener failure
    pub fn as_invalid_listener(&self) -> Option<&InvalidListenerError> {
        match self {
            Self::InvalidListener(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for event system operations
pub type Result<T> = std::result::Result<T, EventsError>;
