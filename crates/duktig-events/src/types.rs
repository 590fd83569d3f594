//! Core data types for the event system
//!
//! Events are anything with a name. Listeners come in two shapes, captured by
//! [`ListenerRegistration`]: a closure invoked directly, or the identifier of
//! a service the resolver builds on demand and which must implement
//! [`Listener`].
//!
//! # Examples
//!
//! ```
//! use duktig_events::{GenericEvent, ListenerRegistration};
//!
//! let event = GenericEvent::new("user.registered")
//!     .with_payload(serde_json::json!({ "user_id": 7 }));
//!
//! let direct = ListenerRegistration::callable(|event| {
//!     println!("got {}", event.name());
//!     Ok(())
//! });
//! let by_name = ListenerRegistration::from("mailer.welcome");
//!
//! assert!(direct.is_callable());
//! assert_eq!(by_name.service_id(), Some("mailer.welcome"));
//! # let _ = event;
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ListenerError;

/// Fully qualified name of the capability resolved listener services must provide
pub const LISTENER_CONTRACT: &str = "duktig_events::Listener";

/// A named event passed to listeners
pub trait Event: Send + Sync {
    /// Name used to look up the listeners of this event
    fn name(&self) -> &str;
}

/// A general purpose event carrying a JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEvent {
    /// Event name (e.g. "user.registered")
    pub name: String,

    /// Event data
    #[serde(default)]
    pub payload: serde_json::Value,

    /// When the event was created
    pub timestamp: DateTime<Utc>,
}

impl GenericEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

impl Event for GenericEvent {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Capability a container-resolved service needs to act as a listener
pub trait Listener: Send + Sync {
    /// Handle a dispatched event
    fn handle(&self, event: &dyn Event) -> Result<(), ListenerError>;
}

/// How listener services are stored in a resolver
///
/// The resolver hands out type-erased instances, so a service only passes the
/// capability check when the erased value is exactly this type. Use
/// [`register_listener_service`](crate::register_listener_service) to store
/// one.
pub type ListenerService = Arc<dyn Listener>;

/// A closure invoked directly with the event
pub type CallableListener = Arc<dyn Fn(&dyn Event) -> Result<(), ListenerError> + Send + Sync>;

/// A listener as stored by the underlying dispatcher
#[derive(Clone)]
pub enum ListenerRegistration {
    /// Invoked directly with the event
    Callable(CallableListener),
    /// Identifier of a service resolved through the container
    Service(String),
}

impl ListenerRegistration {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&dyn Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    pub fn service(id: impl Into<String>) -> Self {
        Self::Service(id.into())
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    pub fn service_id(&self) -> Option<&str> {
        match self {
            Self::Service(id) => Some(id),
            Self::Callable(_) => None,
        }
    }
}

impl PartialEq for ListenerRegistration {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(a, b),
            (Self::Service(a), Self::Service(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(callable) => f
                .debug_tuple("Callable")
                .field(&Arc::as_ptr(callable))
                .finish(),
            Self::Service(id) => f.debug_tuple("Service").field(id).finish(),
        }
    }
}

impl From<&str> for ListenerRegistration {
    fn from(id: &str) -> Self {
        Self::Service(id.to_string())
    }
}

impl From<String> for ListenerRegistration {
    fn from(id: String) -> Self {
        Self::Service(id)
    }
}

impl From<CallableListener> for ListenerRegistration {
    fn from(callable: CallableListener) -> Self {
        Self::Callable(callable)
    }
}
