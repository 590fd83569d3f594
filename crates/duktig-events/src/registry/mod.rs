//! Listener registry backing the event dispatcher
//!
//! The registry (the "underlying dispatcher") owns the mapping from event
//! names to ordered listener lists. The adapter only forwards registrations
//! to it and reads listener lists back; ordering is entirely the registry's
//! business.
//!
//! # Examples
//!
//! ```
//! use duktig_events::{InMemoryListenerProvider, ListenerProvider, ListenerRegistration};
//!
//! let registry = InMemoryListenerProvider::new();
//! registry.add_listener("user.registered", ListenerRegistration::service("mailer.welcome"))?;
//! registry.add_listener("user.registered", ListenerRegistration::service("audit.logger"))?;
//!
//! let listeners = registry.get_listeners("user.registered")?;
//! assert_eq!(listeners.len(), 2);
//! assert_eq!(listeners[0].service_id(), Some("mailer.welcome"));
//! # Ok::<(), duktig_events::EventsError>(())
//! ```

pub mod storage;

pub use storage::InMemoryListenerProvider;

use crate::{error::Result, types::ListenerRegistration};

/// Storage of listener registrations keyed by event name
///
/// # Thread Safety
///
/// All implementations must be thread-safe (`Send + Sync`); registration takes
/// `&self` so a provider can be shared behind an `Arc`.
pub trait ListenerProvider: Send + Sync {
    /// Append a listener for an event
    fn add_listener(&self, event_name: &str, listener: ListenerRegistration) -> Result<()>;

    /// Listeners registered for an event, in invocation order
    ///
    /// An event without listeners yields an empty list.
    fn get_listeners(&self, event_name: &str) -> Result<Vec<ListenerRegistration>>;

    /// Whether at least one listener is registered for an event
    fn has_listeners(&self, event_name: &str) -> Result<bool> {
        Ok(!self.get_listeners(event_name)?.is_empty())
    }

    /// Names of all events with listeners, sorted
    fn event_names(&self) -> Result<Vec<String>>;

    /// Drop every listener of an event, returning how many were removed
    fn remove_listeners(&self, event_name: &str) -> Result<usize>;
}
