//! Event dispatcher interface

pub mod adapter;

pub use adapter::EventDispatcherAdapter;

use std::sync::Arc;

use duktig_di::Resolver;

use crate::error::Result;
use crate::types::{Event, ListenerRegistration};

/// Trait for dispatching events to listeners
///
/// The EventDispatcher is responsible for:
/// 1. Accepting listener registrations for event names
/// 2. Looking up the listeners registered for a dispatched event
/// 3. Invoking callables directly and resolving named listener services
///
/// # Examples
///
/// ```ignore
/// let dispatcher = EventDispatcherAdapter::new(registry, container);
/// dispatcher.add_listener("user.registered", ListenerRegistration::service("mailer.welcome"))?;
/// dispatcher.dispatch(&GenericEvent::new("user.registered"))?;
/// ```
pub trait EventDispatcher: Send + Sync {
    /// Resolver used to instantiate listener services
    fn resolver(&self) -> &Arc<dyn Resolver>;

    /// Register a listener for an event name
    fn add_listener(&self, event_name: &str, listener: ListenerRegistration) -> Result<()>;

    /// Dispatch an event to its listeners
    ///
    /// Listeners run in registration order. The first failure stops the
    /// dispatch and is returned; listeners after it are not invoked.
    fn dispatch(&self, event: &dyn Event) -> Result<()>;
}
