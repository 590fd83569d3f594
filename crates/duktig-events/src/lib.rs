//! Duktig Event Dispatcher
//!
//! Routes named events to listeners kept in a listener registry, resolving
//! listeners registered by service id through a dependency injection
//! container.
//!
//! # Overview
//!
//! A listener is either a closure, invoked directly with the event, or the id
//! of a service that the resolver builds on demand and that implements
//! [`Listener`]. The [`EventDispatcherAdapter`] composes two collaborators it
//! does not own:
//!
//! 1. **Listener registry** (`registry`): stores listeners per event name and
//!    decides their order
//! 2. **Resolver** ([`duktig_di::Resolver`]): produces listener services by id
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use duktig_di::ServiceContainer;
//! use duktig_events::{
//!     register_listener_service, Event, EventDispatcher, EventDispatcherAdapter,
//!     GenericEvent, InMemoryListenerProvider, Listener, ListenerError, ListenerRegistration,
//! };
//!
//! struct WelcomeMailer;
//!
//! impl Listener for WelcomeMailer {
//!     fn handle(&self, event: &dyn Event) -> Result<(), ListenerError> {
//!         println!("sending welcome mail for {}", event.name());
//!         Ok(())
//!     }
//! }
//!
//! let container = ServiceContainer::new();
//! register_listener_service(&container, "mailer.welcome", |_| Ok(WelcomeMailer))?;
//!
//! let dispatcher = EventDispatcherAdapter::new(
//!     Arc::new(InMemoryListenerProvider::new()),
//!     Arc::new(container),
//! );
//! dispatcher.add_listener("user.registered", ListenerRegistration::service("mailer.welcome"))?;
//! dispatcher.add_listener(
//!     "user.registered",
//!     ListenerRegistration::callable(|event| {
//!         println!("audit: {}", event.name());
//!         Ok(())
//!     }),
//! )?;
//!
//! dispatcher.dispatch(&GenericEvent::new("user.registered"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod di;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod types;

pub use config::{ConfigLoader, ListenerConfig};
pub use di::{
    register_listener_instance, register_listener_service, register_transient_listener_service,
};
pub use dispatcher::{EventDispatcher, EventDispatcherAdapter};
pub use error::{
    EventsError, InvalidListenerError, InvalidListenerKind, ListenerError, ListenerPanic, Result,
};
pub use registry::{InMemoryListenerProvider, ListenerProvider};
pub use types::{
    CallableListener, Event, GenericEvent, Listener, ListenerRegistration, ListenerService,
    LISTENER_CONTRACT,
};
