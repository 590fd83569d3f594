//! Dependency Injection Container for Duktig
//!
//! This crate provides the resolver side of the Duktig event system: a
//! service locator that maps string identifiers to service instances. The
//! event dispatcher adapter consumes it through the [`Resolver`] trait to
//! instantiate listener services that were registered by name.
//!
//! ## Quick Start
//!
//! ```rust
//! use duktig_di::{Resolver, ServiceContainer};
//! use std::sync::Arc;
//!
//! struct Mailer {
//!     sender: String,
//! }
//!
//! let container = ServiceContainer::new();
//! container
//!     .register("mailer", |_| {
//!         Ok(Arc::new(Mailer {
//!             sender: "noreply@example.com".to_string(),
//!         }))
//!     })
//!     .unwrap();
//!
//! let mailer = container.resolve::<Mailer>("mailer").unwrap();
//! assert_eq!(mailer.sender, "noreply@example.com");
//! assert!(container.has("mailer"));
//! ```

pub mod container;
pub mod resolver;

pub use container::{ServiceContainer, ServiceContainerBuilder, ServiceLifetime};
pub use resolver::{Resolver, ServiceInstance};

/// Errors that can occur during dependency injection operations
#[derive(Debug, thiserror::Error)]
pub enum DIError {
    #[error("Service not registered: {service_id}")]
    ServiceNotRegistered { service_id: String },

    #[error("Service already registered: {service_id}")]
    ServiceAlreadyRegistered { service_id: String },

    #[error("Invalid service type for '{service_id}': expected {expected}")]
    InvalidServiceType {
        service_id: String,
        expected: &'static str,
    },

    #[error("Dependency resolution failed: {message}")]
    DependencyResolutionFailed { message: String },

    #[error("Container lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type DIResult<T> = Result<T, DIError>;
