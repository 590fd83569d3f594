//! Resolver contract consumed by the event dispatcher
//!
//! A resolver turns a service identifier into a type-erased instance. Callers
//! decide what capability they need by downcasting the returned value, which
//! keeps the resolver ignorant of listener or event types.

use std::any::Any;
use std::sync::Arc;

use crate::DIResult;

/// A type-erased, shareable service instance
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Lookup of services by string identifier
pub trait Resolver: Send + Sync {
    /// Produce the service registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DIError::ServiceNotRegistered`](crate::DIError::ServiceNotRegistered)
    /// when nothing is registered under `id`, or whatever error the service
    /// factory reported while constructing the instance.
    fn get(&self, id: &str) -> DIResult<ServiceInstance>;

    /// Whether a service is registered under `id`
    fn has(&self, id: &str) -> bool;
}
