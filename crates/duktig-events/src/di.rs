//! Dependency injection support for listener services
//!
//! The resolver hands out type-erased instances, so listener services have to
//! be stored as [`ListenerService`] for the dispatcher's capability check to
//! accept them. These helpers do the wrapping.

use std::sync::Arc;

use duktig_di::{DIResult, ServiceContainer};

use crate::types::{Listener, ListenerService};

/// Register a singleton listener service under `id`
pub fn register_listener_service<F, L>(
    container: &ServiceContainer,
    id: impl Into<String>,
    factory: F,
) -> DIResult<()>
where
    F: Fn(&ServiceContainer) -> DIResult<L> + Send + Sync + 'static,
    L: Listener + 'static,
{
    container.register(id, move |c| Ok(Arc::new(into_service(factory(c)?))))
}

/// Register a listener service that is rebuilt on every dispatch
pub fn register_transient_listener_service<F, L>(
    container: &ServiceContainer,
    id: impl Into<String>,
    factory: F,
) -> DIResult<()>
where
    F: Fn(&ServiceContainer) -> DIResult<L> + Send + Sync + 'static,
    L: Listener + 'static,
{
    container.register_transient(id, move |c| Ok(Arc::new(into_service(factory(c)?))))
}

/// Register an already constructed listener under `id`
pub fn register_listener_instance(
    container: &ServiceContainer,
    id: impl Into<String>,
    listener: ListenerService,
) -> DIResult<()> {
    container.register_instance(id, Arc::new(listener))
}

fn into_service<L: Listener + 'static>(listener: L) -> ListenerService {
    Arc::new(listener)
}
