//! Dispatcher adapter over a listener registry and a service resolver

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use duktig_di::Resolver;
use tracing::{debug, trace};

use crate::{
    error::{EventsError, InvalidListenerError, ListenerError, ListenerPanic, Result},
    registry::ListenerProvider,
    types::{CallableListener, Event, ListenerRegistration, ListenerService, LISTENER_CONTRACT},
};

/// [`EventDispatcher`](super::EventDispatcher) backed by an external listener
/// registry and resolver
///
/// Registration is forwarded to the registry untouched. On dispatch, callable
/// listeners are invoked directly; service listeners are resolved through the
/// resolver on every dispatch and must be stored as a
/// [`ListenerService`]. Neither collaborator is owned exclusively: both are
/// shared with the caller for the adapter's lifetime.
#[derive(Clone)]
pub struct EventDispatcherAdapter {
    dispatcher: Arc<dyn ListenerProvider>,
    resolver: Arc<dyn Resolver>,
}

impl EventDispatcherAdapter {
    /// Create a new adapter
    ///
    /// # Arguments
    ///
    /// * `dispatcher` - Registry holding listeners per event name
    /// * `resolver` - Resolver producing listener services by id
    pub fn new(dispatcher: Arc<dyn ListenerProvider>, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            dispatcher,
            resolver,
        }
    }

    /// Underlying listener registry
    pub fn dispatcher(&self) -> &Arc<dyn ListenerProvider> {
        &self.dispatcher
    }

    fn invoke_callable(
        &self,
        event_name: &str,
        callable: &CallableListener,
        event: &dyn Event,
    ) -> Result<()> {
        trace!(event = %event_name, "Invoking callable listener");

        let source: ListenerError =
            match panic::catch_unwind(AssertUnwindSafe(|| callable(event))) {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => e,
                Err(payload) => Box::new(ListenerPanic {
                    message: panic_message(payload.as_ref()),
                }),
            };

        Err(InvalidListenerError::ExecutionFailed {
            event: event_name.to_string(),
            source,
        }
        .into())
    }

    fn invoke_service(&self, event_name: &str, service_id: &str, event: &dyn Event) -> Result<()> {
        trace!(event = %event_name, service_id = %service_id, "Resolving listener service");

        let instance = self.resolver.get(service_id).map_err(|source| {
            EventsError::ListenerServiceNotFound {
                service_id: service_id.to_string(),
                event: event_name.to_string(),
                source,
            }
        })?;

        let listener = instance.downcast::<ListenerService>().map_err(|_| {
            InvalidListenerError::WrongCapability {
                service_id: service_id.to_string(),
                event: event_name.to_string(),
                expected: LISTENER_CONTRACT,
            }
        })?;

        listener
            .handle(event)
            .map_err(|source| EventsError::ListenerFailed {
                service_id: service_id.to_string(),
                event: event_name.to_string(),
                source,
            })
    }
}

impl super::EventDispatcher for EventDispatcherAdapter {
    fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    fn add_listener(&self, event_name: &str, listener: ListenerRegistration) -> Result<()> {
        self.dispatcher.add_listener(event_name, listener)
    }

    fn dispatch(&self, event: &dyn Event) -> Result<()> {
        let event_name = event.name();
        let listeners = self.dispatcher.get_listeners(event_name)?;

        if listeners.is_empty() {
            debug!(event = %event_name, "No listeners registered for event");
            return Ok(());
        }

        debug!(
            event = %event_name,
            listener_count = listeners.len(),
            "Dispatching event"
        );

        for listener in &listeners {
            match listener {
                ListenerRegistration::Callable(callable) => {
                    self.invoke_callable(event_name, callable, event)?
                }
                ListenerRegistration::Service(service_id) => {
                    self.invoke_service(event_name, service_id, event)?
                }
            }
        }

        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use duktig_di::{DIError, DIResult, ServiceContainer, ServiceInstance};

    use super::*;
    use crate::{
        dispatcher::EventDispatcher,
        error::InvalidListenerKind,
        registry::InMemoryListenerProvider,
        types::{GenericEvent, Listener},
    };

    /// Records every call made to the registry
    #[derive(Default)]
    struct RecordingProvider {
        added: Mutex<Vec<(String, ListenerRegistration)>>,
        listeners: Mutex<Vec<ListenerRegistration>>,
        lookups: Mutex<Vec<String>>,
    }

    impl ListenerProvider for RecordingProvider {
        fn add_listener(&self, event_name: &str, listener: ListenerRegistration) -> Result<()> {
            self.added
                .lock()
                .unwrap()
                .push((event_name.to_string(), listener));
            Ok(())
        }

        fn get_listeners(&self, event_name: &str) -> Result<Vec<ListenerRegistration>> {
            self.lookups.lock().unwrap().push(event_name.to_string());
            Ok(self.listeners.lock().unwrap().clone())
        }

        fn event_names(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn remove_listeners(&self, _event_name: &str) -> Result<usize> {
            Ok(0)
        }
    }

    /// Resolver that fails every lookup the way a missing service would
    struct EmptyResolver;

    impl Resolver for EmptyResolver {
        fn get(&self, id: &str) -> DIResult<ServiceInstance> {
            Err(DIError::ServiceNotRegistered {
                service_id: id.to_string(),
            })
        }

        fn has(&self, _id: &str) -> bool {
            false
        }
    }

    /// Address of the event value behind a trait object
    fn event_addr(event: &dyn Event) -> usize {
        event as *const _ as *const () as usize
    }

    struct RecordingListener {
        seen: Arc<Mutex<Vec<(String, usize)>>>,
    }

    impl Listener for RecordingListener {
        fn handle(&self, event: &dyn Event) -> std::result::Result<(), ListenerError> {
            self.seen
                .lock()
                .unwrap()
                .push((event.name().to_string(), event_addr(event)));
            Ok(())
        }
    }

    fn adapter_with(listeners: Vec<ListenerRegistration>) -> (EventDispatcherAdapter, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        *provider.listeners.lock().unwrap() = listeners;
        let adapter = EventDispatcherAdapter::new(provider.clone(), Arc::new(EmptyResolver));
        (adapter, provider)
    }

    #[test]
    fn test_add_listener_forwards_unmodified() {
        let (adapter, provider) = adapter_with(vec![]);
        let listener = ListenerRegistration::callable(|_| Ok(()));

        adapter.add_listener("test.event", listener.clone()).unwrap();

        let added = provider.added.lock().unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].0, "test.event");
        assert_eq!(added[0].1, listener);
    }

    #[test]
    fn test_dispatch_looks_up_by_event_name() {
        let (adapter, provider) = adapter_with(vec![]);

        adapter.dispatch(&GenericEvent::new("test.event")).unwrap();

        assert_eq!(*provider.lookups.lock().unwrap(), vec!["test.event"]);
    }

    #[test]
    fn test_callable_receives_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let (adapter, _) = adapter_with(vec![ListenerRegistration::callable(move |event| {
            sink.lock().unwrap().push(event.name().to_string());
            Ok(())
        })]);

        adapter.dispatch(&GenericEvent::new("test.event")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["test.event"]);
    }

    #[test]
    fn test_failing_callable_is_invalid_listener() {
        let (adapter, _) = adapter_with(vec![ListenerRegistration::callable(|_| {
            Err("boom".into())
        })]);

        let err = adapter.dispatch(&GenericEvent::new("test.event")).unwrap_err();

        let invalid = err.as_invalid_listener().expect("invalid listener error");
        assert_eq!(invalid.kind(), InvalidListenerKind::ExecutionFailure);
        assert!(err.to_string().contains("'test.event'"));
        assert!(err.to_string().contains("cannot be executed"));
    }

    #[test]
    fn test_panicking_callable_is_invalid_listener() {
        let (adapter, _) = adapter_with(vec![ListenerRegistration::callable(|_| {
            panic!("listener exploded")
        })]);

        let err = adapter.dispatch(&GenericEvent::new("test.event")).unwrap_err();

        match err {
            EventsError::InvalidListener(InvalidListenerError::ExecutionFailed { source, .. }) => {
                let captured = source.downcast_ref::<ListenerPanic>().expect("panic source");
                assert_eq!(captured.message, "listener exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unresolvable_service() {
        let (adapter, _) = adapter_with(vec![ListenerRegistration::service("UnresolvableServiceID")]);

        let err = adapter.dispatch(&GenericEvent::new("test.event")).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid service as listener 'UnresolvableServiceID' provided for event 'test.event', and it cannot be resolved"
        );
        assert!(matches!(
            err,
            EventsError::ListenerServiceNotFound {
                source: DIError::ServiceNotRegistered { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_resolved_service_without_listener_capability() {
        let container = ServiceContainer::new();
        container
            .register_instance("ResolvableServiceID", Arc::new("not a listener".to_string()))
            .unwrap();
        let adapter = EventDispatcherAdapter::new(
            Arc::new(InMemoryListenerProvider::new()),
            Arc::new(container),
        );
        adapter
            .add_listener("test.event", ListenerRegistration::service("ResolvableServiceID"))
            .unwrap();

        let err = adapter.dispatch(&GenericEvent::new("test.event")).unwrap_err();

        assert_eq!(
            err.as_invalid_listener().map(|e| e.kind()),
            Some(InvalidListenerKind::WrongCapability)
        );
        assert_eq!(
            err.to_string(),
            "Invalid service as listener 'ResolvableServiceID' provided for event 'test.event', expected duktig_events::Listener"
        );
    }

    #[test]
    fn test_resolved_listener_receives_dispatched_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let container = ServiceContainer::new();
        let listener: ListenerService = Arc::new(RecordingListener { seen: seen.clone() });
        container
            .register_instance("ResolvableServiceID", Arc::new(listener))
            .unwrap();
        let adapter = EventDispatcherAdapter::new(
            Arc::new(InMemoryListenerProvider::new()),
            Arc::new(container),
        );
        adapter
            .add_listener("test.event", ListenerRegistration::service("ResolvableServiceID"))
            .unwrap();

        let event = GenericEvent::new("test.event");
        adapter.dispatch(&event).unwrap();

        // the listener gets the dispatched event itself, not a copy
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("test.event".to_string(), event_addr(&event))]
        );
    }

    #[test]
    fn test_failure_stops_remaining_listeners() {
        let ran = Arc::new(Mutex::new(Vec::new()));
        let first = ran.clone();
        let third = ran.clone();
        let (adapter, _) = adapter_with(vec![
            ListenerRegistration::callable(move |_| {
                first.lock().unwrap().push("first");
                Ok(())
            }),
            ListenerRegistration::service("missing"),
            ListenerRegistration::callable(move |_| {
                third.lock().unwrap().push("third");
                Ok(())
            }),
        ]);

        assert!(adapter.dispatch(&GenericEvent::new("test.event")).is_err());
        assert_eq!(*ran.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn test_resolver_accessor_returns_injected_resolver() {
        let resolver: Arc<dyn Resolver> = Arc::new(EmptyResolver);
        let adapter = EventDispatcherAdapter::new(
            Arc::new(InMemoryListenerProvider::new()),
            resolver.clone(),
        );

        assert!(Arc::ptr_eq(adapter.resolver(), &resolver));
    }
}
