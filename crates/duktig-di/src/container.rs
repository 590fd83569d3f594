//! String-keyed service container

use std::any::type_name;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::resolver::{Resolver, ServiceInstance};
use crate::{DIError, DIResult};

type ServiceFactory = Arc<dyn Fn(&ServiceContainer) -> DIResult<ServiceInstance> + Send + Sync>;

/// Service lifetime management
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// Service is created once and reused for the lifetime of the container
    Singleton,
    /// Service is created each time it's requested
    Transient,
}

/// Service descriptor containing registration information
struct ServiceDescriptor {
    factory: ServiceFactory,
    lifetime: ServiceLifetime,
    instance: Option<ServiceInstance>,
    type_name: &'static str,
}

/// The dependency injection container
///
/// Services are keyed by identifier rather than by type, so the same type may
/// be registered several times under different names. Factories receive the
/// container and may resolve their own dependencies; no lock is held while a
/// factory runs.
pub struct ServiceContainer {
    services: RwLock<HashMap<String, ServiceDescriptor>>,
}

impl ServiceContainer {
    /// Create a new empty container
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Register a singleton service with a factory function
    pub fn register<F, T>(&self, id: impl Into<String>, factory: F) -> DIResult<()>
    where
        F: Fn(&ServiceContainer) -> DIResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.insert(id.into(), ServiceLifetime::Singleton, factory)
    }

    /// Register a transient service
    pub fn register_transient<F, T>(&self, id: impl Into<String>, factory: F) -> DIResult<()>
    where
        F: Fn(&ServiceContainer) -> DIResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.insert(id.into(), ServiceLifetime::Transient, factory)
    }

    /// Register an already constructed singleton
    pub fn register_instance<T>(&self, id: impl Into<String>, instance: Arc<T>) -> DIResult<()>
    where
        T: Send + Sync + 'static,
    {
        let id = id.into();
        let erased: ServiceInstance = instance;
        let stored = erased.clone();
        let factory: ServiceFactory =
            Arc::new(move |_: &ServiceContainer| -> DIResult<ServiceInstance> { Ok(stored.clone()) });

        self.store(
            id,
            ServiceDescriptor {
                factory,
                lifetime: ServiceLifetime::Singleton,
                instance: Some(erased),
                type_name: type_name::<T>(),
            },
        )
    }

    fn insert<F, T>(&self, id: String, lifetime: ServiceLifetime, factory: F) -> DIResult<()>
    where
        F: Fn(&ServiceContainer) -> DIResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let wrapped: ServiceFactory = Arc::new(move |container: &ServiceContainer| -> DIResult<ServiceInstance> {
            let result = factory(container)?;
            Ok(result as ServiceInstance)
        });

        self.store(
            id,
            ServiceDescriptor {
                factory: wrapped,
                lifetime,
                instance: None,
                type_name: type_name::<T>(),
            },
        )
    }

    fn store(&self, id: String, descriptor: ServiceDescriptor) -> DIResult<()> {
        let mut services = self.write()?;

        if services.contains_key(&id) {
            return Err(DIError::ServiceAlreadyRegistered { service_id: id });
        }

        debug!(
            service_id = %id,
            service_type = descriptor.type_name,
            lifetime = ?descriptor.lifetime,
            "Registered service"
        );
        services.insert(id, descriptor);
        Ok(())
    }

    /// Resolve a service and downcast it to `T`
    pub fn resolve<T>(&self, id: &str) -> DIResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.instance(id)?
            .downcast::<T>()
            .map_err(|_| DIError::InvalidServiceType {
                service_id: id.to_string(),
                expected: type_name::<T>(),
            })
    }

    fn instance(&self, id: &str) -> DIResult<ServiceInstance> {
        let (factory, lifetime) = {
            let services = self.read()?;
            let descriptor = services
                .get(id)
                .ok_or_else(|| DIError::ServiceNotRegistered {
                    service_id: id.to_string(),
                })?;

            if let Some(instance) = &descriptor.instance {
                return Ok(instance.clone());
            }
            (descriptor.factory.clone(), descriptor.lifetime)
        };

        let instance = factory(self)?;

        if lifetime == ServiceLifetime::Singleton {
            let mut services = self.write()?;
            if let Some(descriptor) = services.get_mut(id) {
                // Another thread may have finished constructing first; keep its instance.
                if let Some(existing) = &descriptor.instance {
                    return Ok(existing.clone());
                }
                descriptor.instance = Some(instance.clone());
            }
        }

        Ok(instance)
    }

    /// Check if a service is registered
    pub fn is_registered(&self, id: &str) -> bool {
        self.read()
            .map(|services| services.contains_key(id))
            .unwrap_or(false)
    }

    /// Get the number of registered services
    pub fn service_count(&self) -> usize {
        self.read().map(|services| services.len()).unwrap_or(0)
    }

    /// Registered service identifiers, sorted
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .read()
            .map(|services| services.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Clear all registered services
    pub fn clear(&self) -> DIResult<()> {
        self.write()?.clear();
        info!("Cleared all services from container");
        Ok(())
    }

    fn read(&self) -> DIResult<RwLockReadGuard<'_, HashMap<String, ServiceDescriptor>>> {
        self.services
            .read()
            .map_err(|e| DIError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> DIResult<RwLockWriteGuard<'_, HashMap<String, ServiceDescriptor>>> {
        self.services
            .write()
            .map_err(|e| DIError::LockPoisoned(e.to_string()))
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for ServiceContainer {
    fn get(&self, id: &str) -> DIResult<ServiceInstance> {
        self.instance(id)
    }

    fn has(&self, id: &str) -> bool {
        self.is_registered(id)
    }
}

/// Builder pattern for configuring the container
pub struct ServiceContainerBuilder {
    container: ServiceContainer,
}

impl ServiceContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: ServiceContainer::new(),
        }
    }

    /// Register a singleton service
    pub fn register<F, T>(self, id: impl Into<String>, factory: F) -> DIResult<Self>
    where
        F: Fn(&ServiceContainer) -> DIResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.container.register(id, factory)?;
        Ok(self)
    }

    /// Register a transient service
    pub fn register_transient<F, T>(self, id: impl Into<String>, factory: F) -> DIResult<Self>
    where
        F: Fn(&ServiceContainer) -> DIResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.container.register_transient(id, factory)?;
        Ok(self)
    }

    /// Register an already constructed singleton
    pub fn register_instance<T>(self, id: impl Into<String>, instance: Arc<T>) -> DIResult<Self>
    where
        T: Send + Sync + 'static,
    {
        self.container.register_instance(id, instance)?;
        Ok(self)
    }

    /// Build the container
    pub fn build(self) -> ServiceContainer {
        self.container
    }
}

impl Default for ServiceContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
