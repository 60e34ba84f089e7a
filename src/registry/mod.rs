//! The service registry.
//!
//! This module contains the [`Registry`] type, which stores factories keyed by
//! type and invokes them on demand.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::ReentrantMutex;

use crate::error::{RegistrationResult, ResolveError, ResolveResult};
use crate::internal::{InFlightGuard, InFlightSet};
use crate::key::TypeKey;
use crate::observer::Observers;
use crate::registration::{AnyBox, RegistrationTable};

pub mod builder;
pub use builder::RegistryBuilder;

/// Thread-safe runtime service registry.
///
/// Factories are registered per type and invoked again on every
/// [`resolve`](Registry::resolve); the registry never caches products.
///
/// # Thread Safety
///
/// A single reentrant lock serializes every operation. It stays held for the
/// whole duration of a resolve, including all nested resolutions performed by
/// the factory, so a factory may freely resolve its own dependencies while
/// other threads wait their turn.
///
/// # Circular dependencies
///
/// A type is marked in flight while its factory runs. Requesting it again
/// anywhere inside that factory's call chain fails with
/// [`ResolveError::CircularDependency`] before anything is invoked. The mark
/// is always removed when the factory returns or unwinds, so independent
/// resolutions never observe each other.
///
/// # Examples
///
/// ```
/// use sky_resolver::Registry;
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let registry = Arc::new(Registry::new());
/// registry.register(|| Arc::new(Database { url: "postgres://localhost".to_string() })).unwrap();
///
/// let r = registry.clone();
/// registry.register(move || UserService { db: r.resolve_required() }).unwrap();
///
/// let users = registry.resolve::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct Registry {
    inner: ReentrantMutex<RegistryInner>,
    observers: Observers,
}

struct RegistryInner {
    table: RefCell<RegistrationTable>,
    in_flight: RefCell<InFlightSet>,
}

impl Registry {
    /// Creates an empty registry without observers.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Starts configuring a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(capacity: usize, observers: Observers) -> Self {
        Self {
            inner: ReentrantMutex::new(RegistryInner {
                table: RefCell::new(RegistrationTable::with_capacity(capacity)),
                in_flight: RefCell::new(InFlightSet::default()),
            }),
            observers,
        }
    }

    /// Registers `factory` as the constructor for `T`.
    ///
    /// Fails with [`RegistrationError::TypeAlreadyRegistered`](crate::RegistrationError::TypeAlreadyRegistered)
    /// if `T` already has a factory; the existing one stays in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use sky_resolver::{Registry, RegistrationError};
    ///
    /// let registry = Registry::new();
    /// assert!(registry.register(|| 1u16).is_ok());
    /// assert!(matches!(
    ///     registry.register(|| 2u16),
    ///     Err(RegistrationError::TypeAlreadyRegistered(_))
    /// ));
    /// assert_eq!(registry.resolve::<u16>(), Ok(1));
    /// ```
    pub fn register<T, F>(&self, factory: F) -> RegistrationResult<()>
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_with(false, factory)
    }

    /// Registers `factory` for `T`, replacing any existing factory.
    ///
    /// ```
    /// use sky_resolver::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.register(|| 1u16).unwrap();
    /// registry.register_override(|| 2u16).unwrap();
    /// assert_eq!(registry.resolve::<u16>(), Ok(2));
    /// ```
    pub fn register_override<T, F>(&self, factory: F) -> RegistrationResult<()>
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_with(true, factory)
    }

    /// Registers `factory` for `T` with an explicit override flag.
    pub fn register_with<T, F>(&self, override_existing: bool, factory: F) -> RegistrationResult<()>
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_any(TypeKey::of::<T>(), override_existing, move || {
            Box::new(factory()) as AnyBox
        })
    }

    /// Registers a type-erased factory under an arbitrary key.
    ///
    /// Nothing ties the product to `key`; if it is not of the type `key`
    /// stands for, a typed [`resolve`](Registry::resolve) reports
    /// [`ResolveError::TypeNotRegistered`].
    pub fn register_any<F>(&self, key: TypeKey, override_existing: bool, factory: F) -> RegistrationResult<()>
    where
        F: Fn() -> AnyBox + Send + Sync + 'static,
    {
        let inner = self.inner.lock();
        let outcome = inner
            .table
            .borrow_mut()
            .insert(key, Arc::new(factory), override_existing);

        match outcome {
            Ok(replaced) => {
                tracing::trace!(key = %key, replaced, "factory stored");
                self.observers.registered(&key, replaced);
                Ok(())
            }
            Err(err) => {
                self.observers.registration_rejected(&key);
                Err(err)
            }
        }
    }

    /// Invokes the factory registered for `T` and returns its product.
    ///
    /// # Errors
    ///
    /// * [`ResolveError::TypeNotRegistered`] - nothing is registered for `T`,
    ///   or the registered factory does not produce a `T`.
    /// * [`ResolveError::CircularDependency`] - `T` is already being resolved
    ///   further up the current call chain.
    ///
    /// A failed [`resolve_required`](Registry::resolve_required) anywhere in
    /// the factory's call chain ends up here as the same error. Any other panic
    /// raised by a factory propagates to the caller unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sky_resolver::{Registry, ResolveError};
    ///
    /// let registry = Registry::new();
    /// assert_eq!(
    ///     registry.resolve::<String>(),
    ///     Err(ResolveError::TypeNotRegistered("alloc::string::String"))
    /// );
    ///
    /// registry.register(|| "ready".to_string()).unwrap();
    /// assert_eq!(registry.resolve::<String>().unwrap(), "ready");
    /// ```
    pub fn resolve<T: 'static>(&self) -> ResolveResult<T> {
        let key = TypeKey::of::<T>();
        let product = self.resolve_any(&key)?;

        match product.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => {
                let err = ResolveError::TypeNotRegistered(key.display_name());
                self.observers.resolve_failed(&key, &err);
                Err(err)
            }
        }
    }

    /// Resolves `T`, panicking on failure.
    ///
    /// This is the fail-fast counterpart of [`resolve`](Registry::resolve),
    /// meant for pulling dependencies inside a factory and for wiring code
    /// where a missing or cyclic registration is a startup bug.
    ///
    /// Called from inside a factory of this registry, the panic carries the
    /// [`ResolveError`] itself; the enclosing [`resolve`](Registry::resolve)
    /// catches it and returns it as `Err`. Called outside any resolution it
    /// panics with a readable message.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered, its factory produces another type, or
    /// `T` is part of a cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use sky_resolver::{Registry, ResolveError};
    /// use std::sync::Arc;
    ///
    /// struct A;
    /// struct B;
    ///
    /// let registry = Arc::new(Registry::new());
    /// let r = registry.clone();
    /// registry.register(move || { let _: B = r.resolve_required(); A }).unwrap();
    /// let r = registry.clone();
    /// registry.register(move || { let _: A = r.resolve_required(); B }).unwrap();
    ///
    /// assert!(matches!(registry.resolve::<A>(), Err(ResolveError::CircularDependency(_))));
    /// ```
    pub fn resolve_required<T: 'static>(&self) -> T {
        match self.resolve::<T>() {
            Ok(value) => value,
            Err(err) if self.is_resolving() => panic::panic_any(err),
            Err(err) => panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), err),
        }
    }

    // True when the calling thread is inside a factory of this registry. Any
    // other thread would block on the lock until the in-flight set is empty.
    fn is_resolving(&self) -> bool {
        !self.inner.lock().in_flight.borrow().is_empty()
    }

    /// Invokes the factory registered under `key` without checking its product type.
    pub fn resolve_any(&self, key: &TypeKey) -> ResolveResult<AnyBox> {
        let inner = self.inner.lock();
        let result = self.resolve_locked(&inner, *key);
        if let Err(err) = &result {
            self.observers.resolve_failed(key, err);
        }
        result
    }

    fn resolve_locked(&self, inner: &RegistryInner, key: TypeKey) -> ResolveResult<AnyBox> {
        let _in_flight = InFlightGuard::enter(&inner.in_flight, key).map_err(|err| {
            tracing::debug!(key = %key, error = %err, "circular resolution rejected");
            err
        })?;

        // Clone the factory out so no borrow is held while it re-enters.
        let factory = inner
            .table
            .borrow()
            .get(&key)
            .ok_or(ResolveError::TypeNotRegistered(key.display_name()))?;

        tracing::trace!(key = %key, "invoking factory");
        let observed = self.observers.has_observers();
        let start = Instant::now();
        if observed {
            self.observers.resolving(&key);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| factory())) {
            Ok(product) => {
                if observed {
                    self.observers.resolved(&key, start.elapsed());
                }
                Ok(product)
            }
            Err(payload) => match payload.downcast::<ResolveError>() {
                // A nested resolve_required failed; surface its error here
                Ok(err) => Err(*err),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::debug!(key = %key, panic = message, "factory panicked");
                    self.observers.factory_panic(&key, message);
                    panic::resume_unwind(payload)
                }
            },
        }
    }

    /// Returns true if a factory is registered for `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&TypeKey::of::<T>())
    }

    /// Returns true if a factory is registered under `key`.
    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.inner.lock().table.borrow().contains_key(key)
    }

    /// Removes all registrations.
    ///
    /// Must not be called from inside a factory. If it is, the table is still
    /// cleared but the resolutions in progress finish normally.
    pub fn reset(&self) {
        let inner = self.inner.lock();
        if !inner.in_flight.borrow().is_empty() {
            tracing::warn!("registry reset while a resolution is in progress");
        }
        let count = inner.table.borrow_mut().clear();
        tracing::trace!(count, "registry reset");
        self.observers.reset(count);
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.inner.lock().table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of every registered type, in no particular order.
    pub fn registered_keys(&self) -> Vec<TypeKey> {
        self.inner.lock().table.borrow().keys().copied().collect()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut keys = self.registered_keys();
        keys.sort_by_key(|k| k.display_name());

        let mut s = String::new();
        s.push_str("=== Registry Debug ===\n");
        s.push_str(&format!("Observers: {}\n", self.observers.len()));
        s.push_str("Registrations:\n");
        for key in keys {
            s.push_str(&format!("  {}\n", key));
        }
        s
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registrations", &self.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "Box<dyn Any>"
    }
}
