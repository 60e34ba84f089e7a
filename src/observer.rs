//! Diagnostic observers for registry events.
//!
//! Observers are notified synchronously, and for registration and factory
//! events while the registry lock is held, so every other thread using the
//! same registry waits on them. Keep implementations lightweight.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ResolveError;
use crate::key::TypeKey;

/// Observer trait for registration and resolution events.
///
/// Only [`resolving`](Self::resolving) and [`resolved`](Self::resolved) are
/// required; the remaining hooks default to doing nothing.
///
/// # Examples
///
/// ```
/// use sky_resolver::{Registry, RegistryObserver, TypeKey};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolved: AtomicUsize,
/// }
///
/// impl RegistryObserver for CountingObserver {
///     fn resolving(&self, _key: &TypeKey) {}
///
///     fn resolved(&self, _key: &TypeKey, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let registry = Registry::builder().observer(observer.clone()).build();
///
/// registry.register(|| 7u8).unwrap();
/// assert_eq!(registry.resolve::<u8>(), Ok(7));
/// assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Called right before a factory is invoked.
    fn resolving(&self, key: &TypeKey);

    /// Called after a factory returned.
    ///
    /// `duration` covers the factory call including every nested resolution
    /// it triggered.
    fn resolved(&self, key: &TypeKey, duration: Duration);

    /// Called when a resolution fails for any reason.
    fn resolve_failed(&self, _key: &TypeKey, _error: &ResolveError) {}

    /// Called when a factory panics with anything other than a
    /// [`ResolveError`]. The panic keeps propagating after this call.
    fn factory_panic(&self, _key: &TypeKey, _message: &str) {}

    /// Called after a factory was stored. `replaced` is true when an existing
    /// factory was overridden.
    fn registered(&self, _key: &TypeKey, _replaced: bool) {}

    /// Called when a registration was refused because the key was taken.
    fn registration_rejected(&self, _key: &TypeKey) {}

    /// Called after [`Registry::reset`](crate::Registry::reset) dropped `count` registrations.
    fn reset(&self, _count: usize) {}
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &TypeKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &TypeKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn resolve_failed(&self, key: &TypeKey, error: &ResolveError) {
        for observer in &self.observers {
            observer.resolve_failed(key, error);
        }
    }

    pub(crate) fn factory_panic(&self, key: &TypeKey, message: &str) {
        for observer in &self.observers {
            observer.factory_panic(key, message);
        }
    }

    pub(crate) fn registered(&self, key: &TypeKey, replaced: bool) {
        for observer in &self.observers {
            observer.registered(key, replaced);
        }
    }

    pub(crate) fn registration_rejected(&self, key: &TypeKey) {
        for observer in &self.observers {
            observer.registration_rejected(key);
        }
    }

    pub(crate) fn reset(&self, count: usize) {
        for observer in &self.observers {
            observer.reset(count);
        }
    }
}

/// Built-in observer that forwards every event to `tracing`.
///
/// Successful registrations and resolutions are logged at `DEBUG`, conflicts
/// and failures at `WARN`. Install a subscriber (for example
/// `tracing_subscriber::fmt`) to see them.
///
/// # Examples
///
/// ```
/// use sky_resolver::{Registry, LoggingObserver};
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .observer(Arc::new(LoggingObserver::with_prefix("wiring")))
///     .build();
/// registry.register(|| "hello".to_string()).unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "sky-resolver".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn resolving(&self, key: &TypeKey) {
        tracing::debug!(registry = %self.prefix, key = %key, "Resolving");
    }

    fn resolved(&self, key: &TypeKey, duration: Duration) {
        tracing::debug!(registry = %self.prefix, key = %key, ?duration, "Resolved");
    }

    fn resolve_failed(&self, key: &TypeKey, error: &ResolveError) {
        tracing::warn!(registry = %self.prefix, key = %key, %error, "Resolution failed");
    }

    fn factory_panic(&self, key: &TypeKey, message: &str) {
        tracing::error!(registry = %self.prefix, key = %key, panic = message, "Factory panicked");
    }

    fn registered(&self, key: &TypeKey, replaced: bool) {
        tracing::debug!(registry = %self.prefix, key = %key, replaced, "Registered");
    }

    fn registration_rejected(&self, key: &TypeKey) {
        tracing::warn!(registry = %self.prefix, key = %key, "Registration rejected, type already registered");
    }

    fn reset(&self, count: usize) {
        tracing::debug!(registry = %self.prefix, count, "Registry reset");
    }
}
