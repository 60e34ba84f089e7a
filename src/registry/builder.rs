//! Registry configuration.

use std::sync::Arc;

use crate::observer::{LoggingObserver, Observers, RegistryObserver};
use crate::registry::Registry;

/// Builder for a [`Registry`].
///
/// # Examples
///
/// ```
/// use sky_resolver::Registry;
///
/// let registry = Registry::builder()
///     .with_capacity(32)
///     .logging()
///     .build();
///
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    capacity: usize,
    observers: Observers,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            capacity: 0,
            observers: Observers::new(),
        }
    }

    /// Pre-sizes the registration table.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Adds an observer. Observers are notified in the order they were added.
    pub fn observer(mut self, observer: Arc<dyn RegistryObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Adds a [`LoggingObserver`] with the default prefix.
    pub fn logging(self) -> Self {
        self.observer(Arc::new(LoggingObserver::new()))
    }

    pub fn build(self) -> Registry {
        Registry::from_parts(self.capacity, self.observers)
    }
}
