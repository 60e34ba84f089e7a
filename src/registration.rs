//! Registration table types.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RegistrationError, RegistrationResult};
use crate::key::TypeKey;

#[cfg(feature = "ahash")]
type TableHasher = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
type TableHasher = std::collections::hash_map::RandomState;

/// Type-erased factory product.
pub type AnyBox = Box<dyn Any>;

// Arc so a factory can be cloned out of the table and invoked without
// holding a borrow while it re-enters the registry.
pub(crate) type Factory = Arc<dyn Fn() -> AnyBox + Send + Sync>;

/// TypeKey -> Factory, at most one entry per key.
pub(crate) struct RegistrationTable {
    entries: HashMap<TypeKey, Factory, TableHasher>,
}

impl RegistrationTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(capacity, TableHasher::default()),
        }
    }

    /// Stores `factory` under `key`.
    ///
    /// Without `override_existing` an occupied key is rejected and the table
    /// is left untouched. Returns whether an existing factory was replaced.
    pub(crate) fn insert(
        &mut self,
        key: TypeKey,
        factory: Factory,
        override_existing: bool,
    ) -> RegistrationResult<bool> {
        if !override_existing && self.entries.contains_key(&key) {
            return Err(RegistrationError::TypeAlreadyRegistered(key.display_name()));
        }
        Ok(self.entries.insert(key, factory).is_some())
    }

    #[inline]
    pub(crate) fn get(&self, key: &TypeKey) -> Option<Factory> {
        self.entries.get(key).cloned()
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops every registration, returning how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.entries.keys()
    }
}
