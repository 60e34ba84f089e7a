//! The process-wide default registry.

use once_cell::sync::Lazy;

use crate::registry::Registry;

// Created on first access.
static SHARED: Lazy<Registry> = Lazy::new(Registry::new);

/// Provides a reference to the process-wide registry.
///
/// Convenient for application wiring. Tests should build their own
/// [`Registry`] instead of sharing this one.
///
/// # Examples
///
/// ```
/// use sky_resolver::shared;
///
/// shared().register_override(|| String::from("Hello from shared!")).unwrap();
/// assert_eq!(shared().resolve::<String>().unwrap(), "Hello from shared!");
/// ```
pub fn shared() -> &'static Registry {
    &SHARED
}
