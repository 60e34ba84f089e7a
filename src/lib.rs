//! # sky-resolver
//!
//! A thread-safe runtime service locator. Register a constructor closure per
//! type, then resolve that type anywhere; the closure runs on every resolve.
//!
//! ## Features
//!
//! - **Type-keyed**: registrations are keyed by [`TypeId`](std::any::TypeId), including trait objects
//! - **Conflict or override**: duplicate registrations fail unless override is requested
//! - **Circular dependency detection**: cycles are reported with their path instead of recursing forever
//! - **Thread-safe**: one reentrant lock serializes all registry operations
//!
//! ## Quick Start
//!
//! ```rust
//! use sky_resolver::Registry;
//! use std::sync::Arc;
//!
//! trait Worker: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! struct Carpenter;
//! impl Worker for Carpenter {
//!     fn name(&self) -> &str { "carpenter" }
//! }
//!
//! struct Manager {
//!     worker: Arc<dyn Worker>,
//! }
//!
//! let registry = Arc::new(Registry::new());
//! registry.register(|| Arc::new(Carpenter) as Arc<dyn Worker>).unwrap();
//!
//! let r = registry.clone();
//! registry.register(move || Manager { worker: r.resolve_required() }).unwrap();
//!
//! let manager = registry.resolve::<Manager>().unwrap();
//! assert_eq!(manager.worker.name(), "carpenter");
//! ```
//!
//! ## Circular dependencies
//!
//! ```rust
//! use sky_resolver::{shared, ResolveError};
//!
//! struct Egg;
//! struct Chicken;
//!
//! shared().register_override(|| { let _ = shared().resolve::<Chicken>(); Egg }).unwrap();
//! shared().register_override(|| {
//!     assert!(matches!(shared().resolve::<Egg>(), Err(ResolveError::CircularDependency(_))));
//!     Chicken
//! }).unwrap();
//!
//! assert!(shared().resolve::<Egg>().is_ok());
//! ```

pub mod error;
pub mod global;
pub mod key;
pub mod observer;
pub mod registry;

mod internal;
mod registration;

pub use error::{RegistrationError, RegistrationResult, ResolveError, ResolveResult};
pub use global::shared;
pub use key::{key_of_type, TypeKey};
pub use observer::{LoggingObserver, RegistryObserver};
pub use registration::AnyBox;
pub use registry::{Registry, RegistryBuilder};
