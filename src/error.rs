//! Error types for the service registry.

use std::fmt;

/// Errors returned by [`Registry::register`](crate::Registry::register) and friends.
///
/// # Examples
///
/// ```rust
/// use sky_resolver::{Registry, RegistrationError};
///
/// let registry = Registry::new();
/// registry.register(|| 1u32).unwrap();
///
/// match registry.register(|| 2u32) {
///     Err(RegistrationError::TypeAlreadyRegistered(name)) => assert_eq!(name, "u32"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A factory is already registered for this type and override was not requested
    TypeAlreadyRegistered(&'static str),
}

impl RegistrationError {
    /// Short explanation of why the registration failed.
    pub fn failure_reason(&self) -> &'static str {
        match self {
            RegistrationError::TypeAlreadyRegistered(_) => "Type has already been registered",
        }
    }

    /// What the caller can do about it.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistrationError::TypeAlreadyRegistered(_) => {
                "Use `register_override` to replace the existing factory, or register a different type"
            }
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::TypeAlreadyRegistered(name) => {
                write!(f, "Type already registered: {}", name)
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Errors returned by [`Registry::resolve`](crate::Registry::resolve).
///
/// A factory whose product cannot be downcast to the requested type is
/// reported as [`ResolveError::TypeNotRegistered`], exactly like a missing
/// registration.
///
/// # Examples
///
/// ```rust
/// use sky_resolver::ResolveError;
///
/// let not_registered = ResolveError::TypeNotRegistered("Database");
/// let circular = ResolveError::CircularDependency(vec!["Egg", "Chicken", "Egg"]);
///
/// assert_eq!(not_registered.to_string(), "Type not registered: Database");
/// assert_eq!(circular.to_string(), "Circular dependency: Egg -> Chicken -> Egg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No factory registered, or its product is not the requested type
    TypeNotRegistered(&'static str),
    /// The type is already being resolved further up the current chain (includes path)
    CircularDependency(Vec<&'static str>),
}

impl ResolveError {
    /// Short explanation of why the resolution failed.
    pub fn failure_reason(&self) -> &'static str {
        match self {
            ResolveError::TypeNotRegistered(_) => {
                "Trying to resolve a type that has not been registered yet"
            }
            ResolveError::CircularDependency(_) => {
                "Type was requested again while its own factory was still running"
            }
        }
    }

    /// What the caller can do about it.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ResolveError::TypeNotRegistered(_) => {
                "Make sure to register the type you want to resolve"
            }
            ResolveError::CircularDependency(_) => {
                "Break the cycle by restructuring the factories involved"
            }
        }
    }

    /// Returns true for [`ResolveError::CircularDependency`].
    pub fn is_circular(&self) -> bool {
        matches!(self, ResolveError::CircularDependency(_))
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::TypeNotRegistered(name) => write!(f, "Type not registered: {}", name),
            ResolveError::CircularDependency(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Result type for registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Result type for resolution.
///
/// ```rust
/// use sky_resolver::{ResolveResult, ResolveError};
///
/// fn lookup() -> ResolveResult<u8> {
///     Err(ResolveError::TypeNotRegistered("u8"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ResolveResult<T> = Result<T, ResolveError>;
