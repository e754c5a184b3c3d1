//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during binding
/// registration, container freezing, or resolution in lattice-di.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{BindingSet, DiError, Resolver};
///
/// let container = BindingSet::new().build().unwrap();
/// match container.get::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Key already registered in the same binding set
    DuplicateBinding(&'static str),
    /// Alias rule points at a key with no registration in the container chain
    InvalidAlias {
        /// Display name of the alias key
        alias: &'static str,
        /// Display name of the missing target key
        target: &'static str,
    },
    /// No binding found in the container chain
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes the full cycle path)
    Circular(Vec<String>),
    /// Resolution attempted on a closed container
    Closed,
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::DuplicateBinding(name) => {
                write!(f, "Binding already registered: {}", name)
            }
            DiError::InvalidAlias { alias, target } => {
                write!(f, "Alias {} points at unregistered target {}", alias, target)
            }
            DiError::NotFound(name) => write!(f, "Binding not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::Closed => write!(f, "Container is closed"),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout lattice-di.
pub type DiResult<T> = Result<T, DiError>;
