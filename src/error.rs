//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

use crate::key::Key;
use crate::scope::ScopeId;

/// Boxed error returned by component constructors and factory accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Represents the failure conditions of registration, resolution and method
/// injection. Every failure propagates synchronously to the original
/// `instance_for` or method-call site; nothing is retried internally.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{Container, DiError};
///
/// let container = Container::new();
/// match container.instance_for("Missing") {
///     Err(DiError::UnknownComponent(key)) => {
///         assert_eq!(key.display_name(), "Missing");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use scoped_di::{DiError, Key};
///
/// let missing = DiError::MissingContainerBinding {
///     method: "injected_method".to_string(),
///     parameter: "db".to_string(),
/// };
/// println!("Error: {}", missing);
/// println!("Error: {}", DiError::UnknownComponent(Key::name("Dao")));
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No descriptor registered under the key
    UnknownComponent(Key),
    /// No instance manager registered for the scope id
    ///
    /// Only returned by [`ScopeRegistry::get`](crate::ScopeRegistry::get);
    /// resolution treats an unknown scope as transient.
    UnknownScope(ScopeId),
    /// A constructor or factory accessor failed
    Construction {
        /// Key of the component being built
        key: Key,
        /// Error raised by the constructor
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// Injectable method called without a bound container for an omitted parameter
    MissingContainerBinding {
        /// Method being invoked
        method: String,
        /// Injected parameter the caller left out
        parameter: String,
    },
    /// Method is not declared injectable on the type
    UnknownMethod {
        /// Type the method was looked up on
        type_name: &'static str,
        /// Method name
        method: String,
    },
    /// Factory-flagged component did not produce a factory object
    NotAFactory(Key),
    /// Named argument absent from an argument bundle
    MissingArgument(String),
    /// Named argument present but of another type
    TypeMismatch {
        /// Type the caller asked for
        expected: &'static str,
        /// Argument name
        name: String,
    },
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// Configuration could not be parsed or applied
    Config(String),
}

impl DiError {
    /// Wraps a constructor failure with the key of the failing component.
    pub fn construction(key: &Key, source: impl Into<BoxError>) -> Self {
        let source: BoxError = source.into();
        DiError::Construction {
            key: key.clone(),
            source: Arc::from(source),
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::UnknownComponent(key) => write!(f, "Unknown component: {}", key),
            DiError::UnknownScope(scope) => write!(f, "Unknown scope: {}", scope),
            DiError::Construction { key, source } => {
                write!(f, "Construction of {} failed: {}", key, source)
            }
            DiError::MissingContainerBinding { method, parameter } => write!(
                f,
                "No container bound for injected parameter '{}' of method '{}'",
                parameter, method
            ),
            DiError::UnknownMethod { type_name, method } => {
                write!(f, "Method '{}' is not injectable on {}", method, type_name)
            }
            DiError::NotAFactory(key) => write!(f, "Component {} is not a factory", key),
            DiError::MissingArgument(name) => write!(f, "Missing argument: {}", name),
            DiError::TypeMismatch { expected, name } => {
                write!(f, "Type mismatch for argument '{}': expected {}", name, expected)
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Construction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout scoped-di.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{DiResult, DiError, Key};
///
/// fn lookup() -> DiResult<()> {
///     Err(DiError::UnknownComponent(Key::name("Dao")))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
