//! Named argument bundles passed to constructors and injectable methods.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Type-erased shared instance produced by the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Named arguments, keyed by parameter name.
///
/// The container fills an `Args` with resolved dependencies (one entry per
/// dependency alias) and hands it to the constructor. Parameters the bundle
/// does not contain are left to the constructor's own defaults, which
/// [`optional`](Args::optional) expresses directly.
///
/// # Examples
///
/// ```rust
/// use scoped_di::Args;
///
/// let args = Args::new().with("port", 8080u16);
///
/// assert_eq!(*args.required::<u16>("port").unwrap(), 8080);
/// let host = args
///     .optional::<String>("host")
///     .unwrap()
///     .map(|h| h.as_str().to_owned())
///     .unwrap_or_else(|| "localhost".to_string());
/// assert_eq!(host, "localhost");
/// ```
#[derive(Clone, Default)]
pub struct Args {
    values: BTreeMap<String, Instance>,
}

impl Args {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an owned value under `name`.
    pub fn with<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
        self.with_arc(name, Arc::new(value))
    }

    /// Adds a shared value under `name`.
    pub fn with_arc<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: Arc<T>) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Inserts an already type-erased instance, replacing any previous value.
    pub fn insert_instance(&mut self, name: impl Into<String>, value: Instance) {
        self.values.insert(name.into(), value);
    }

    /// Returns `true` if an argument named `name` was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The raw instance supplied under `name`.
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    /// Gets an optional argument.
    ///
    /// Returns `Ok(None)` when the argument was not supplied and
    /// [`DiError::TypeMismatch`] when it was supplied with another type.
    pub fn optional<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Option<Arc<T>>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(value) => value
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DiError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                    name: name.to_string(),
                }),
        }
    }

    /// Gets a required argument, failing with [`DiError::MissingArgument`]
    /// when it was not supplied.
    pub fn required<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
        self.optional(name)?
            .ok_or_else(|| DiError::MissingArgument(name.to_string()))
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
