//! Resolver traits for component resolution.

use std::any::Any;
use std::sync::Arc;

use crate::args::Instance;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Core resolver trait for object-safe component resolution.
///
/// Returns type-erased instances. Most users should use the [`Resolver`]
/// trait instead, which adds typed generic helpers on top.
pub trait ResolverCore: Send + Sync {
    /// Resolves the fully constructed, fully injected instance for `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The resolved instance wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Unknown component, construction failure, etc.
    fn resolve_any(&self, key: &Key) -> DiResult<Instance>;
}

/// High-level resolver interface with typed helpers.
///
/// Implemented for every [`ResolverCore`], so a
/// [`Container`](crate::Container) gets these methods once the trait is in
/// scope.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ComponentDescriptor, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String {
///         format!("LOG: {}", msg)
///     }
/// }
///
/// let container = Container::new();
/// container.register("port", ComponentDescriptor::of(|_| Ok(8080u16)));
/// container.register(
///     "logger",
///     ComponentDescriptor::of(|_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>)),
/// );
///
/// assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
/// let logger = container.get_trait::<dyn Logger>("logger").unwrap();
/// assert_eq!(logger.log("ready"), "LOG: ready");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves `key` and downcasts the instance to `T`.
    ///
    /// Fails with [`DiError::TypeMismatch`] when the component is of another
    /// type.
    fn get<T: Any + Send + Sync>(&self, key: impl Into<Key>) -> DiResult<Arc<T>> {
        let key = key.into();
        let any = self.resolve_any(&key)?;
        any.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            name: key.display_name().to_string(),
        })
    }

    /// Resolves `key`, returning `Ok(None)` when it is not registered.
    ///
    /// Unknown components further down the dependency chain still fail.
    fn try_get<T: Any + Send + Sync>(&self, key: impl Into<Key>) -> DiResult<Option<Arc<T>>> {
        let key = key.into();
        match self.get::<T>(&key) {
            Ok(value) => Ok(Some(value)),
            Err(DiError::UnknownComponent(missing)) if missing == key => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Resolves `key` or panics.
    ///
    /// # Panics
    ///
    /// Panics if resolution fails.
    fn get_required<T: Any + Send + Sync>(&self, key: impl Into<Key>) -> Arc<T> {
        let key = key.into();
        self.get::<T>(&key)
            .unwrap_or_else(|err| panic!("Failed to resolve {}: {}", key, err))
    }

    /// Resolves a component registered as `Arc<dyn Trait>`.
    fn get_trait<T: ?Sized + Send + Sync + 'static>(&self, key: impl Into<Key>) -> DiResult<Arc<T>> {
        let key = key.into();
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                name: key.display_name().to_string(),
            })
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
