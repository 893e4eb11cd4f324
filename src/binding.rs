//! Method-level injection and the instance → container back-reference.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::args::Args;
use crate::container::{Container, ContainerInner};
use crate::descriptors::MethodDescriptor;
use crate::error::{BoxError, DiError, DiResult};

/// Non-owning back-reference from an instance to the container that built it.
///
/// Embed one in every type implementing [`Injectable`]. The container sets it
/// exactly once, when the instance is physically constructed; it is
/// read-only afterwards. Because the reference is weak, an instance never
/// keeps its container alive.
#[derive(Default)]
pub struct Binding {
    container: OnceLock<Weak<ContainerInner>>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the container. Returns `false` if a container was already bound.
    pub(crate) fn bind(&self, container: &Container) -> bool {
        self.container.set(container.downgrade()).is_ok()
    }

    pub fn is_bound(&self) -> bool {
        self.container.get().is_some()
    }

    /// The bound container, if one was bound and is still alive.
    pub fn container(&self) -> Option<Container> {
        self.container
            .get()
            .and_then(Weak::upgrade)
            .map(Container::from_inner)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("bound", &self.is_bound()).finish()
    }
}

/// A type with injectable methods.
///
/// Implementors declare their injectable methods, expose their [`Binding`],
/// and optionally override [`post_init`](Injectable::post_init). An
/// injectable method calls [`inject`](Injectable::inject) with the arguments
/// its caller supplied and reads the merged bundle.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{
///     Args, Binding, ComponentDescriptor, Container, DiResult, Injectable, MethodDescriptor, Resolver,
/// };
/// use std::sync::Arc;
///
/// struct Db { dialect: &'static str }
///
/// struct Controller { binding: Binding }
///
/// impl Controller {
///     fn dialect(&self, db: Option<Arc<Db>>) -> DiResult<&'static str> {
///         let explicit = match db {
///             Some(db) => Args::new().with_arc("db", db),
///             None => Args::new(),
///         };
///         let args = self.inject("dialect", explicit)?;
///         Ok(args.required::<Db>("db")?.dialect)
///     }
/// }
///
/// impl Injectable for Controller {
///     fn injectable_methods() -> Vec<MethodDescriptor> {
///         vec![MethodDescriptor::new("dialect").depends_on("db", "Db")]
///     }
///
///     fn binding(&self) -> &Binding {
///         &self.binding
///     }
/// }
///
/// let container = Container::new();
/// container.register("Db", ComponentDescriptor::of(|_| Ok(Db { dialect: "pgsql" })));
/// container.register(
///     "Controller",
///     ComponentDescriptor::injectable(|_| Ok(Controller { binding: Binding::new() })),
/// );
///
/// let controller = container.get::<Controller>("Controller").unwrap();
/// assert_eq!(controller.dialect(None).unwrap(), "pgsql");
/// assert_eq!(controller.dialect(Some(Arc::new(Db { dialect: "sqlite" }))).unwrap(), "sqlite");
/// ```
pub trait Injectable: Any + Send + Sync {
    /// Injectable methods declared by the type, including `post_init` if any.
    fn injectable_methods() -> Vec<MethodDescriptor>
    where
        Self: Sized;

    /// The instance's container back-reference.
    fn binding(&self) -> &Binding;

    /// Post-construction hook, run once per physical construction when
    /// [`injectable_methods`](Injectable::injectable_methods) declares
    /// [`POST_INIT`](crate::POST_INIT). `args` holds the hook's resolved
    /// dependencies.
    fn post_init(&self, args: &Args) -> Result<(), BoxError> {
        let _ = args;
        Ok(())
    }

    /// Completes the arguments of an injectable method.
    ///
    /// Every declared dependency of `method` missing from `explicit` is
    /// resolved against the bound container; explicitly supplied values are
    /// never replaced.
    fn inject(&self, method: &str, explicit: Args) -> DiResult<Args>
    where
        Self: Sized,
    {
        let methods = Self::injectable_methods();
        let descriptor = methods
            .iter()
            .find(|m| m.name() == method)
            .ok_or_else(|| DiError::UnknownMethod {
                type_name: std::any::type_name::<Self>(),
                method: method.to_string(),
            })?;
        resolve_method_args(self.binding(), descriptor, explicit)
    }
}

/// Fills the omitted parameters of `method` from the container in `binding`.
pub fn resolve_method_args(
    binding: &Binding,
    method: &MethodDescriptor,
    mut explicit: Args,
) -> DiResult<Args> {
    let mut container = None;
    for (param, key) in method.dependencies() {
        if explicit.contains(param) {
            continue;
        }
        if container.is_none() {
            container = binding.container();
        }
        let bound = container
            .as_ref()
            .ok_or_else(|| DiError::MissingContainerBinding {
                method: method.name().to_string(),
                parameter: param.clone(),
            })?;
        explicit.insert_instance(param.clone(), bound.instance_for(key)?);
    }
    Ok(explicit)
}

type ErasedRef<'a> = &'a (dyn Any + Send + Sync);

/// Type-erased view of an [`Injectable`] type's methods and hooks.
pub(crate) struct MethodTable {
    instance_type: TypeId,
    methods: Vec<MethodDescriptor>,
    bind: fn(ErasedRef<'_>, &Container) -> bool,
    post_init: fn(ErasedRef<'_>, &Args) -> Result<(), BoxError>,
}

impl MethodTable {
    pub(crate) fn of<T: Injectable>() -> Self {
        Self {
            instance_type: TypeId::of::<T>(),
            methods: T::injectable_methods(),
            bind: bind_erased::<T>,
            post_init: post_init_erased::<T>,
        }
    }

    /// Type of the instances this table binds.
    pub(crate) fn instance_type(&self) -> TypeId {
        self.instance_type
    }

    pub(crate) fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }

    pub(crate) fn post_init_method(&self) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.is_post_init())
    }

    pub(crate) fn bind(&self, instance: ErasedRef<'_>, container: &Container) -> bool {
        (self.bind)(instance, container)
    }

    pub(crate) fn run_post_init(&self, instance: ErasedRef<'_>, args: &Args) -> Result<(), BoxError> {
        (self.post_init)(instance, args)
    }
}

fn bind_erased<T: Injectable>(instance: ErasedRef<'_>, container: &Container) -> bool {
    instance
        .downcast_ref::<T>()
        .map(|typed| typed.binding().bind(container))
        .unwrap_or(false)
}

fn post_init_erased<T: Injectable>(instance: ErasedRef<'_>, args: &Args) -> Result<(), BoxError> {
    match instance.downcast_ref::<T>() {
        Some(typed) => typed.post_init(args),
        None => Ok(()),
    }
}
