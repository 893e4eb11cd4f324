//! # scoped-di
//!
//! Key-based dependency injection with pluggable scope managers.
//!
//! ## Features
//!
//! - **Key-based registry**: components are registered under string names or
//!   typed marker keys and described by plain [`ComponentDescriptor`] records
//! - **Pluggable scopes**: transient, singleton, per-thread singleton and a
//!   race-free concurrency singleton, plus any custom [`InstanceManager`]
//! - **Factory components**: resolution can go through a [`Factory`] accessor
//! - **Method injection**: [`Injectable`] types get omitted method arguments
//!   resolved from the container that built them, and a `post_init` hook
//! - **Thread-safe**: resolution takes no container-wide lock
//!
//! ## Quick Start
//!
//! ```rust
//! use scoped_di::{ComponentDescriptor, Container, Key, Resolver, ScopeId};
//! use std::sync::Arc;
//!
//! struct DbKey;
//!
//! struct Db {
//!     dialect: &'static str,
//! }
//!
//! struct Dao {
//!     db: Arc<Db>,
//! }
//!
//! let container = Container::new();
//! container
//!     .register(
//!         Key::of::<DbKey>(),
//!         ComponentDescriptor::of(|_| Ok(Db { dialect: "pgsql" })).in_scope(ScopeId::SINGLETON),
//!     )
//!     .register(
//!         "Dao",
//!         ComponentDescriptor::of(|args| Ok(Dao { db: args.required("db")? }))
//!             .depends_on("db", Key::of::<DbKey>()),
//!     );
//!
//! let dao = container.get::<Dao>("Dao").unwrap();
//! let db = container.get::<Db>(Key::of::<DbKey>()).unwrap();
//! assert!(Arc::ptr_eq(&dao.db, &db));
//! assert_eq!(dao.db.dialect, "pgsql");
//! ```
//!
//! ## Scopes
//!
//! - **Transient** ([`ScopeId::TRANSIENT`], or any id without a manager): a
//!   new instance on every resolution
//! - **Singleton** ([`ScopeId::SINGLETON`]): one instance per container,
//!   constructed once even when threads race on first access
//! - **Singleton per thread** ([`ScopeId::THREAD`]): one instance per
//!   container and calling thread, kept until
//!   [`Container::release_thread`] drops it
//! - **Concurrency singleton** ([`ScopeId::CONCURRENT`]): the same guarantee
//!   as the singleton, backed by a once-cell slot per key
//!
//! Dependency cycles are not detected. A cycle fails with
//! [`DiError::DepthExceeded`] once resolution nests too deep, except
//! through a singleton or concurrency-singleton component, where it
//! deadlocks.
//!
//! ## Method Injection
//!
//! ```rust
//! use scoped_di::{
//!     Args, Binding, ComponentDescriptor, Container, DiResult, Injectable, MethodDescriptor,
//!     Resolver,
//! };
//! use std::sync::Arc;
//!
//! struct Clock(u64);
//!
//! struct Job {
//!     binding: Binding,
//! }
//!
//! impl Job {
//!     fn started_at(&self) -> DiResult<u64> {
//!         let args = self.inject("started_at", Args::new())?;
//!         Ok(args.required::<Clock>("clock")?.0)
//!     }
//! }
//!
//! impl Injectable for Job {
//!     fn injectable_methods() -> Vec<MethodDescriptor> {
//!         vec![MethodDescriptor::new("started_at").depends_on("clock", "Clock")]
//!     }
//!
//!     fn binding(&self) -> &Binding {
//!         &self.binding
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .register("Clock", ComponentDescriptor::of(|_| Ok(Clock(1_700_000_000))))
//!     .register("Job", ComponentDescriptor::injectable(|_| Ok(Job { binding: Binding::new() })));
//!
//! let job = container.get::<Job>("Job").unwrap();
//! assert_eq!(job.started_at().unwrap(), 1_700_000_000);
//! ```

// Module declarations
pub mod args;
pub mod binding;
pub mod container;
pub mod creator;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod managers;
pub mod observer;
pub mod scope;
pub mod scope_registry;
pub mod traits;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "graph-export")]
pub mod graph_export;

// Internal modules
mod internal;
mod registration;

// Re-exports
pub use args::{Args, Instance};
pub use binding::{resolve_method_args, Binding, Injectable};
pub use container::{Container, ContainerBuilder};
pub use creator::{InstanceCreator, SimpleInstanceCreator};
pub use descriptors::{ComponentDescriptor, ComponentInfo, Factory, MethodDescriptor, Source, POST_INIT};
pub use error::{BoxError, DiError, DiResult};
pub use key::{key_of_type, Key};
pub use managers::{
    ConcurrentSingletonManager, InstanceManager, SingletonManager, ThreadSingletonManager,
};
pub use observer::{DiObserver, LoggingObserver};
pub use scope::ScopeId;
pub use scope_registry::ScopeRegistry;
pub use traits::{Resolver, ResolverCore};

#[cfg(feature = "config")]
pub use config::{ContainerConfig, ManagerKind};

#[cfg(feature = "graph-export")]
pub use graph_export::{DependencyGraph, GraphEdge, GraphMetadata, GraphNode};
