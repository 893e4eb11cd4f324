//! Diagnostic observers for resolution events.
//!
//! Observers are the container's logging seam: every `instance_for` call is
//! reported to each registered [`DiObserver`]. [`LoggingObserver`] forwards
//! the events to `tracing`.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// Observer calls are made synchronously on the resolving thread, nested
/// resolutions included. Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ComponentDescriptor, DiError, DiObserver, Key};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     resolved: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.resolved.lock().unwrap().push(key.display_name().to_string());
///     }
///
///     fn construction_failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::builder().observer(recorder.clone()).build();
/// container.register("n", ComponentDescriptor::of(|_| Ok(1u8)));
/// container.instance_for("n").unwrap();
///
/// assert_eq!(*recorder.resolved.lock().unwrap(), vec!["n".to_string()]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when resolution of `key` starts.
    fn resolving(&self, key: &Key);

    /// Called when `key` resolved successfully.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving `key` failed.
    fn construction_failed(&self, key: &Key, error: &DiError);
}

/// Container for registered observers.
///
/// Has minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn construction_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.construction_failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Resolutions are logged at `debug`, failures at `warn`, all under the
/// `scoped_di` target.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::builder()
///     .observer(Arc::new(LoggingObserver::new()))
///     .build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "scoped-di".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(target: "scoped_di", prefix = %self.prefix, key = %key, "resolving component");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            target: "scoped_di",
            prefix = %self.prefix,
            key = %key,
            elapsed_us = duration.as_micros() as u64,
            "resolved component"
        );
    }

    fn construction_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(target: "scoped_di", prefix = %self.prefix, key = %key, error = %error, "resolution failed");
    }
}
