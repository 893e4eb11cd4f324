//! Resolution depth guard.

use std::cell::Cell;

use crate::error::{DiError, DiResult};

/// Nested resolutions allowed on one thread before failing.
pub(crate) const MAX_DEPTH: usize = 256;

// Thread-local nesting depth of the resolution in progress
thread_local! {
    static RESOLUTION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Guard for the thread-local resolution depth.
///
/// Entering increments the depth, dropping decrements it, so unwinding and
/// early returns through `?` keep the counter balanced.
pub(crate) struct DepthGuard {
    _private: (),
}

impl DepthGuard {
    pub(crate) fn enter() -> DiResult<Self> {
        RESOLUTION_DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(current));
            }
            depth.set(current + 1);
            Ok(Self { _private: () })
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLUTION_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Execute a closure one resolution level deeper.
pub(crate) fn with_depth_guard<T, F>(f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = DepthGuard::enter()?;
    f()
}

#[cfg(test)]
pub(crate) fn current_depth() -> usize {
    RESOLUTION_DEPTH.with(|depth| depth.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_depth() {
        assert_eq!(current_depth(), 0);
        let result = with_depth_guard(|| {
            assert_eq!(current_depth(), 1);
            with_depth_guard(|| {
                assert_eq!(current_depth(), 2);
                Err::<(), _>(DiError::MissingArgument("x".into()))
            })
        });
        assert!(result.is_err());
        assert_eq!(current_depth(), 0);
    }

    #[test]
    fn guard_fails_past_max_depth() {
        fn recurse(level: usize) -> DiResult<usize> {
            with_depth_guard(|| recurse(level + 1))
        }

        match recurse(0) {
            Err(DiError::DepthExceeded(depth)) => assert_eq!(depth, MAX_DEPTH),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(current_depth(), 0);
    }
}
