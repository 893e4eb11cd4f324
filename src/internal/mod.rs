//! Internal implementation details.

pub(crate) mod depth;
pub(crate) mod sync;

pub(crate) use depth::with_depth_guard;
pub(crate) use sync::{Map, Mutex, RwLock};
