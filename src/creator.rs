//! Instance creation.

use crate::args::{Args, Instance};
use crate::container::Container;
use crate::descriptors::Source;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Builds raw instances from a [`Source`] and resolved arguments.
///
/// This is the single point where constructors run. No dependency
/// resolution happens here: every argument is an already resolved value
/// supplied by the container. A custom creator can be installed with
/// [`ContainerBuilder::creator`](crate::ContainerBuilder::creator), e.g. to
/// count or time constructions.
pub trait InstanceCreator: Send + Sync {
    /// Invokes the source's constructor with `args`.
    ///
    /// Failures raised inside the constructor surface as
    /// [`DiError::Construction`] carrying `key`.
    fn create_instance(
        &self,
        container: &Container,
        key: &Key,
        source: &Source,
        args: Args,
    ) -> DiResult<Instance>;
}

/// Default creator: calls the constructor and wraps its error.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleInstanceCreator;

impl InstanceCreator for SimpleInstanceCreator {
    fn create_instance(
        &self,
        _container: &Container,
        key: &Key,
        source: &Source,
        args: Args,
    ) -> DiResult<Instance> {
        source
            .construct(&args)
            .map_err(|source| DiError::construction(key, source))
    }
}
