use super::router::Router;
use crate::error::{PipeError, Result};
use crate::pipe::Pipe;
use std::fmt;
use std::sync::Arc;

/// One consumer of a fan-out group.
///
/// A child holds no buffer of its own: every pull is forwarded to the shared
/// controller together with the child's instance id. The controller lives as
/// long as its longest-lived child.
pub struct ChildPipe<R: ?Sized> {
  router: Arc<R>,
  instance_id: usize,
}

impl<R: Router + ?Sized> ChildPipe<R> {
  /// Binds `instance_id` to a shared controller.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::InstanceOutOfRange`] if the controller does not
  /// serve `instance_id`.
  pub fn new(router: Arc<R>, instance_id: usize) -> Result<Self> {
    let num_instances = router.num_instances();
    if instance_id >= num_instances {
      return Err(PipeError::InstanceOutOfRange {
        instance_id,
        num_instances,
      });
    }
    Ok(Self {
      router,
      instance_id,
    })
  }

  /// Creates one child per instance id served by `router`, in id order.
  pub fn group(router: Arc<R>) -> Vec<Self> {
    (0..router.num_instances())
      .map(|instance_id| Self {
        router: Arc::clone(&router),
        instance_id,
      })
      .collect()
  }

  /// This child's instance id.
  #[must_use]
  pub fn instance_id(&self) -> usize {
    self.instance_id
  }

  /// Number of children in this child's group.
  #[must_use]
  pub fn num_instances(&self) -> usize {
    self.router.num_instances()
  }

  /// The controller shared by this child's group.
  #[must_use]
  pub fn controller(&self) -> &R {
    &self.router
  }
}

impl<R: Router + ?Sized> Pipe for ChildPipe<R> {
  type Item = R::Item;

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    self.router.pull_for(self.instance_id)
  }

  fn length(&self) -> Option<usize> {
    self.router.length_for(self.instance_id)
  }
}

impl<R: ?Sized> fmt::Debug for ChildPipe<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ChildPipe")
      .field("instance_id", &self.instance_id)
      .finish_non_exhaustive()
  }
}
