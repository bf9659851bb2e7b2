use crate::error::Result;

/// A controller that serves values to a fixed group of child pipes.
///
/// Fork and demux controllers implement this trait; [`ChildPipe`] depends
/// only on it. Implementations take `&self` because the controller is shared
/// by every child of its group and guards its own state.
///
/// [`ChildPipe`]: super::child_pipe::ChildPipe
pub trait Router {
  /// The type of value routed to children.
  type Item;

  /// Number of children this controller serves.
  fn num_instances(&self) -> usize;

  /// Pulls the next value for the child `instance_id`.
  ///
  /// Returns `Ok(None)` once that child's sequence is exhausted.
  ///
  /// # Errors
  ///
  /// Returns upstream errors and the fatal errors of the group, or
  /// [`PipeError::InstanceOutOfRange`](crate::error::PipeError::InstanceOutOfRange)
  /// for an id outside `0..num_instances()`.
  fn pull_for(&self, instance_id: usize) -> Result<Option<Self::Item>>;

  /// Total number of values the child `instance_id` will receive, if known.
  fn length_for(&self, _instance_id: usize) -> Option<usize> {
    None
  }
}
