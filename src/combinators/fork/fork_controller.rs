use crate::combinators::child::{ChildPipe, Router};
use crate::config::FanOutConfig;
use crate::error::{PipeError, Result};
use crate::pipe::Pipe;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, trace};

const COMBINATOR: &str = "fork";

/// A child of a fork group.
pub type ForkChild<P> = ChildPipe<ForkController<P>>;

/// Splits `source` into `num_instances` children that each see every value.
///
/// `buffer_size` bounds how many values the leading child may read ahead of
/// the slowest child.
///
/// # Errors
///
/// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
///
/// # Example
///
/// ```rust
/// use pipeweave::combinators::fork::fork;
/// use pipeweave::pipe::{IterPipe, Pipe};
///
/// let mut children = fork(IterPipe::new(1..=3), 2, 10).unwrap();
/// assert_eq!(children[0].pull().unwrap(), Some(1));
/// assert_eq!(children[0].pull().unwrap(), Some(2));
/// assert_eq!(children[1].pull().unwrap(), Some(1));
/// ```
pub fn fork<P>(source: P, num_instances: usize, buffer_size: usize) -> Result<Vec<ForkChild<P>>>
where
  P: Pipe,
  P::Item: Clone,
{
  fork_with_config(
    source,
    FanOutConfig::new(num_instances).with_buffer_size(buffer_size),
  )
}

/// Splits `source` according to `config`. See [`fork`].
///
/// # Errors
///
/// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
pub fn fork_with_config<P>(source: P, config: FanOutConfig) -> Result<Vec<ForkChild<P>>>
where
  P: Pipe,
  P::Item: Clone,
{
  let controller = ForkController::new(source, config)?;
  Ok(ChildPipe::group(Arc::new(controller)))
}

/// Shared state of a fork group.
///
/// Cursors count the values each child has already received. The buffer
/// holds the values with index in `[slowest, leading)`: everything pulled
/// from upstream that some child has not yet received.
struct ForkState<P: Pipe> {
  upstream: P,
  buffer: VecDeque<P::Item>,
  child_cursors: Vec<usize>,
  slowest: usize,
  leading: usize,
  end: Option<usize>,
  failure: Option<PipeError>,
}

impl<P: Pipe> ForkState<P> {
  // Called after the child that was at `previous` moved forward by one.
  fn release(&mut self, previous: usize) {
    if previous != self.slowest {
      return;
    }
    let new_min = self
      .child_cursors
      .iter()
      .copied()
      .min()
      .unwrap_or(self.leading);
    if new_min > self.slowest {
      let evicted = new_min - self.slowest;
      self.buffer.drain(..evicted);
      self.slowest = new_min;
      trace!(evicted, slowest = new_min, "fork buffer released");
    }
  }
}

/// Controller behind a fork group: owns the upstream pipe and the shared buffer.
pub struct ForkController<P: Pipe> {
  name: String,
  num_instances: usize,
  buffer_size: usize,
  state: Mutex<ForkState<P>>,
}

impl<P> ForkController<P>
where
  P: Pipe,
  P::Item: Clone,
{
  /// Creates a controller for `config.num_instances` children.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
  pub fn new(upstream: P, config: FanOutConfig) -> Result<Self> {
    config.validate(COMBINATOR)?;
    let name = config.display_name(COMBINATOR);
    debug!(
      name = %name,
      num_instances = config.num_instances,
      buffer_size = config.buffer_size,
      "fork group created"
    );
    Ok(Self {
      name,
      num_instances: config.num_instances,
      buffer_size: config.buffer_size,
      state: Mutex::new(ForkState {
        upstream,
        buffer: VecDeque::new(),
        child_cursors: vec![0; config.num_instances],
        slowest: 0,
        leading: 0,
        end: None,
        failure: None,
      }),
    })
  }

  /// Name used in log output.
  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The configured buffer size.
  #[must_use]
  pub fn buffer_size(&self) -> usize {
    self.buffer_size
  }

  /// Number of values currently held for lagging children.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::LockPoisoned`] if a host thread panicked mid-pull.
  pub fn buffered_len(&self) -> Result<usize> {
    Ok(self.lock()?.buffer.len())
  }

  fn lock(&self) -> Result<MutexGuard<'_, ForkState<P>>> {
    self.state.lock().map_err(|_| PipeError::LockPoisoned {
      combinator: COMBINATOR,
    })
  }

  fn fail(&self, state: &mut ForkState<P>, err: PipeError) -> PipeError {
    error!(name = %self.name, error = %err, "fork group failed");
    state.buffer.clear();
    state.failure = Some(err.clone());
    err
  }
}

impl<P> Router for ForkController<P>
where
  P: Pipe,
  P::Item: Clone,
{
  type Item = P::Item;

  fn num_instances(&self) -> usize {
    self.num_instances
  }

  fn pull_for(&self, instance_id: usize) -> Result<Option<P::Item>> {
    if instance_id >= self.num_instances {
      return Err(PipeError::InstanceOutOfRange {
        instance_id,
        num_instances: self.num_instances,
      });
    }
    let mut guard = self.lock()?;
    let state = &mut *guard;
    if let Some(cause) = &state.failure {
      return Err(PipeError::GroupTerminated {
        combinator: COMBINATOR,
        cause: Box::new(cause.clone()),
      });
    }

    let cursor = state.child_cursors[instance_id];
    if state.end.is_some_and(|end| cursor >= end) {
      return Ok(None);
    }

    if cursor < state.leading {
      let value = state.buffer[cursor - state.slowest].clone();
      state.child_cursors[instance_id] += 1;
      state.release(cursor);
      return Ok(Some(value));
    }

    // This child is at the leading edge and needs a fresh upstream value.
    let Some(value) = state.upstream.pull()? else {
      state.end = Some(state.leading);
      trace!(name = %self.name, end = state.leading, "fork upstream exhausted");
      return Ok(None);
    };
    state.leading += 1;
    state.child_cursors[instance_id] += 1;
    state.buffer.push_back(value.clone());
    state.release(cursor);

    if state.leading - state.slowest > self.buffer_size {
      let err = PipeError::BufferOverflow {
        combinator: COMBINATOR,
        capacity: self.buffer_size,
      };
      return Err(self.fail(state, err));
    }
    Ok(Some(value))
  }

  fn length_for(&self, _instance_id: usize) -> Option<usize> {
    self.lock().ok()?.upstream.length()
  }
}

impl<P: Pipe> fmt::Debug for ForkController<P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ForkController")
      .field("name", &self.name)
      .field("num_instances", &self.num_instances)
      .field("buffer_size", &self.buffer_size)
      .finish_non_exhaustive()
  }
}
