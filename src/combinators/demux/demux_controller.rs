use crate::combinators::child::{ChildPipe, Router};
use crate::config::FanOutConfig;
use crate::error::{PipeError, Result};
use crate::pipe::Pipe;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, trace};

const COMBINATOR: &str = "demux";

/// A child of a demux group.
pub type DemuxChild<P, F> = ChildPipe<DemuxController<P, F>>;

/// Splits `source` into `num_instances` children, routing each value to the
/// child chosen by `classifier`.
///
/// The classifier must return a value in `[0, num_instances)`. `buffer_size`
/// bounds the total number of values held for children that have not yet
/// pulled them.
///
/// # Errors
///
/// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
///
/// # Example
///
/// ```rust
/// use pipeweave::combinators::demux::demux;
/// use pipeweave::pipe::{IterPipe, PipeExt};
///
/// let children = demux(IterPipe::new(0..6), 2, |x: &i32| (x % 2) as isize, 10).unwrap();
/// let mut children = children.into_iter();
/// let evens = children.next().unwrap().collect_all().unwrap();
/// let odds = children.next().unwrap().collect_all().unwrap();
/// assert_eq!(evens, vec![0, 2, 4]);
/// assert_eq!(odds, vec![1, 3, 5]);
/// ```
pub fn demux<P, F>(
  source: P,
  num_instances: usize,
  classifier: F,
  buffer_size: usize,
) -> Result<Vec<DemuxChild<P, F>>>
where
  P: Pipe,
  F: Fn(&P::Item) -> isize,
{
  demux_with_config(
    source,
    FanOutConfig::new(num_instances).with_buffer_size(buffer_size),
    classifier,
  )
}

/// Splits `source` according to `config`. See [`demux`].
///
/// # Errors
///
/// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
pub fn demux_with_config<P, F>(
  source: P,
  config: FanOutConfig,
  classifier: F,
) -> Result<Vec<DemuxChild<P, F>>>
where
  P: Pipe,
  F: Fn(&P::Item) -> isize,
{
  let controller = DemuxController::new(source, config, classifier)?;
  Ok(ChildPipe::group(Arc::new(controller)))
}

struct DemuxState<P: Pipe> {
  upstream: P,
  upstream_done: bool,
  child_buffers: Vec<VecDeque<P::Item>>,
  total_buffered: usize,
  failure: Option<PipeError>,
}

/// Controller behind a demux group: owns the upstream pipe, the classifier
/// and one pending queue per child.
pub struct DemuxController<P: Pipe, F> {
  name: String,
  num_instances: usize,
  buffer_size: usize,
  classifier: F,
  state: Mutex<DemuxState<P>>,
}

impl<P, F> DemuxController<P, F>
where
  P: Pipe,
  F: Fn(&P::Item) -> isize,
{
  /// Creates a controller for `config.num_instances` children.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
  pub fn new(upstream: P, config: FanOutConfig, classifier: F) -> Result<Self> {
    config.validate(COMBINATOR)?;
    let name = config.display_name(COMBINATOR);
    debug!(
      name = %name,
      num_instances = config.num_instances,
      buffer_size = config.buffer_size,
      "demux group created"
    );
    Ok(Self {
      name,
      num_instances: config.num_instances,
      buffer_size: config.buffer_size,
      classifier,
      state: Mutex::new(DemuxState {
        upstream,
        upstream_done: false,
        child_buffers: (0..config.num_instances).map(|_| VecDeque::new()).collect(),
        total_buffered: 0,
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

  /// Total number of values waiting for any child.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::LockPoisoned`] if a host thread panicked mid-pull.
  pub fn buffered_len(&self) -> Result<usize> {
    Ok(self.lock()?.total_buffered)
  }

  /// Number of values waiting for the child `instance_id`.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::InstanceOutOfRange`] for an unknown child, or
  /// [`PipeError::LockPoisoned`].
  pub fn pending(&self, instance_id: usize) -> Result<usize> {
    let state = self.lock()?;
    state
      .child_buffers
      .get(instance_id)
      .map(VecDeque::len)
      .ok_or(PipeError::InstanceOutOfRange {
        instance_id,
        num_instances: self.num_instances,
      })
  }

  fn lock(&self) -> Result<MutexGuard<'_, DemuxState<P>>> {
    self.state.lock().map_err(|_| PipeError::LockPoisoned {
      combinator: COMBINATOR,
    })
  }

  fn classify(&self, value: &P::Item) -> Result<usize> {
    let classification = (self.classifier)(value);
    match usize::try_from(classification) {
      Ok(target) if target < self.num_instances => Ok(target),
      _ => Err(PipeError::ClassificationOutOfRange {
        classification,
        num_instances: self.num_instances,
      }),
    }
  }

  fn fail(&self, state: &mut DemuxState<P>, err: PipeError) -> PipeError {
    error!(name = %self.name, error = %err, "demux group failed");
    state.child_buffers.iter_mut().for_each(VecDeque::clear);
    state.total_buffered = 0;
    state.failure = Some(err.clone());
    err
  }
}

impl<P, F> Router for DemuxController<P, F>
where
  P: Pipe,
  F: Fn(&P::Item) -> isize,
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

    if let Some(value) = state.child_buffers[instance_id].pop_front() {
      state.total_buffered -= 1;
      return Ok(Some(value));
    }

    while !state.upstream_done {
      let Some(value) = state.upstream.pull()? else {
        state.upstream_done = true;
        trace!(name = %self.name, "demux upstream exhausted");
        break;
      };
      let target = match self.classify(&value) {
        Ok(target) => target,
        Err(err) => return Err(self.fail(state, err)),
      };
      if target == instance_id {
        return Ok(Some(value));
      }
      state.child_buffers[target].push_back(value);
      state.total_buffered += 1;
      if state.total_buffered > self.buffer_size {
        let err = PipeError::BufferOverflow {
          combinator: COMBINATOR,
          capacity: self.buffer_size,
        };
        return Err(self.fail(state, err));
      }
    }
    Ok(None)
  }
}

impl<P: Pipe, F> fmt::Debug for DemuxController<P, F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DemuxController")
      .field("name", &self.name)
      .field("num_instances", &self.num_instances)
      .field("buffer_size", &self.buffer_size)
      .finish_non_exhaustive()
  }
}
