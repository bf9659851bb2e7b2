use crate::error::{PipeError, Result};
use crate::length::{known_lengths, LengthCache};
use crate::pipe::Pipe;
use tracing::debug;

const COMBINATOR: &str = "concat";

/// A pipe that yields every value of each source in turn.
///
/// Each source is drained completely before the next one is pulled.
///
/// # Example
///
/// ```rust
/// use pipeweave::combinators::concat::ConcatPipe;
/// use pipeweave::pipe::{IterPipe, Pipe, PipeExt};
///
/// let pipe = ConcatPipe::new(vec![IterPipe::sized(vec![1, 2]), IterPipe::sized(vec![3])]).unwrap();
/// assert_eq!(pipe.length(), Some(3));
/// assert_eq!(pipe.collect_all().unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct ConcatPipe<P> {
  sources: Vec<P>,
  current: usize,
  length: LengthCache,
}

impl<P: Pipe> ConcatPipe<P> {
  /// Creates a concatenation of `sources`, in order.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::NoSources`] if `sources` is empty.
  pub fn new(sources: impl IntoIterator<Item = P>) -> Result<Self> {
    let sources: Vec<P> = sources.into_iter().collect();
    if sources.is_empty() {
      return Err(PipeError::NoSources {
        combinator: COMBINATOR,
      });
    }
    debug!(sources = sources.len(), "concat created");
    Ok(Self {
      sources,
      current: 0,
      length: LengthCache::new(),
    })
  }

  /// Number of sources being concatenated.
  #[must_use]
  pub fn num_sources(&self) -> usize {
    self.sources.len()
  }
}

impl<P: Pipe> Pipe for ConcatPipe<P> {
  type Item = P::Item;

  fn pull(&mut self) -> Result<Option<P::Item>> {
    while let Some(source) = self.sources.get_mut(self.current) {
      if let Some(value) = source.pull()? {
        return Ok(Some(value));
      }
      self.current += 1;
    }
    Ok(None)
  }

  /// Sum of the source lengths, if every source reports one.
  ///
  /// Computed on the first call and frozen, including an unknown result.
  fn length(&self) -> Option<usize> {
    self
      .length
      .get_or_compute(|| known_lengths(&self.sources).map(|lengths| lengths.iter().sum()))
  }
}
