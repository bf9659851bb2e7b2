use crate::error::Result;
use crate::length::{known_lengths, LengthCache};
use crate::pipe::Pipe;
use tracing::{debug, trace};

/// A pipe that takes one value from each source in turn.
///
/// Sources are visited in a fixed round-robin order. A source that reports
/// end-of-stream is skipped from then on; the multiplexed pipe ends once
/// every source has ended.
///
/// # Example
///
/// ```rust
/// use pipeweave::combinators::mux::MuxPipe;
/// use pipeweave::pipe::{IterPipe, PipeExt};
///
/// let pipe = MuxPipe::new(vec![
///   IterPipe::new(vec!["a1", "a2"]),
///   IterPipe::new(vec!["b1"]),
/// ]);
/// assert_eq!(pipe.collect_all().unwrap(), vec!["a1", "b1", "a2"]);
/// ```
#[derive(Debug)]
pub struct MuxPipe<P> {
  sources: Vec<P>,
  finished: Vec<bool>,
  remaining: usize,
  next: usize,
  length: LengthCache,
}

impl<P: Pipe> MuxPipe<P> {
  /// Creates a multiplexer over `sources`. An empty set yields nothing.
  pub fn new(sources: impl IntoIterator<Item = P>) -> Self {
    let sources: Vec<P> = sources.into_iter().collect();
    debug!(sources = sources.len(), "mux created");
    Self {
      finished: vec![false; sources.len()],
      remaining: sources.len(),
      next: 0,
      length: LengthCache::new(),
      sources,
    }
  }

  /// Number of sources that have not yet ended.
  #[must_use]
  pub fn active_sources(&self) -> usize {
    self.remaining
  }
}

impl<P: Pipe> Pipe for MuxPipe<P> {
  type Item = P::Item;

  fn pull(&mut self) -> Result<Option<P::Item>> {
    while self.remaining > 0 {
      let index = self.next;
      self.next = (index + 1) % self.sources.len();
      if self.finished[index] {
        continue;
      }
      match self.sources[index].pull()? {
        Some(value) => return Ok(Some(value)),
        None => {
          self.finished[index] = true;
          self.remaining -= 1;
          trace!(source = index, remaining = self.remaining, "mux source finished");
        }
      }
    }
    Ok(None)
  }

  /// Sum of the source lengths, if every source reports one.
  fn length(&self) -> Option<usize> {
    self
      .length
      .get_or_compute(|| known_lengths(&self.sources).map(|lengths| lengths.iter().sum()))
  }
}
