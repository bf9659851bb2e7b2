use crate::error::{PipeError, Result};
use crate::length::{known_lengths, LengthCache};
use crate::pipe::Pipe;
use std::fmt;
use tracing::debug;

const COMBINATOR: &str = "zip";

/// A pipe that advances every source in lock-step.
///
/// Each pull takes one value from every source, in source order, and yields
/// them together. The pipe ends as soon as any source ends; values already
/// taken from the other sources in that final step are discarded.
///
/// If a source fails, its error is returned and the values already taken for
/// the current row are kept. The next pull resumes at the failing source.
///
/// # Example
///
/// ```rust
/// use pipeweave::combinators::zip::ZipPipe;
/// use pipeweave::pipe::{IterPipe, Pipe, PipeExt};
///
/// let pipe = ZipPipe::new(vec![IterPipe::sized(vec![1, 2]), IterPipe::sized(vec![10, 20, 30])]).unwrap();
/// assert_eq!(pipe.length(), Some(2));
/// assert_eq!(pipe.collect_all().unwrap(), vec![vec![1, 10], vec![2, 20]]);
/// ```
pub struct ZipPipe<P: Pipe> {
  sources: Vec<P>,
  row: Vec<P::Item>,
  done: bool,
  length: LengthCache,
}

impl<P: Pipe> ZipPipe<P> {
  /// Creates a zip over `sources`.
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
    debug!(sources = sources.len(), "zip created");
    Ok(Self {
      row: Vec::with_capacity(sources.len()),
      sources,
      done: false,
      length: LengthCache::new(),
    })
  }
}

impl<P: Pipe> Pipe for ZipPipe<P> {
  type Item = Vec<P::Item>;

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    if self.done {
      return Ok(None);
    }
    while self.row.len() < self.sources.len() {
      match self.sources[self.row.len()].pull()? {
        Some(value) => self.row.push(value),
        None => {
          self.done = true;
          self.row.clear();
          return Ok(None);
        }
      }
    }
    let next = Vec::with_capacity(self.sources.len());
    Ok(Some(std::mem::replace(&mut self.row, next)))
  }

  /// Shortest source length, if every source reports one. Frozen after the first call.
  fn length(&self) -> Option<usize> {
    self
      .length
      .get_or_compute(|| known_lengths(&self.sources).and_then(|lengths| lengths.into_iter().min()))
  }
}

impl<P: Pipe + fmt::Debug> fmt::Debug for ZipPipe<P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ZipPipe")
      .field("sources", &self.sources)
      .field("partial", &self.row.len())
      .field("done", &self.done)
      .finish_non_exhaustive()
  }
}

/// Zips two pipes of different item types into pairs.
///
/// Same stopping and error rules as [`ZipPipe`]: the first source is pulled
/// first, and the pipe ends as soon as either source ends.
pub struct Zip2Pipe<A: Pipe, B: Pipe> {
  left: A,
  right: B,
  pending: Option<A::Item>,
  done: bool,
  length: LengthCache,
}

/// Zips `left` and `right` into pairs.
pub fn zip2<A: Pipe, B: Pipe>(left: A, right: B) -> Zip2Pipe<A, B> {
  Zip2Pipe {
    left,
    right,
    pending: None,
    done: false,
    length: LengthCache::new(),
  }
}

impl<A: Pipe, B: Pipe> Pipe for Zip2Pipe<A, B> {
  type Item = (A::Item, B::Item);

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    if self.done {
      return Ok(None);
    }
    let left = match self.pending.take() {
      Some(left) => left,
      None => match self.left.pull()? {
        Some(left) => left,
        None => {
          self.done = true;
          return Ok(None);
        }
      },
    };
    match self.right.pull() {
      Ok(Some(right)) => Ok(Some((left, right))),
      Ok(None) => {
        self.done = true;
        Ok(None)
      }
      Err(err) => {
        self.pending = Some(left);
        Err(err)
      }
    }
  }

  fn length(&self) -> Option<usize> {
    self.length.get_or_compute(|| {
      let left = self.left.length()?;
      let right = self.right.length()?;
      Some(left.min(right))
    })
  }
}

impl<A: Pipe + fmt::Debug, B: Pipe + fmt::Debug> fmt::Debug for Zip2Pipe<A, B> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Zip2Pipe")
      .field("left", &self.left)
      .field("right", &self.right)
      .field("done", &self.done)
      .finish_non_exhaustive()
  }
}
