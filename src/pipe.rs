//! # Pipe Contract
//!
//! A [`Pipe`] is a lazy, single-pass producer of values. Every combinator in
//! this crate consumes pipes and is itself a pipe, so combinators compose.
//!
//! ## Pull Protocol
//!
//! - `Ok(Some(value))`: the next value.
//! - `Ok(None)`: the pipe has no more values.
//! - `Err(error)`: the pipe failed.
//!
//! ## Adapters
//!
//! - [`IterPipe`] wraps any iterator; [`IterPipe::sized`] also reports a length.
//! - [`TryIterPipe`] wraps an iterator of `Result`s and surfaces its errors.
//! - [`PipeExt::iter`] turns a pipe back into a std iterator of `Result`s.
//! - [`PipeExt::into_stream`] turns a pipe into a `futures::Stream` for async hosts.
//!
//! ## Example
//!
//! ```rust
//! use pipeweave::pipe::{IterPipe, Pipe, PipeExt};
//!
//! let mut pipe = IterPipe::sized(vec![1, 2, 3]);
//! assert_eq!(pipe.length(), Some(3));
//! assert_eq!(pipe.pull().unwrap(), Some(1));
//! assert_eq!(pipe.collect_all().unwrap(), vec![2, 3]);
//! ```

use crate::error::{PipeError, Result};
use futures::stream::{FusedStream, Stream};
use pin_project::pin_project;
use std::error::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A lazy, single-pass sequence of values.
pub trait Pipe {
  /// The type of value this pipe produces.
  type Item;

  /// Pulls the next value.
  ///
  /// Returns `Ok(None)` once the pipe is exhausted.
  ///
  /// # Errors
  ///
  /// Returns the error that stopped this pipe. Fan-out children also return
  /// the fatal errors of their group here.
  fn pull(&mut self) -> Result<Option<Self::Item>>;

  /// Total number of values this pipe produces, if known.
  ///
  /// `None` means the length cannot be determined; it does not mean zero.
  fn length(&self) -> Option<usize> {
    None
  }
}

impl<P: Pipe + ?Sized> Pipe for Box<P> {
  type Item = P::Item;

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    (**self).pull()
  }

  fn length(&self) -> Option<usize> {
    (**self).length()
  }
}

impl<P: Pipe + ?Sized> Pipe for &mut P {
  type Item = P::Item;

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    (**self).pull()
  }

  fn length(&self) -> Option<usize> {
    (**self).length()
  }
}

/// A type-erased pipe, for combining pipes of different concrete types.
pub type BoxPipe<'a, T> = Box<dyn Pipe<Item = T> + Send + 'a>;

/// A pipe backed by an iterator.
#[derive(Debug, Clone)]
pub struct IterPipe<I> {
  iter: I,
  length: Option<usize>,
}

impl<I: Iterator> IterPipe<I> {
  /// Wraps an iterator whose length is unknown.
  pub fn new<T>(iter: T) -> Self
  where
    T: IntoIterator<IntoIter = I>,
  {
    Self {
      iter: iter.into_iter(),
      length: None,
    }
  }
}

impl<I: ExactSizeIterator> IterPipe<I> {
  /// Wraps an iterator and reports its length.
  ///
  /// The reported length is fixed when the pipe is built.
  pub fn sized<T>(iter: T) -> Self
  where
    T: IntoIterator<IntoIter = I>,
  {
    let iter = iter.into_iter();
    let length = Some(iter.len());
    Self { iter, length }
  }
}

impl<I: Iterator> Pipe for IterPipe<I> {
  type Item = I::Item;

  fn pull(&mut self) -> Result<Option<Self::Item>> {
    Ok(self.iter.next())
  }

  fn length(&self) -> Option<usize> {
    self.length
  }
}

/// A pipe backed by an iterator of results.
///
/// An `Err` item is reported as [`PipeError::Source`]; the iterator is polled
/// again on the next pull.
#[derive(Debug, Clone)]
pub struct TryIterPipe<I> {
  iter: I,
}

impl<I> TryIterPipe<I> {
  /// Wraps a fallible iterator.
  pub fn new<T>(iter: T) -> Self
  where
    T: IntoIterator<IntoIter = I>,
  {
    Self {
      iter: iter.into_iter(),
    }
  }
}

impl<I, T, E> Pipe for TryIterPipe<I>
where
  I: Iterator<Item = std::result::Result<T, E>>,
  E: Error + Send + Sync + 'static,
{
  type Item = T;

  fn pull(&mut self) -> Result<Option<T>> {
    self.iter.next().transpose().map_err(PipeError::from_source)
  }
}

/// Convenience methods available on every [`Pipe`].
pub trait PipeExt: Pipe {
  /// Converts the pipe into an iterator of results.
  ///
  /// The iterator ends after the pipe is exhausted or after the first error.
  fn iter(self) -> PipeIter<Self>
  where
    Self: Sized,
  {
    PipeIter {
      pipe: self,
      done: false,
    }
  }

  /// Converts the pipe into a `futures::Stream`.
  ///
  /// Each poll performs one synchronous pull and is always ready.
  fn into_stream(self) -> PipeStream<Self>
  where
    Self: Sized,
  {
    PipeStream {
      pipe: self,
      done: false,
    }
  }

  /// Drains the pipe.
  ///
  /// # Errors
  ///
  /// Returns the first error the pipe reports.
  fn collect_all(mut self) -> Result<Vec<Self::Item>>
  where
    Self: Sized,
  {
    let mut values = Vec::new();
    while let Some(value) = self.pull()? {
      values.push(value);
    }
    Ok(values)
  }

  /// Erases the concrete pipe type.
  fn boxed<'a>(self) -> BoxPipe<'a, Self::Item>
  where
    Self: Sized + Send + 'a,
  {
    Box::new(self)
  }
}

impl<P: Pipe + ?Sized> PipeExt for P {}

fn step<P: Pipe>(pipe: &mut P, done: &mut bool) -> Option<Result<P::Item>> {
  if *done {
    return None;
  }
  match pipe.pull() {
    Ok(Some(value)) => Some(Ok(value)),
    Ok(None) => {
      *done = true;
      None
    }
    Err(e) => {
      *done = true;
      Some(Err(e))
    }
  }
}

/// Iterator returned by [`PipeExt::iter`].
#[derive(Debug)]
pub struct PipeIter<P> {
  pipe: P,
  done: bool,
}

impl<P: Pipe> Iterator for PipeIter<P> {
  type Item = Result<P::Item>;

  fn next(&mut self) -> Option<Self::Item> {
    step(&mut self.pipe, &mut self.done)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.done {
      (0, Some(0))
    } else {
      (0, None)
    }
  }
}

impl<P: Pipe> std::iter::FusedIterator for PipeIter<P> {}

/// Stream returned by [`PipeExt::into_stream`].
#[pin_project]
#[derive(Debug)]
pub struct PipeStream<P> {
  pipe: P,
  done: bool,
}

impl<P: Pipe> Stream for PipeStream<P> {
  type Item = Result<P::Item>;

  fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.project();
    Poll::Ready(step(this.pipe, this.done))
  }
}

impl<P: Pipe> FusedStream for PipeStream<P> {
  fn is_terminated(&self) -> bool {
    self.done
  }
}
