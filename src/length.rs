//! Memoized length for combinators built over several pipes.

use crate::pipe::Pipe;
use std::sync::OnceLock;

/// Length that is computed on first query and frozen afterwards.
///
/// Both outcomes are frozen: once a length is found to be unknown it stays
/// unknown for the lifetime of the combinator, even if the underlying pipes
/// could report one later.
#[derive(Debug, Default)]
pub(crate) struct LengthCache {
  cell: OnceLock<Option<usize>>,
}

impl LengthCache {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> Option<usize>) -> Option<usize> {
    *self.cell.get_or_init(compute)
  }
}

/// Lengths of every pipe, or `None` if any of them is unknown.
pub(crate) fn known_lengths<P: Pipe>(pipes: &[P]) -> Option<Vec<usize>> {
  pipes.iter().map(Pipe::length).collect()
}
