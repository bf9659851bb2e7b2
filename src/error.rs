//! # Error Handling
//!
//! Error type shared by every pipe and combinator in the crate.
//!
//! ## Overview
//!
//! Errors fall into three groups:
//!
//! - **Construction errors**: returned by combinator constructors before any
//!   value is pulled (`NoSources`, `ZeroInstances`, `ZeroCapacity`,
//!   `InstanceOutOfRange`).
//! - **Fatal fan-out errors**: raised from a pull on a fork or demux child
//!   (`BufferOverflow`, `ClassificationOutOfRange`). Once raised, every later
//!   pull on any child of the same group returns `GroupTerminated`.
//! - **Source errors**: an upstream pipe failed (`Source`). These are passed
//!   through unchanged and do not terminate the group.
//!
//! End-of-stream is not an error: `Pipe::pull` returns `Ok(None)`.
//!
//! ## Example
//!
//! ```rust
//! use pipeweave::error::PipeError;
//!
//! let err = PipeError::BufferOverflow { combinator: "fork", capacity: 4 };
//! assert!(err.is_fatal());
//! assert_eq!(
//!   err.to_string(),
//!   "fork buffer overflow, buffer size 4 is insufficient"
//! );
//! ```

use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipeError>;

/// Error raised while building or pulling from a pipe.
#[derive(Debug, Clone, Error)]
pub enum PipeError {
  /// A combinator that needs at least one source was given none.
  #[error("{combinator} expected at least one pipe, but got nothing")]
  NoSources {
    /// Name of the combinator being constructed.
    combinator: &'static str,
  },

  /// A fan-out combinator was asked for zero children.
  #[error("{combinator} requires at least one instance")]
  ZeroInstances {
    /// Name of the combinator being constructed.
    combinator: &'static str,
  },

  /// A fan-out combinator was given a zero-sized buffer.
  #[error("{combinator} requires a buffer size greater than zero")]
  ZeroCapacity {
    /// Name of the combinator being constructed.
    combinator: &'static str,
  },

  /// A child handle was requested for an id its controller does not route.
  #[error("instance id {instance_id} is not routed by a controller with {num_instances} instances")]
  InstanceOutOfRange {
    /// The requested instance id.
    instance_id: usize,
    /// Number of instances the controller routes.
    num_instances: usize,
  },

  /// The demux classifier returned a value outside `[0, num_instances)`.
  #[error(
    "output of the classification fn should be between 0 and {}, {classification} is returned",
    .num_instances.saturating_sub(1)
  )]
  ClassificationOutOfRange {
    /// The value the classifier produced.
    classification: isize,
    /// Number of children of the demux group.
    num_instances: usize,
  },

  /// The configured buffer cannot hold the lag between consumers.
  #[error("{combinator} buffer overflow, buffer size {capacity} is insufficient")]
  BufferOverflow {
    /// Name of the combinator whose buffer overflowed.
    combinator: &'static str,
    /// The configured buffer size.
    capacity: usize,
  },

  /// A fan-out group already failed fatally; its state is no longer usable.
  #[error("{combinator} group terminated after a fatal error: {cause}")]
  GroupTerminated {
    /// Name of the combinator that failed.
    combinator: &'static str,
    /// The error that terminated the group.
    cause: Box<PipeError>,
  },

  /// The controller lock was poisoned by a panic in another thread.
  #[error("{combinator} controller lock poisoned")]
  LockPoisoned {
    /// Name of the combinator whose lock was poisoned.
    combinator: &'static str,
  },

  /// An upstream pipe failed.
  #[error("source pipe failed: {0}")]
  Source(Arc<dyn Error + Send + Sync>),
}

impl PipeError {
  /// Wraps an arbitrary upstream error.
  pub fn from_source<E>(error: E) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    Self::Source(Arc::new(error))
  }

  /// Returns `true` if this error terminates a whole fan-out group.
  #[must_use]
  pub fn is_fatal(&self) -> bool {
    matches!(
      self,
      Self::BufferOverflow { .. }
        | Self::ClassificationOutOfRange { .. }
        | Self::GroupTerminated { .. }
        | Self::LockPoisoned { .. }
    )
  }

  /// Returns `true` for errors reported by a constructor.
  #[must_use]
  pub fn is_construction(&self) -> bool {
    matches!(
      self,
      Self::NoSources { .. }
        | Self::ZeroInstances { .. }
        | Self::ZeroCapacity { .. }
        | Self::InstanceOutOfRange { .. }
    )
  }
}
