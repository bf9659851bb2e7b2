//! Concat: drain several pipes one after another.

/// The concatenating pipe.
pub mod concat_pipe;

pub use concat_pipe::ConcatPipe;
