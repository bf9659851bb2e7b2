//! Zip: advance several pipes in lock-step, stopping at the shortest.

/// The zipping pipes.
pub mod zip_pipe;

pub use zip_pipe::{zip2, Zip2Pipe, ZipPipe};
