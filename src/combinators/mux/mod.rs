//! Mux: interleave several pipes round-robin.

/// The multiplexing pipe.
pub mod mux_pipe;

pub use mux_pipe::MuxPipe;

#[cfg(test)]
mod mux_pipe_test;
