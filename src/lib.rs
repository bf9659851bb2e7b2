//! # PipeWeave
//!
//! Lazy, pull-based combinators for splitting and merging pipes.
//!
//! A [`Pipe`](pipe::Pipe) produces values one pull at a time. The combinators
//! in [`combinators`] turn one pipe into several, or several into one:
//!
//! - **Fork**: broadcast one pipe to N independently paced children.
//! - **Demux**: route each value of one pipe to exactly one of N children.
//! - **Concat**: drain pipes one after another.
//! - **Mux**: interleave pipes round-robin.
//! - **Zip**: advance pipes in lock-step, stopping at the shortest.
//!
//! Fan-out children share a controller that pulls the upstream exactly once
//! per value and buffers values for lagging children. The buffer is bounded:
//! exceeding it fails the whole group instead of growing without limit.
//!
//! ## Quick Start
//!
//! ```rust
//! use pipeweave::combinators::fork::fork;
//! use pipeweave::pipe::{IterPipe, PipeExt};
//!
//! # fn main() -> Result<(), pipeweave::error::PipeError> {
//! let children = fork(IterPipe::new(vec![1, 2, 3]), 2, 16)?;
//! for child in children {
//!   assert_eq!(child.collect_all()?, vec![1, 2, 3]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Pulls are synchronous and run to completion. Each fan-out controller
//! guards its state with a mutex, so children may be driven from different
//! threads or async tasks (see [`PipeExt::into_stream`](pipe::PipeExt::into_stream)).

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Combinators that split and merge pipes.
pub mod combinators;
/// Fan-out configuration.
pub mod config;
/// Error type and result alias.
pub mod error;
/// The pull contract and pipe adapters.
pub mod pipe;

mod length;

pub use combinators::child::{ChildPipe, Router};
pub use combinators::concat::ConcatPipe;
pub use combinators::demux::{demux, demux_with_config, DemuxChild, DemuxController};
pub use combinators::fork::{fork, fork_with_config, ForkChild, ForkController};
pub use combinators::mux::MuxPipe;
pub use combinators::zip::{zip2, Zip2Pipe, ZipPipe};
pub use config::FanOutConfig;
pub use error::{PipeError, Result};
pub use pipe::{BoxPipe, IterPipe, Pipe, PipeExt, TryIterPipe};
