//! Fork: broadcast one pipe to several independently paced children.
//!
//! Every child sees every upstream value, in upstream order. The upstream is
//! pulled once per value; values are buffered until the slowest child has
//! received them. If the leading child gets more than `buffer_size` values
//! ahead of the slowest one, the group fails with
//! [`PipeError::BufferOverflow`](crate::error::PipeError::BufferOverflow).

/// The fork controller and its constructors.
pub mod fork_controller;

pub use fork_controller::{fork, fork_with_config, ForkChild, ForkController};

#[cfg(test)]
mod fork_controller_test;
