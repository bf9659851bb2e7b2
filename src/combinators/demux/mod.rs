//! Demux: route each value of one pipe to exactly one of several children.
//!
//! A classifier picks the target child for every upstream value. Values for
//! a child that is not currently pulling wait in that child's queue; the
//! total across all queues is capped by the configured buffer size.

/// The demux controller and its constructors.
pub mod demux_controller;

pub use demux_controller::{demux, demux_with_config, DemuxChild, DemuxController};
