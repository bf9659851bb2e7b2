//! # Combinators
//!
//! Combinators that build new pipes out of existing ones.
//!
//! ## Fan-out
//!
//! - [`fork`]: every child sees every value of the source.
//! - [`demux`]: each value goes to exactly one child, chosen by a classifier.
//!
//! Both return a `Vec` of [`ChildPipe`](child::ChildPipe)s that share one
//! controller. Children may be pulled in any order and at any pace; the
//! controller buffers values for lagging children up to a configured limit
//! and fails the whole group once that limit is exceeded.
//!
//! ## Fan-in
//!
//! - [`concat`]: each source in turn.
//! - [`mux`]: one value from each live source in round-robin order.
//! - [`zip`]: one value from every source per step, stopping at the shortest.

/// Child pipes and the routing capability they delegate to.
pub mod child;
/// Concatenation of several pipes.
pub mod concat;
/// Content-routed fan-out.
pub mod demux;
/// Broadcast fan-out.
pub mod fork;
/// Round-robin fan-in.
pub mod mux;
/// Lock-step zipping.
pub mod zip;
