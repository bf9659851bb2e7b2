//! Child pipes and the routing capability they delegate to.
//!
//! A fan-out controller implements [`Router`]; each consumer of the group
//! holds a [`ChildPipe`] bound to one instance id.

/// The child pipe handed to each consumer of a fan-out group.
pub mod child_pipe;
/// The routing capability every fan-out controller provides.
pub mod router;

pub use child_pipe::ChildPipe;
pub use router::Router;
