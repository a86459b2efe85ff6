//! Arena-indexed directed graphs.
//!
//! Nodes are addressed by [`NodeId`] handles into a [`DirectedGraph`]. Algorithms
//! operate on the [`GraphBase`], [`Successors`], [`Predecessors`] and
//! [`RootedGraph`] traits so that the control-flow graph can expose them
//! directly.

pub mod algorithms;
mod directed;
mod node;
mod traits;

pub use directed::DirectedGraph;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
