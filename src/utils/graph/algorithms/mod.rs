//! Graph algorithms over the [`Successors`](crate::utils::graph::Successors) seam.
//!
//! Only traversals are needed by the analyses in this crate:
//!
//! - [`dfs`] and [`reachable`] for reachability,
//! - [`postorder`] and [`reverse_postorder`] for worklist seeding.

mod traversal;

pub use traversal::{dfs, postorder, reachable, reverse_postorder, Dfs};
