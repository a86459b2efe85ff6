//! Shared building blocks: bit sets, graph storage and traversal, DOT escaping.

pub mod bitset;
mod dot;
pub mod graph;

pub use bitset::BitSet;
pub use dot::escape_dot;
