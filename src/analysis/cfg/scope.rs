//! Lexical scopes recorded while lowering.
//!
//! Scopes form a tree of frames. A frame only grows while it is the innermost
//! open scope, so a position inside it is fully described by the frame and the
//! number of bindings it held at that moment. Every node keeps the position it
//! was lowered at, which is what lets a *read* of a name be resolved after the
//! graph is built.

use std::collections::HashMap;

use crate::{analysis::cfg::VariableId, utils::graph::NodeId};

/// A position in the scope tree: a frame and how many of its bindings are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopePoint {
    frame: usize,
    len: usize,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    parent: Option<ScopePoint>,
    bindings: Vec<(String, VariableId)>,
}

/// Scope tree of one procedure, plus the position of every node in it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scopes {
    frames: Vec<Frame>,
    free: HashMap<String, VariableId>,
    /// Position of each node, indexed by node.
    at_node: Vec<ScopePoint>,
}

impl Scopes {
    /// Creates the tree with its root (parameter) frame and returns a position
    /// at the start of it.
    pub(crate) fn new() -> (Self, ScopePoint) {
        let scopes = Scopes {
            frames: vec![Frame::default()],
            ..Scopes::default()
        };
        (scopes, ScopePoint { frame: 0, len: 0 })
    }

    /// Opens a child frame below `parent`.
    pub(crate) fn open(&mut self, parent: ScopePoint) -> ScopePoint {
        self.frames.push(Frame {
            parent: Some(parent),
            bindings: Vec::new(),
        });
        ScopePoint {
            frame: self.frames.len() - 1,
            len: 0,
        }
    }

    /// Binds `name` in the frame of `point` and advances `point` past it.
    ///
    /// `point` must be the innermost open position.
    pub(crate) fn declare(&mut self, point: &mut ScopePoint, name: &str, id: VariableId) {
        if let Some(frame) = self.frames.get_mut(point.frame) {
            frame.bindings.push((name.to_string(), id));
            point.len = frame.bindings.len();
        }
    }

    /// Innermost binding of `name` visible at `point`. Free variables are not
    /// considered.
    pub(crate) fn lookup(&self, point: ScopePoint, name: &str) -> Option<VariableId> {
        let mut cursor = Some(point);
        while let Some(ScopePoint { frame, len }) = cursor {
            let frame = self.frames.get(frame)?;
            let visible = &frame.bindings[..len.min(frame.bindings.len())];
            if let Some((_, id)) = visible.iter().rev().find(|(bound, _)| bound == name) {
                return Some(*id);
            }
            cursor = frame.parent;
        }
        None
    }

    pub(crate) fn free(&self, name: &str) -> Option<VariableId> {
        self.free.get(name).copied()
    }

    pub(crate) fn insert_free(&mut self, name: &str, id: VariableId) {
        self.free.insert(name.to_string(), id);
    }

    /// Records the position of the next allocated node.
    pub(crate) fn record(&mut self, point: ScopePoint) {
        self.at_node.push(point);
    }

    /// The variable a read of `name` at `node` refers to: the innermost
    /// declaration visible there, else the procedure's free variable of that name.
    pub(crate) fn resolve(&self, node: NodeId, name: &str) -> Option<VariableId> {
        let point = *self.at_node.get(node.index())?;
        self.lookup(point, name).or_else(|| self.free(name))
    }
}
