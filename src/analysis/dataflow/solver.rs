//! Push-style worklist solver for forward analyses.
//!
//! # Algorithm
//!
//! 1. Every node starts with the initial (bottom) entry and exit state; the root
//!    entry is set to the boundary value.
//! 2. The worklist is seeded with the root.
//! 3. A popped node `n` recomputes `EXIT(n) = transfer(n, ENTRY(n))`.
//! 4. `EXIT(n)` is joined into `ENTRY(m)` for every successor `m`. `m` is pushed
//!    if its entry grew, or if it has never been evaluated.
//! 5. The solve ends when the worklist is empty.
//!
//! Only entry states are compared; exit states are derived. A node is on the
//! worklist at most once at a time. Nodes that are unreachable from the root are
//! never evaluated and keep the initial value for both states.
//!
//! The fixed point reached is the same for every [`WorklistOrder`]. The order
//! only changes how many evaluations it takes to get there.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use tracing::trace;

use crate::{
    analysis::dataflow::{
        framework::{AnalysisResults, DataFlowAnalysis},
        lattice::JoinSemiLattice,
    },
    config::WorklistOrder,
    utils::{
        graph::{algorithms, NodeId, RootedGraph},
        BitSet,
    },
};

/// Pending nodes, drained in the configured order.
enum Worklist {
    Lifo(Vec<NodeId>),
    Fifo(VecDeque<NodeId>),
    /// Min-heap on reverse-postorder rank.
    Ranked {
        heap: BinaryHeap<Reverse<(usize, NodeId)>>,
        rank: Vec<usize>,
    },
}

impl Worklist {
    fn new<G: RootedGraph>(order: WorklistOrder, graph: &G) -> Self {
        match order {
            WorklistOrder::Lifo => Worklist::Lifo(Vec::new()),
            WorklistOrder::Fifo => Worklist::Fifo(VecDeque::new()),
            WorklistOrder::ReversePostorder => {
                let mut rank = vec![usize::MAX; graph.node_count()];
                for (position, node) in algorithms::reverse_postorder(graph, graph.entry())
                    .into_iter()
                    .enumerate()
                {
                    rank[node.index()] = position;
                }
                Worklist::Ranked {
                    heap: BinaryHeap::new(),
                    rank,
                }
            }
        }
    }

    fn push(&mut self, node: NodeId) {
        match self {
            Worklist::Lifo(stack) => stack.push(node),
            Worklist::Fifo(queue) => queue.push_back(node),
            Worklist::Ranked { heap, rank } => {
                heap.push(Reverse((rank[node.index()], node)));
            }
        }
    }

    fn pop(&mut self) -> Option<NodeId> {
        match self {
            Worklist::Lifo(stack) => stack.pop(),
            Worklist::Fifo(queue) => queue.pop_front(),
            Worklist::Ranked { heap, .. } => heap.pop().map(|Reverse((_, node))| node),
        }
    }
}

/// Worklist solver for a single [`DataFlowAnalysis`].
///
/// # Examples
///
/// ```rust
/// use defscope::{
///     analysis::{ControlFlowBuilder, DataFlowAnalysis, DataFlowSolver},
///     ast::{Expr, Procedure, Stmt},
///     config::WorklistOrder,
///     utils::{graph::NodeId, BitSet},
/// };
///
/// /// Collects the nodes every path has passed through so far.
/// struct Trail(usize);
///
/// impl DataFlowAnalysis for Trail {
///     type Lattice = BitSet;
///     fn boundary(&self) -> BitSet { BitSet::new(self.0) }
///     fn initial(&self) -> BitSet { BitSet::new(self.0) }
///     fn transfer(&self, node: NodeId, entry: &BitSet) -> BitSet {
///         let mut out = entry.clone();
///         out.insert(node.index());
///         out
///     }
/// }
///
/// let proc = Procedure::nullary("f", Stmt::block([
///     Stmt::expr(Expr::opaque("a()")),
///     Stmt::expr(Expr::opaque("b()")),
/// ]));
/// let cfg = ControlFlowBuilder::new().build(&proc)?;
///
/// let solver = DataFlowSolver::new(Trail(cfg.node_count()), WorklistOrder::Fifo);
/// let results = solver.solve(&cfg);
/// let at_end: Vec<usize> = results.entry(cfg.end()).unwrap().iter().collect();
/// assert_eq!(at_end, vec![0, 1]);
/// # Ok::<(), defscope::Error>(())
/// ```
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    analysis: A,
    order: WorklistOrder,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Creates a solver that drains its worklist in `order`.
    #[must_use]
    pub fn new(analysis: A, order: WorklistOrder) -> Self {
        DataFlowSolver { analysis, order }
    }

    /// Returns the analysis being solved.
    #[must_use]
    pub fn analysis(&self) -> &A {
        &self.analysis
    }

    /// Consumes the solver and returns the analysis.
    #[must_use]
    pub fn into_analysis(self) -> A {
        self.analysis
    }

    /// Runs the analysis to its fixed point over `graph`.
    ///
    /// Successor handles outside `0..graph.node_count()` are ignored.
    pub fn solve<G: RootedGraph>(&self, graph: &G) -> AnalysisResults<A::Lattice> {
        let count = graph.node_count();
        let initial = self.analysis.initial();
        let mut entry = vec![initial.clone(); count];
        let mut exit = vec![initial; count];
        let mut iterations = 0;

        let root = graph.entry();
        if root.index() >= count {
            return AnalysisResults {
                entry,
                exit,
                iterations,
            };
        }
        entry[root.index()] = self.analysis.boundary();

        let mut worklist = Worklist::new(self.order, graph);
        let mut queued = BitSet::new(count);
        let mut evaluated = BitSet::new(count);
        worklist.push(root);
        queued.insert(root.index());

        while let Some(node) = worklist.pop() {
            let index = node.index();
            queued.remove(index);
            evaluated.insert(index);
            iterations += 1;
            trace!(node = %node, "transfer");

            exit[index] = self.analysis.transfer(node, &entry[index]);

            for succ in graph.successors(node) {
                let target = succ.index();
                if target >= count {
                    continue;
                }
                let grew = entry[target].join_in_place(&exit[index]);
                if (grew || !evaluated.contains(target)) && !queued.contains(target) {
                    if grew {
                        trace!(from = %node, to = %succ, "entry grew");
                    }
                    queued.insert(target);
                    worklist.push(succ);
                }
            }
        }

        AnalysisResults {
            entry,
            exit,
            iterations,
        }
    }
}
