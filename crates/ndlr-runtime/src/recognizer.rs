//! Nondeterministic recognizer driven by a parse table.

use crate::{
    definition::{ParseAction, ParserDef},
    stack::{NodeID, StackGraph},
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// A reduction in progress: `remaining` states are still to be popped below
/// `node`, after which `lhs` is pushed at `position`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Reduction<N> {
    lhs: N,
    remaining: usize,
    node: NodeID,
    position: usize,
}

impl<N: Clone> Reduction<N> {
    fn step(&self, lower: NodeID) -> Self {
        Self {
            lhs: self.lhs.clone(),
            remaining: self.remaining - 1,
            node: lower,
            position: self.position,
        }
    }
}

/// Decide whether `input` is accepted by the automaton described by
/// `definition`, starting from the state `start`.
///
/// Every alternative stored in a table cell is explored. The stacks of all
/// configurations are merged into a [`StackGraph`], whose nodes are pairs of
/// state and input position. Each node is expanded once, and each reduction
/// is walked once per node and position it reaches. A reduction that reaches
/// a node resumes through every edge added below that node later on. The
/// search is therefore finite on any finite table, including tables with
/// cycles of empty reductions.
pub fn recognize<TDef>(definition: &TDef, start: TDef::State, input: &[TDef::Terminal]) -> bool
where
    TDef: ParserDef,
{
    let span = tracing::trace_span!("recognize", input_len = input.len());
    let _entered = span.enter();

    let mut search = Search::new();
    search.push(start, 0, None);

    loop {
        if let Some(current) = search.pending_nodes.pop() {
            let state = search.graph.state(current);
            let position = search.graph.position(current);
            let lookahead = input.get(position);

            for action in definition.actions(state, lookahead) {
                match action {
                    ParseAction::Accept => {
                        tracing::debug!(
                            nodes = search.graph.len(),
                            edges = search.graph.edge_count(),
                            "accepted"
                        );
                        return true;
                    }

                    ParseAction::Shift(next) => {
                        if lookahead.is_none() {
                            // the end of input is never consumed.
                            continue;
                        }
                        search.push(next, position + 1, Some(current));
                    }

                    ParseAction::Reduce(lhs, n) => {
                        search.enqueue(Reduction {
                            lhs,
                            remaining: n,
                            node: current,
                            position,
                        });
                    }
                }
            }
        } else if let Some(reduction) = search.pending_reductions.pop() {
            if reduction.remaining == 0 {
                let top = search.graph.state(reduction.node);
                for next in definition.gotos(top, &reduction.lhs) {
                    search.push(next, reduction.position, Some(reduction.node));
                }
            } else {
                let below = search.graph.below(reduction.node).to_vec();
                for lower in below {
                    search.enqueue(reduction.step(lower));
                }
                search
                    .waiting
                    .entry(reduction.node)
                    .or_default()
                    .push(reduction);
            }
        } else {
            break;
        }
    }

    tracing::debug!(
        nodes = search.graph.len(),
        edges = search.graph.edge_count(),
        "rejected"
    );
    false
}

struct Search<S, N> {
    graph: StackGraph<S>,
    pending_nodes: Vec<NodeID>,
    reductions: FxHashSet<Reduction<N>>,
    pending_reductions: Vec<Reduction<N>>,
    /// Reductions that reached a node and pop further through its edges.
    waiting: FxHashMap<NodeID, Vec<Reduction<N>>>,
}

impl<S, N> Search<S, N>
where
    S: Copy + Eq + Hash + std::fmt::Debug,
    N: Clone + Eq + Hash + std::fmt::Debug,
{
    fn new() -> Self {
        Self {
            graph: StackGraph::new(),
            pending_nodes: vec![],
            reductions: FxHashSet::default(),
            pending_reductions: vec![],
            waiting: FxHashMap::default(),
        }
    }

    /// Push `state` at `position` on top of `lower`.
    fn push(&mut self, state: S, position: usize, lower: Option<NodeID>) {
        let (node, created) = self.graph.node(state, position);
        if created {
            tracing::trace!(?node, ?state, position, "new node");
            self.pending_nodes.push(node);
        }
        if let Some(lower) = lower {
            self.link(node, lower);
        }
    }

    fn link(&mut self, upper: NodeID, lower: NodeID) {
        if !self.graph.link(upper, lower) {
            return;
        }
        let resumed: Vec<_> = self
            .waiting
            .get(&upper)
            .into_iter()
            .flatten()
            .map(|reduction| reduction.step(lower))
            .collect();
        for reduction in resumed {
            self.enqueue(reduction);
        }
    }

    fn enqueue(&mut self, reduction: Reduction<N>) {
        if self.reductions.insert(reduction.clone()) {
            tracing::trace!(?reduction, "enqueue");
            self.pending_reductions.push(reduction);
        }
    }
}
