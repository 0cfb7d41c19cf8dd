//! Graph-structured state stack.

use rustc_hash::{FxHashMap, FxHashSet};
use std::{fmt, hash::Hash};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeID(u32);
impl fmt::Debug for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N#{:03}", self.0)
    }
}

/// The stacks of all explored configurations, merged into one graph.
///
/// A node is a state pushed at an input position, and an edge leads to the
/// node right below it. Nodes with the same state and position are shared, so
/// every path from a node down to the bottom stands for one stack and the
/// graph holds at most one node per state and position. Paths may be cyclic
/// when empty reductions push a state onto itself.
#[derive(Debug)]
pub struct StackGraph<S> {
    nodes: Vec<Node<S>>,
    index: FxHashMap<(S, usize), NodeID>,
    edges: FxHashSet<(NodeID, NodeID)>,
}

#[derive(Debug)]
struct Node<S> {
    state: S,
    position: usize,
    below: Vec<NodeID>,
}

impl<S> StackGraph<S>
where
    S: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            index: FxHashMap::default(),
            edges: FxHashSet::default(),
        }
    }

    /// Return the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return the node of `state` pushed at `position`, adding it if missing.
    ///
    /// The flag is `true` when the node was added by this call.
    pub fn node(&mut self, state: S, position: usize) -> (NodeID, bool) {
        if let Some(&id) = self.index.get(&(state, position)) {
            return (id, false);
        }
        let id = NodeID(self.nodes.len() as u32);
        self.nodes.push(Node {
            state,
            position,
            below: vec![],
        });
        self.index.insert((state, position), id);
        (id, true)
    }

    /// Place `upper` right above `lower`.
    ///
    /// Returns `false` if the edge was already present.
    pub fn link(&mut self, upper: NodeID, lower: NodeID) -> bool {
        if !self.edges.insert((upper, lower)) {
            return false;
        }
        self.nodes[upper.0 as usize].below.push(lower);
        true
    }

    pub fn state(&self, id: NodeID) -> S {
        self.nodes[id.0 as usize].state
    }

    pub fn position(&self, id: NodeID) -> usize {
        self.nodes[id.0 as usize].position
    }

    /// Return the nodes right below `id`, in linking order.
    pub fn below(&self, id: NodeID) -> &[NodeID] {
        &self.nodes[id.0 as usize].below
    }
}

impl<S> Default for StackGraph<S>
where
    S: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_shared() {
        let mut graph = StackGraph::<u32>::new();
        let (bottom, created) = graph.node(0, 0);
        assert!(created);
        let (same, created) = graph.node(0, 0);
        assert!(!created);
        assert_eq!(same, bottom);

        let (other, created) = graph.node(0, 1);
        assert!(created);
        assert_ne!(other, bottom);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.state(other), 0);
        assert_eq!(graph.position(other), 1);
    }

    #[test]
    fn edges_are_deduplicated() {
        let mut graph = StackGraph::<u32>::new();
        let (bottom, _) = graph.node(0, 0);
        let (left, _) = graph.node(1, 1);
        let (right, _) = graph.node(2, 1);
        let (top, _) = graph.node(3, 2);

        assert!(graph.link(left, bottom));
        assert!(graph.link(right, bottom));
        assert!(graph.link(top, left));
        assert!(graph.link(top, right));
        assert!(!graph.link(top, left));

        assert_eq!(graph.below(top), &[left, right]);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.below(bottom).is_empty());
    }

    #[test]
    fn self_loops() {
        let mut graph = StackGraph::<u32>::new();
        let (node, _) = graph.node(5, 0);
        assert!(graph.link(node, node));
        assert!(!graph.link(node, node));
        assert_eq!(graph.below(node), &[node]);
    }
}
