//! Node resolution: grouping terminals into electrical nodes by proximity.

use std::collections::HashMap;

use crate::circuit::{Element, NodeId, TerminalId};

/// Terminals closer than this (in scene units) connect to the same node.
pub const SNAP_DISTANCE: f64 = 10.0;

/// The result of node resolution: every terminal's node, and the node count.
///
/// Node 0 is the ground reference; it is simply the node opened for the first
/// terminal processed. Nodes exist only for the duration of one solve and are
/// rebuilt from scratch every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    assignments: HashMap<TerminalId, NodeId>,
    node_count: usize,
}

impl Topology {
    /// Number of distinct nodes (0 for an empty scene).
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The node a terminal belongs to, if it was part of the resolved set.
    pub fn node_of(&self, terminal: TerminalId) -> Option<NodeId> {
        self.assignments.get(&terminal).copied()
    }

    /// The unknown-vector index for a terminal's node voltage.
    ///
    /// Ground (and any unresolved terminal) has no unknown and maps to
    /// `None`; node k maps to index k − 1.
    pub fn unknown_index(&self, terminal: TerminalId) -> Option<usize> {
        match self.node_of(terminal) {
            Some(node) if !node.is_ground() => Some(node.0 - 1),
            _ => None,
        }
    }

    /// Iterate over all terminal → node assignments.
    pub fn assignments(&self) -> impl Iterator<Item = (TerminalId, NodeId)> + '_ {
        self.assignments.iter().map(|(t, n)| (*t, *n))
    }
}

/// Partition all element terminals into nodes.
///
/// Terminals are processed in element insertion order, p1 before p2. Each
/// unassigned terminal opens a new node and becomes its representative; every
/// later unassigned terminal within [`SNAP_DISTANCE`] of the representative
/// joins that node.
///
/// Grouping is representative-based, not transitive: a terminal joins a node
/// only when it is near the node's representative, so a chain of terminals
/// that only touch pairwise can split into several nodes. Known limitation,
/// kept deliberately; layouts that rely on chained overlaps should move the
/// terminals onto a common point instead.
pub fn resolve_nodes(elements: &[Element]) -> Topology {
    let terminals: Vec<_> = elements
        .iter()
        .flat_map(|e| [e.p1, e.p2])
        .collect();

    let mut assigned: Vec<Option<NodeId>> = vec![None; terminals.len()];
    let mut node_count = 0usize;

    for i in 0..terminals.len() {
        if assigned[i].is_some() {
            continue;
        }
        let node = NodeId(node_count);
        node_count += 1;
        assigned[i] = Some(node);

        for j in (i + 1)..terminals.len() {
            if assigned[j].is_none() && terminals[i].distance_to(&terminals[j]) <= SNAP_DISTANCE {
                assigned[j] = Some(node);
            }
        }
    }

    let assignments = terminals
        .iter()
        .zip(assigned)
        .filter_map(|(terminal, node)| node.map(|n| (terminal.id, n)))
        .collect();

    Topology {
        assignments,
        node_count,
    }
}
