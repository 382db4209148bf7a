// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dependency graph built from the host graph's nodes and wires.
//!
//! Rebuilt fresh on every arrange call; adjacency is restricted to wires
//! whose both endpoints are inside the node set being arranged, so
//! cross-references to excluded nodes never leak in.

use indexmap::{IndexMap, IndexSet};
use shadegraph_model::{Graph, NodeId};

/// Adjacency entry for a single node
#[derive(Debug, Clone, Default)]
pub struct DependencyEntry {
    /// Upstream producers wired into this node's inputs
    pub inputs: Vec<NodeId>,
    /// Downstream consumers wired from this node's outputs
    pub outputs: Vec<NodeId>,
}

/// Directed adjacency over a subset of a graph's nodes.
///
/// A pure function of the graph and the node subset; holds no references
/// into the graph and never mutates it. Parallel wires between the same
/// node pair collapse to a single adjacency entry.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    entries: IndexMap<NodeId, DependencyEntry>,
    /// (consumer, producer) -> (input port index, output port index) of
    /// the first wire between the pair; drives port-aligned placement
    port_pairs: IndexMap<(NodeId, NodeId), (usize, usize)>,
}

impl DependencyGraph {
    /// Build the dependency graph for `node_ids` within `graph`.
    ///
    /// Ids not present in the graph are dropped; wires with either
    /// endpoint outside the subset are ignored.
    pub fn build(graph: &Graph, node_ids: &[NodeId]) -> Self {
        let subset: IndexSet<NodeId> = node_ids
            .iter()
            .copied()
            .filter(|id| graph.node(*id).is_some())
            .collect();

        let mut entries: IndexMap<NodeId, DependencyEntry> = subset
            .iter()
            .map(|id| (*id, DependencyEntry::default()))
            .collect();
        let mut port_pairs = IndexMap::new();

        for wire in graph.wires() {
            if !subset.contains(&wire.start_node) || !subset.contains(&wire.end_node) {
                continue;
            }
            if let Some(entry) = entries.get_mut(&wire.end_node) {
                if !entry.inputs.contains(&wire.start_node) {
                    entry.inputs.push(wire.start_node);
                }
            }
            if let Some(entry) = entries.get_mut(&wire.start_node) {
                if !entry.outputs.contains(&wire.end_node) {
                    entry.outputs.push(wire.end_node);
                }
            }

            let key = (wire.end_node, wire.start_node);
            if !port_pairs.contains_key(&key) {
                let consumer = graph.node(wire.end_node);
                let producer = graph.node(wire.start_node);
                if let (Some(consumer), Some(producer)) = (consumer, producer) {
                    let input_index = consumer.input_index(&wire.end_port);
                    let output_index = producer.output_index(&wire.start_port);
                    if let (Some(input_index), Some(output_index)) = (input_index, output_index) {
                        port_pairs.insert(key, (input_index, output_index));
                    }
                }
            }
        }

        Self {
            entries,
            port_pairs,
        }
    }

    /// Adjacency entry for a node, if it is part of this graph
    pub fn entry(&self, node_id: NodeId) -> Option<&DependencyEntry> {
        self.entries.get(&node_id)
    }

    /// Whether a node is part of this graph
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.entries.contains_key(&node_id)
    }

    /// All node ids, in the subset's order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Port indices of the first wire from `producer` into `consumer`:
    /// (consumer input index, producer output index)
    pub fn port_pair(&self, consumer: NodeId, producer: NodeId) -> Option<(usize, usize)> {
        self.port_pairs.get(&(consumer, producer)).copied()
    }
}
