// SPDX-License-Identifier: MIT OR Apache-2.0
//! Root election and backward tree construction for one branch.
//!
//! The "tree" is really a DAG: a node reachable through more than one
//! consumer keeps a single child list but is recorded under every parent
//! that reaches it. Layout processes each node once regardless of how
//! many parents visit it.

use crate::dependency::DependencyGraph;
use indexmap::{IndexMap, IndexSet};
use shadegraph_model::{Graph, NodeCategory, NodeId};
use std::collections::VecDeque;

/// Pick the layout root for a branch subset.
///
/// Prefers an output-category node (the material output), then an
/// output-titled one, then any node with no consumers inside the
/// subset. Returns `None` when none exists, which sends the caller to
/// the layered fallback.
pub fn find_root(graph: &Graph, dep: &DependencyGraph, subset: &[NodeId]) -> Option<NodeId> {
    for id in subset {
        if let Some(node) = graph.node(*id) {
            if node.category == NodeCategory::Output {
                return Some(*id);
            }
        }
    }
    for id in subset {
        if let Some(node) = graph.node(*id) {
            if node.name.eq_ignore_ascii_case("output")
                || node.node_type.eq_ignore_ascii_case("output")
            {
                return Some(*id);
            }
        }
    }

    let set: IndexSet<NodeId> = subset.iter().copied().collect();
    for id in subset {
        if let Some(entry) = dep.entry(*id) {
            if entry.outputs.iter().all(|o| !set.contains(o)) {
                return Some(*id);
            }
        }
    }
    None
}

/// Backward traversal tree rooted at a branch's sink node.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// The designated sink the traversal started from
    pub root: NodeId,
    children: IndexMap<NodeId, Vec<NodeId>>,
    parents: IndexMap<NodeId, Vec<NodeId>>,
    depths: IndexMap<NodeId, usize>,
}

impl LayoutTree {
    /// Traverse backward from `root` along inputs, restricted to
    /// `subset`, and assign depths.
    ///
    /// A node's child list is recorded the first time the node is
    /// reached and never rewritten; later parents only add an entry to
    /// the parent multimap. Depths use max-propagation BFS: a child sits
    /// at the depth its farthest-from-root parent demands, so no node is
    /// ever laid out closer to the root than any of its consumers.
    pub fn build(dep: &DependencyGraph, root: NodeId, subset: &[NodeId]) -> Self {
        let set: IndexSet<NodeId> = subset.iter().copied().collect();

        let mut children: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        let mut parents: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(id) = queue.pop_front() {
            if children.contains_key(&id) {
                continue;
            }
            let kids: Vec<NodeId> = dep
                .entry(id)
                .map(|e| {
                    e.inputs
                        .iter()
                        .copied()
                        .filter(|c| set.contains(c))
                        .collect()
                })
                .unwrap_or_default();

            for child in &kids {
                let entry = parents.entry(*child).or_default();
                entry.push(id);
                if entry.len() > 1 {
                    tracing::debug!(
                        node = ?child,
                        parents = entry.len(),
                        "multi-tree node reached via multiple parents"
                    );
                }
                queue.push_back(*child);
            }
            children.insert(id, kids);
        }

        // Depth BFS with max-propagation. Raising a depth past the
        // subgraph's node count is impossible on a DAG, so the cap only
        // bites on cycles, where it keeps every depth finite.
        let cap = children.len();
        let mut depths: IndexMap<NodeId, usize> = IndexMap::new();
        depths.insert(root, 0);
        let mut queue = VecDeque::new();
        queue.push_back(root);
        while let Some(id) = queue.pop_front() {
            let next = depths.get(&id).copied().unwrap_or(0) + 1;
            if next > cap {
                continue;
            }
            let kids = children.get(&id).cloned().unwrap_or_default();
            for child in kids {
                let current = depths.get(&child).copied();
                if current.map_or(true, |c| next > c) {
                    depths.insert(child, next);
                    queue.push_back(child);
                }
            }
        }

        Self {
            root,
            children,
            parents,
            depths,
        }
    }

    /// Child (graph-input) list of a node
    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.children.get(&node_id).map_or(&[], Vec::as_slice)
    }

    /// Every parent that reached a node during traversal
    pub fn parents(&self, node_id: NodeId) -> &[NodeId] {
        self.parents.get(&node_id).map_or(&[], Vec::as_slice)
    }

    /// Distance from the root, max-propagated over all root-ward paths
    pub fn depth(&self, node_id: NodeId) -> Option<usize> {
        self.depths.get(&node_id).copied()
    }

    /// Number of nodes reached from the root
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the tree is empty (never true after `build`)
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Node ids in descending depth order (leaves first), stable within
    /// a depth
    pub fn nodes_by_depth_desc(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.children.keys().copied().collect();
        nodes.sort_by_key(|id| std::cmp::Reverse(self.depths.get(id).copied().unwrap_or(0)));
        nodes
    }

    /// Count edges where a child does not sit strictly deeper than its
    /// parent, warning for each.
    ///
    /// Diagnostic only; on acyclic input the max-propagation rule makes
    /// this zero by construction.
    pub fn verify_depth_ordering(&self) -> usize {
        let mut violations = 0;
        for (parent, kids) in &self.children {
            let parent_depth = self.depths.get(parent).copied().unwrap_or(0);
            for child in kids {
                let child_depth = self.depths.get(child).copied().unwrap_or(0);
                if child_depth <= parent_depth {
                    violations += 1;
                    tracing::warn!(
                        parent = ?parent,
                        child = ?child,
                        parent_depth,
                        child_depth,
                        "depth ordering violation: input not deeper than its consumer"
                    );
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadegraph_model::{Node, NodeCategory, NodeType, Port, PortKind};

    fn make_node(name: &str, inputs: usize, outputs: usize) -> Node {
        Node::new(&NodeType {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: NodeCategory::Math,
            description: String::new(),
            inputs: (0..inputs)
                .map(|i| Port::input(format!("In{i}"), PortKind::Any))
                .collect(),
            outputs: (0..outputs)
                .map(|i| Port::output(format!("Out{i}"), PortKind::Any))
                .collect(),
            has_dropdown: false,
            has_custom_input: false,
        })
    }

    fn connect(graph: &mut Graph, from: NodeId, to: NodeId, in_index: usize) {
        let start_port = graph.node(from).unwrap().outputs[0].id;
        let end_port = graph.node(to).unwrap().inputs[in_index].id;
        graph.connect(from, start_port, to, end_port).unwrap();
    }

    fn make_output_node(name: &str, inputs: usize) -> Node {
        Node::new(&NodeType {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: NodeCategory::Output,
            description: String::new(),
            inputs: (0..inputs)
                .map(|i| Port::input(format!("In{i}"), PortKind::Any))
                .collect(),
            outputs: vec![],
            has_dropdown: false,
            has_custom_input: false,
        })
    }

    #[test]
    fn test_root_prefers_output_category() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        let result = graph.add_node(make_output_node("Material Result", 1));
        connect(&mut graph, a, result, 0);

        let dep = DependencyGraph::build(&graph, &[a, result]);
        // Category decides; the node's title never mentions "output"
        assert_eq!(find_root(&graph, &dep, &[a, result]), Some(result));
    }

    #[test]
    fn test_substring_titles_are_not_elected() {
        // "Output Scale" merely mentions output; the actual sink wins
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        let scale = graph.add_node(make_node("Output Scale", 1, 1));
        let sink = graph.add_node(make_node("Result", 1, 0));
        connect(&mut graph, a, scale, 0);
        connect(&mut graph, scale, sink, 0);

        let dep = DependencyGraph::build(&graph, &[a, scale, sink]);
        assert_eq!(find_root(&graph, &dep, &[a, scale, sink]), Some(sink));
    }

    #[test]
    fn test_root_prefers_output_node() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        // An output-titled node that is not even a sink still wins
        let out = graph.add_node(make_node("Output", 1, 1));
        connect(&mut graph, a, out, 0);

        let dep = DependencyGraph::build(&graph, &[a, out]);
        assert_eq!(find_root(&graph, &dep, &[a, out]), Some(out));
    }

    #[test]
    fn test_root_falls_back_to_sink() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        let b = graph.add_node(make_node("B", 1, 0));
        connect(&mut graph, a, b, 0);

        let dep = DependencyGraph::build(&graph, &[a, b]);
        assert_eq!(find_root(&graph, &dep, &[a, b]), Some(b));
    }

    #[test]
    fn test_pure_cycle_has_no_root() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 1, 1));
        let b = graph.add_node(make_node("B", 1, 1));
        let c = graph.add_node(make_node("C", 1, 1));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, b, c, 0);
        connect(&mut graph, c, a, 0);

        let dep = DependencyGraph::build(&graph, &[a, b, c]);
        assert_eq!(find_root(&graph, &dep, &[a, b, c]), None);
    }

    #[test]
    fn test_chain_tree_and_depths() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        let b = graph.add_node(make_node("B", 1, 1));
        let c = graph.add_node(make_node("Output", 1, 0));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, b, c, 0);

        let subset = [a, b, c];
        let dep = DependencyGraph::build(&graph, &subset);
        let root = find_root(&graph, &dep, &subset).unwrap();
        assert_eq!(root, c);

        let tree = LayoutTree::build(&dep, root, &subset);
        assert_eq!(tree.children(c), &[b]);
        assert_eq!(tree.children(b), &[a]);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.depth(c), Some(0));
        assert_eq!(tree.depth(b), Some(1));
        assert_eq!(tree.depth(a), Some(2));
        assert_eq!(tree.verify_depth_ordering(), 0);
    }

    #[test]
    fn test_diamond_records_multiple_parents() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 2));
        let b = graph.add_node(make_node("B", 1, 1));
        let c = graph.add_node(make_node("C", 1, 1));
        let d = graph.add_node(make_node("Output", 2, 0));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, a, c, 0);
        connect(&mut graph, b, d, 0);
        connect(&mut graph, c, d, 1);

        let subset = [a, b, c, d];
        let dep = DependencyGraph::build(&graph, &subset);
        let tree = LayoutTree::build(&dep, d, &subset);

        // A keeps one child list but is recorded under both parents
        assert!(tree.children(a).is_empty());
        let parents: IndexSet<NodeId> = tree.parents(a).iter().copied().collect();
        assert_eq!(parents, IndexSet::from([b, c]));
        assert_eq!(tree.depth(d), Some(0));
        assert_eq!(tree.depth(b), Some(1));
        assert_eq!(tree.depth(c), Some(1));
        assert_eq!(tree.depth(a), Some(2));
        assert_eq!(tree.verify_depth_ordering(), 0);
    }

    #[test]
    fn test_depth_uses_farthest_path() {
        // C consumes both A (directly) and B (which consumes A); A must
        // end up at depth 2, the farthest path, not the direct depth 1
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 2));
        let b = graph.add_node(make_node("B", 1, 1));
        let c = graph.add_node(make_node("C", 2, 0));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, a, c, 0);
        connect(&mut graph, b, c, 1);

        let subset = [a, b, c];
        let dep = DependencyGraph::build(&graph, &subset);
        let tree = LayoutTree::build(&dep, c, &subset);
        assert_eq!(tree.depth(a), Some(2));
        assert_eq!(tree.verify_depth_ordering(), 0);
    }

    #[test]
    fn test_cycle_depths_stay_finite() {
        // Output fed by a two-node cycle; depth propagation must stop
        // at the node-count cap instead of looping
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 1, 2));
        let b = graph.add_node(make_node("B", 1, 1));
        let out = graph.add_node(make_node("Output", 1, 0));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, b, a, 0);
        connect(&mut graph, a, out, 0);

        let subset = [a, b, out];
        let dep = DependencyGraph::build(&graph, &subset);
        let tree = LayoutTree::build(&dep, out, &subset);
        for id in subset {
            assert!(tree.depth(id).is_some());
            assert!(tree.depth(id).unwrap() <= subset.len());
        }
    }

    #[test]
    fn test_depth_descending_order_is_leaves_first() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node(make_node("A", 0, 1));
        let b = graph.add_node(make_node("B", 1, 1));
        let c = graph.add_node(make_node("Output", 1, 0));
        connect(&mut graph, a, b, 0);
        connect(&mut graph, b, c, 0);

        let subset = [a, b, c];
        let dep = DependencyGraph::build(&graph, &subset);
        let tree = LayoutTree::build(&dep, c, &subset);
        assert_eq!(tree.nodes_by_depth_desc(), vec![a, b, c]);
    }
}
