// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and wires.

use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortId};
use crate::wire::{Wire, WireId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A shader graph document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Wires between nodes
    wires: IndexMap<WireId, Wire>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            wires: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its wires
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        // Remove wires involving this node
        self.wires.retain(|_, w| !w.involves_node(node_id));
        // Remove the node
        self.nodes.swap_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a wire from an output port to an input port
    pub fn connect(
        &mut self,
        start_node: NodeId,
        start_port: PortId,
        end_node: NodeId,
        end_port: PortId,
    ) -> Result<WireId, WireError> {
        // Validate nodes exist
        let producer = self.nodes.get(&start_node)
            .ok_or(WireError::NodeNotFound(start_node))?;
        let consumer = self.nodes.get(&end_node)
            .ok_or(WireError::NodeNotFound(end_node))?;

        // Validate ports exist
        let out_port = producer.port(&start_port)
            .ok_or(WireError::PortNotFound(start_port))?;
        let in_port = consumer.port(&end_port)
            .ok_or(WireError::PortNotFound(end_port))?;

        // Wires always run output -> input
        if out_port.direction != PortDirection::Output
            || in_port.direction != PortDirection::Input
        {
            return Err(WireError::WrongDirection);
        }

        // Validate kind compatibility
        if !out_port.can_connect(in_port) {
            return Err(WireError::IncompatibleKinds);
        }

        // Check for an existing wire into this input (if not multi-connect)
        if !in_port.multi_connect && self.wires.values().any(|w| w.end_port == end_port) {
            return Err(WireError::InputAlreadyDriven(end_port));
        }

        // Prevent self-loops
        if start_node == end_node {
            return Err(WireError::SelfLoop);
        }

        let wire = Wire::new(start_node, start_port, end_node, end_port);
        let id = wire.id;
        self.wires.insert(id, wire);
        Ok(id)
    }

    /// Remove a wire
    pub fn disconnect(&mut self, wire_id: WireId) -> Option<Wire> {
        self.wires.swap_remove(&wire_id)
    }

    /// Get a wire by ID
    pub fn wire(&self, wire_id: WireId) -> Option<&Wire> {
        self.wires.get(&wire_id)
    }

    /// Get all wires
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    /// Get wires starting at a specific output port
    pub fn wires_from(&self, port_id: PortId) -> impl Iterator<Item = &Wire> {
        self.wires.values().filter(move |w| w.start_port == port_id)
    }

    /// Get wires ending at a specific input port
    pub fn wires_to(&self, port_id: PortId) -> impl Iterator<Item = &Wire> {
        self.wires.values().filter(move |w| w.end_port == port_id)
    }

    /// Get wires involving a node
    pub fn wires_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Wire> {
        self.wires.values().filter(move |w| w.involves_node(node_id))
    }

    /// Get the number of wires
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a wire
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Start port is not an output or end port is not an input
    #[error("Wires must run from an output port to an input port")]
    WrongDirection,

    /// Incompatible port kinds
    #[error("Incompatible port kinds")]
    IncompatibleKinds,

    /// Input port already has a wire
    #[error("Input already driven: {0:?}")]
    InputAlreadyDriven(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeCategory, NodeType};
    use crate::port::{Port, PortKind};

    fn make_node(name: &str, inputs: Vec<Port>, outputs: Vec<Port>) -> Node {
        Node::new(&NodeType {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: NodeCategory::Utility,
            description: String::new(),
            inputs,
            outputs,
            has_dropdown: false,
            has_custom_input: false,
        })
    }

    #[test]
    fn test_connect_valid() {
        let mut graph = Graph::new("Test");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Float)]);
        let b = make_node("B", vec![Port::input("In", PortKind::Float)], vec![]);
        let a_out = a.outputs[0].id;
        let b_in = b.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);

        let wire_id = graph.connect(a_id, a_out, b_id, b_in).unwrap();
        assert_eq!(graph.wire_count(), 1);
        let wire = graph.wire(wire_id).unwrap();
        assert_eq!(wire.start_node, a_id);
        assert_eq!(wire.end_node, b_id);
    }

    #[test]
    fn test_connect_rejects_incompatible_kinds() {
        let mut graph = Graph::new("Test");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Texture)]);
        let b = make_node("B", vec![Port::input("In", PortKind::Float)], vec![]);
        let a_out = a.outputs[0].id;
        let b_in = b.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);

        let err = graph.connect(a_id, a_out, b_id, b_in).unwrap_err();
        assert!(matches!(err, WireError::IncompatibleKinds));
    }

    #[test]
    fn test_connect_rejects_reversed_direction() {
        let mut graph = Graph::new("Test");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Float)]);
        let b = make_node("B", vec![Port::input("In", PortKind::Float)], vec![]);
        let a_out = a.outputs[0].id;
        let b_in = b.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);

        let err = graph.connect(b_id, b_in, a_id, a_out).unwrap_err();
        assert!(matches!(err, WireError::WrongDirection));
    }

    #[test]
    fn test_input_single_driver() {
        let mut graph = Graph::new("Test");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Float)]);
        let b = make_node("B", vec![], vec![Port::output("Out", PortKind::Float)]);
        let c = make_node("C", vec![Port::input("In", PortKind::Float)], vec![]);
        let a_out = a.outputs[0].id;
        let b_out = b.outputs[0].id;
        let c_in = c.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);
        let c_id = graph.add_node(c);

        graph.connect(a_id, a_out, c_id, c_in).unwrap();
        let err = graph.connect(b_id, b_out, c_id, c_in).unwrap_err();
        assert!(matches!(err, WireError::InputAlreadyDriven(_)));
    }

    #[test]
    fn test_sibling_instances_drive_independently() {
        // Two instances of one node type: driving the first's input must
        // not mark the same input as driven on the second
        let mut graph = Graph::new("Test");
        let consumer_type = NodeType {
            id: "blend".to_string(),
            name: "Blend".to_string(),
            category: NodeCategory::Color,
            description: String::new(),
            inputs: vec![Port::input("In", PortKind::Float)],
            outputs: vec![],
            has_dropdown: false,
            has_custom_input: false,
        };
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Float)]);
        let b = make_node("B", vec![], vec![Port::output("Out", PortKind::Float)]);
        let first = Node::new(&consumer_type);
        let second = Node::new(&consumer_type);
        let a_out = a.outputs[0].id;
        let b_out = b.outputs[0].id;
        let first_in = first.inputs[0].id;
        let second_in = second.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);
        let first_id = graph.add_node(first);
        let second_id = graph.add_node(second);

        graph.connect(a_id, a_out, first_id, first_in).unwrap();
        graph.connect(b_id, b_out, second_id, second_in).unwrap();
        assert_eq!(graph.wire_count(), 2);
        assert_eq!(graph.wires_to(first_in).count(), 1);
        assert_eq!(graph.wires_to(second_in).count(), 1);
    }

    #[test]
    fn test_remove_node_drops_wires() {
        let mut graph = Graph::new("Test");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Float)]);
        let b = make_node(
            "B",
            vec![Port::input("In", PortKind::Float)],
            vec![Port::output("Out", PortKind::Float)],
        );
        let c = make_node("C", vec![Port::input("In", PortKind::Float)], vec![]);
        let a_out = a.outputs[0].id;
        let b_in = b.inputs[0].id;
        let b_out = b.outputs[0].id;
        let c_in = c.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);
        let c_id = graph.add_node(c);

        graph.connect(a_id, a_out, b_id, b_in).unwrap();
        graph.connect(b_id, b_out, c_id, c_in).unwrap();
        assert_eq!(graph.wire_count(), 2);

        graph.remove_node(b_id);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.wire_count(), 0);
    }

    #[test]
    fn test_serialization() {
        let mut graph = Graph::new("Round Trip");
        let a = make_node("A", vec![], vec![Port::output("Out", PortKind::Color)]);
        let b = make_node("B", vec![Port::input("In", PortKind::Color)], vec![]);
        let a_out = a.outputs[0].id;
        let b_in = b.inputs[0].id;
        let a_id = graph.add_node(a);
        let b_id = graph.add_node(b);
        graph.connect(a_id, a_out, b_id, b_in).unwrap();

        let ron_str = ron::ser::to_string_pretty(&graph, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Graph = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded.name, "Round Trip");
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.wire_count(), 1);
        assert!(loaded.node(a_id).is_some());
    }
}
