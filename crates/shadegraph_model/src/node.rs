// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::port::{Port, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Input nodes (constants, coordinates, parameters)
    Input,
    /// Output nodes (final material result)
    Output,
    /// Math operations
    Math,
    /// Vector composition and manipulation
    Vector,
    /// Color operations
    Color,
    /// Texture sampling
    Texture,
    /// Utility nodes
    Utility,
    /// Custom/user-defined
    Custom,
}

/// Node type definition
///
/// A declarative shape: which ports a node of this type carries and which
/// inline widgets it renders. Shader code generation is out of scope here;
/// types describe geometry and connectivity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input ports
    pub inputs: Vec<Port>,
    /// Default output ports
    pub outputs: Vec<Port>,
    /// Whether nodes of this type render a mode dropdown under the header
    pub has_dropdown: bool,
    /// Whether nodes of this type render an inline value editor
    pub has_custom_input: bool,
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Category inherited from the node type
    pub category: NodeCategory,
    /// Display name (can be customized)
    pub name: String,
    /// Top-left corner position on the canvas
    pub position: [f32; 2],
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
    /// Whether this node renders a mode dropdown under the header
    pub has_dropdown: bool,
    /// Whether this node renders an inline value editor
    pub has_custom_input: bool,
    /// Custom header color (optional)
    pub color: Option<[u8; 3]>,
}

impl Node {
    /// Create a new node from a type definition
    ///
    /// The type's ports are a template; every instance gets its own
    /// port ids so wires never conflate ports across sibling instances.
    pub fn new(node_type: &NodeType) -> Self {
        let fresh_ports = |ports: &[Port]| -> Vec<Port> {
            ports
                .iter()
                .map(|p| Port {
                    id: PortId::new(),
                    ..p.clone()
                })
                .collect()
        };
        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            category: node_type.category,
            name: node_type.name.clone(),
            position: [0.0, 0.0],
            inputs: fresh_ports(&node_type.inputs),
            outputs: fresh_ports(&node_type.outputs),
            has_dropdown: node_type.has_dropdown,
            has_custom_input: node_type.has_custom_input,
            color: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Get the index of an input port by ID
    pub fn input_index(&self, port_id: &PortId) -> Option<usize> {
        self.inputs.iter().position(|p| p.id == *port_id)
    }

    /// Get the index of an output port by ID
    pub fn output_index(&self, port_id: &PortId) -> Option<usize> {
        self.outputs.iter().position(|p| p.id == *port_id)
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    fn test_type() -> NodeType {
        NodeType {
            id: "mix".to_string(),
            name: "Mix".to_string(),
            category: NodeCategory::Color,
            description: "Blend two colors".to_string(),
            inputs: vec![
                Port::input("A", PortKind::Color),
                Port::input("B", PortKind::Color),
                Port::input("Factor", PortKind::Float),
            ],
            outputs: vec![Port::output("Result", PortKind::Color)],
            has_dropdown: true,
            has_custom_input: false,
        }
    }

    #[test]
    fn test_node_from_type() {
        let node = Node::new(&test_type());
        assert_eq!(node.node_type, "mix");
        assert_eq!(node.category, NodeCategory::Color);
        assert_eq!(node.inputs.len(), 3);
        assert_eq!(node.outputs.len(), 1);
        assert!(node.has_dropdown);
        assert!(!node.has_custom_input);
        assert_eq!(node.position, [0.0, 0.0]);
    }

    #[test]
    fn test_port_index_lookup() {
        let node = Node::new(&test_type());
        let factor_id = node.inputs[2].id;
        let result_id = node.outputs[0].id;

        assert_eq!(node.input_index(&factor_id), Some(2));
        assert_eq!(node.output_index(&result_id), Some(0));
        // An input ID is not an output ID
        assert_eq!(node.output_index(&factor_id), None);
    }

    #[test]
    fn test_instances_get_fresh_port_ids() {
        let ty = test_type();
        let a = Node::new(&ty);
        let b = Node::new(&ty);

        // The template keeps its ids; instances mint their own
        assert_ne!(a.inputs[0].id, ty.inputs[0].id);
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert_ne!(a.outputs[0].id, b.outputs[0].id);
        // Port shape carries over unchanged
        assert_eq!(a.inputs[2].name, "Factor");
        assert_eq!(a.inputs.len(), b.inputs.len());
    }

    #[test]
    fn test_with_position() {
        let node = Node::new(&test_type()).with_position(120.0, -40.0);
        assert_eq!(node.position, [120.0, -40.0]);
    }
}
