// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type registry and the built-in shader node set.
//!
//! The built-in set is a compact catalog of standard shader nodes. It is
//! what the demos and tests build graphs from; a full editor distribution
//! registers its complete node catalog on top.

use crate::node::{Node, NodeCategory, NodeType};
use crate::port::{Port, PortKind};
use indexmap::IndexMap;

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the registry of built-in shader node types
pub fn builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "material_output".to_string(),
        name: "Material Output".to_string(),
        category: NodeCategory::Output,
        description: "Final material output".to_string(),
        inputs: vec![
            Port::input("Base Color", PortKind::Color),
            Port::input("Metallic", PortKind::Float),
            Port::input("Roughness", PortKind::Float),
            Port::input("Normal", PortKind::Vec3),
            Port::input("Emission", PortKind::Color),
        ],
        outputs: vec![],
        has_dropdown: false,
        has_custom_input: false,
    });

    // ========================================================================
    // Input Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "uv".to_string(),
        name: "UV".to_string(),
        category: NodeCategory::Input,
        description: "Mesh UV coordinates".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("UV", PortKind::Vec2)],
        has_dropdown: false,
        has_custom_input: false,
    });

    registry.register(NodeType {
        id: "float_constant".to_string(),
        name: "Float".to_string(),
        category: NodeCategory::Input,
        description: "Constant float value".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Value", PortKind::Float)],
        has_dropdown: false,
        has_custom_input: true,
    });

    registry.register(NodeType {
        id: "color_constant".to_string(),
        name: "Color".to_string(),
        category: NodeCategory::Input,
        description: "Constant color value".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Color", PortKind::Color)],
        has_dropdown: false,
        has_custom_input: true,
    });

    registry.register(NodeType {
        id: "time".to_string(),
        name: "Time".to_string(),
        category: NodeCategory::Input,
        description: "Shader time in seconds".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Time", PortKind::Float)],
        has_dropdown: false,
        has_custom_input: false,
    });

    // ========================================================================
    // Texture Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "texture_sample".to_string(),
        name: "Texture Sample".to_string(),
        category: NodeCategory::Texture,
        description: "Sample a 2D texture".to_string(),
        inputs: vec![
            Port::input("Texture", PortKind::Texture),
            Port::input("UV", PortKind::Vec2),
        ],
        outputs: vec![
            Port::output("Color", PortKind::Color),
            Port::output("Alpha", PortKind::Float),
        ],
        has_dropdown: false,
        has_custom_input: false,
    });

    // ========================================================================
    // Math Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "math".to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Math,
        description: "Scalar math operation".to_string(),
        inputs: vec![
            Port::input("A", PortKind::Float),
            Port::input("B", PortKind::Float),
        ],
        outputs: vec![Port::output("Result", PortKind::Float)],
        has_dropdown: true,
        has_custom_input: false,
    });

    // ========================================================================
    // Color Nodes
    // ========================================================================

    registry.register(NodeType {
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
    });

    registry.register(NodeType {
        id: "color_ramp".to_string(),
        name: "Color Ramp".to_string(),
        category: NodeCategory::Color,
        description: "Map a factor through a gradient".to_string(),
        inputs: vec![
            Port::input("Factor", PortKind::Float).with_extra_height(36.0),
        ],
        outputs: vec![
            Port::output("Color", PortKind::Color),
            Port::output("Alpha", PortKind::Float),
        ],
        has_dropdown: false,
        has_custom_input: false,
    });

    // ========================================================================
    // Vector Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "split".to_string(),
        name: "Split".to_string(),
        category: NodeCategory::Vector,
        description: "Split a vector into components".to_string(),
        inputs: vec![Port::input("Vector", PortKind::Vec3)],
        outputs: vec![
            Port::output("X", PortKind::Float),
            Port::output("Y", PortKind::Float),
            Port::output("Z", PortKind::Float),
        ],
        has_dropdown: false,
        has_custom_input: false,
    });

    registry.register(NodeType {
        id: "combine".to_string(),
        name: "Combine".to_string(),
        category: NodeCategory::Vector,
        description: "Combine components into a vector".to_string(),
        inputs: vec![
            Port::input("X", PortKind::Float),
            Port::input("Y", PortKind::Float),
            Port::input("Z", PortKind::Float),
        ],
        outputs: vec![Port::output("Vector", PortKind::Vec3)],
        has_dropdown: false,
        has_custom_input: false,
    });

    registry.register(NodeType {
        id: "uv_transform".to_string(),
        name: "UV Transform".to_string(),
        category: NodeCategory::Vector,
        description: "Tile and offset UV coordinates".to_string(),
        inputs: vec![
            Port::input("UV", PortKind::Vec2),
            Port::input("Tiling", PortKind::Vec2),
            Port::input("Offset", PortKind::Vec2),
        ],
        outputs: vec![Port::output("UV", PortKind::Vec2)],
        has_dropdown: false,
        has_custom_input: false,
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_has_output() {
        let registry = builtin_registry();
        let output = registry.get("material_output").unwrap();
        assert_eq!(output.category, NodeCategory::Output);
        assert!(output.outputs.is_empty());
    }

    #[test]
    fn test_create_node_fresh_ids() {
        let registry = builtin_registry();
        let a = registry.create_node("mix").unwrap();
        let b = registry.create_node("mix").unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert!(a.has_dropdown);
    }

    #[test]
    fn test_types_in_category() {
        let registry = builtin_registry();
        let inputs: Vec<_> = registry.types_in_category(NodeCategory::Input).collect();
        assert!(inputs.len() >= 3);
        assert!(inputs.iter().all(|t| t.inputs.is_empty()));
    }
}
