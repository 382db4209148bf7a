// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire (edge) definitions for the shader graph.

use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireId(pub Uuid);

impl WireId {
    /// Create a new random wire ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WireId {
    fn default() -> Self {
        Self::new()
    }
}

/// A wire between an output port and an input port
///
/// Data flows from `start` to `end`: the start side is always an output
/// port on the producing node, the end side an input port on the consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    /// Unique wire ID
    pub id: WireId,
    /// Producing node ID
    pub start_node: NodeId,
    /// Output port ID on the producing node
    pub start_port: PortId,
    /// Consuming node ID
    pub end_node: NodeId,
    /// Input port ID on the consuming node
    pub end_port: PortId,
}

impl Wire {
    /// Create a new wire
    pub fn new(
        start_node: NodeId,
        start_port: PortId,
        end_node: NodeId,
        end_port: PortId,
    ) -> Self {
        Self {
            id: WireId::new(),
            start_node,
            start_port,
            end_node,
            end_port,
        }
    }

    /// Check if this wire involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.start_node == node_id || self.end_node == node_id
    }

    /// Check if this wire involves a specific port
    pub fn involves_port(&self, port_id: PortId) -> bool {
        self.start_port == port_id || self.end_port == port_id
    }
}
