// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node dimensions and port placement.
//!
//! Single source of truth for how big a node renders and where its ports
//! sit. Wire rendering and automatic layout both read these formulas, so
//! a wire drawn to a port lands exactly where layout expects it.

use crate::node::Node;
use crate::port::{Port, PortId};

/// Node body width in canvas units
pub const NODE_WIDTH: f32 = 180.0;
/// Title bar height
pub const HEADER_HEIGHT: f32 = 24.0;
/// Height of one port row
pub const PORT_ROW_HEIGHT: f32 = 22.0;
/// Height of the mode dropdown rendered under the header
pub const DROPDOWN_HEIGHT: f32 = 26.0;
/// Height of the inline value editor rendered under the header
pub const CUSTOM_INPUT_HEIGHT: f32 = 24.0;
/// Padding below the last port row
pub const BODY_PADDING: f32 = 8.0;

/// Header-adjacent widget height for a node (dropdown, inline editor)
fn widget_height(node: &Node) -> f32 {
    let mut height = 0.0;
    if node.has_dropdown {
        height += DROPDOWN_HEIGHT;
    }
    if node.has_custom_input {
        height += CUSTOM_INPUT_HEIGHT;
    }
    height
}

/// Total height of a port column, including per-port extra widget space
fn column_height(ports: &[Port]) -> f32 {
    ports
        .iter()
        .map(|p| PORT_ROW_HEIGHT + p.extra_height)
        .sum()
}

/// Rendered size of a node in canvas units
pub fn node_size(node: &Node) -> [f32; 2] {
    let ports = column_height(&node.inputs).max(column_height(&node.outputs));
    [
        NODE_WIDTH,
        HEADER_HEIGHT + widget_height(node) + ports + BODY_PADDING,
    ]
}

/// Vertical offset from the node's top edge to an input port's center
pub fn input_port_offset_y(node: &Node, index: usize) -> Option<f32> {
    port_offset_y(node, &node.inputs, index)
}

/// Vertical offset from the node's top edge to an output port's center
pub fn output_port_offset_y(node: &Node, index: usize) -> Option<f32> {
    port_offset_y(node, &node.outputs, index)
}

fn port_offset_y(node: &Node, column: &[Port], index: usize) -> Option<f32> {
    if index >= column.len() {
        return None;
    }
    let previous: f32 = column[..index]
        .iter()
        .map(|p| PORT_ROW_HEIGHT + p.extra_height)
        .sum();
    // Port circles sit mid-row; a port's extra widget renders below the row
    Some(HEADER_HEIGHT + widget_height(node) + previous + PORT_ROW_HEIGHT / 2.0)
}

/// Canvas position of a port's connection point
///
/// Input ports sit on the node's left edge, output ports on the right.
pub fn port_position(node: &Node, port_id: &PortId) -> Option<[f32; 2]> {
    if let Some(index) = node.input_index(port_id) {
        let y = input_port_offset_y(node, index)?;
        return Some([node.position[0], node.position[1] + y]);
    }
    if let Some(index) = node.output_index(port_id) {
        let y = output_port_offset_y(node, index)?;
        return Some([node.position[0] + NODE_WIDTH, node.position[1] + y]);
    }
    None
}
