// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader graph data model for `ShadeGraph`.
//!
//! This crate provides the document model the editor operates on:
//! - Nodes with typed input/output ports
//! - Wires with connection validation
//! - Node dimensions and port placement (shared with the renderer)
//! - Serialization support
//!
//! ## Architecture
//!
//! The model is deliberately free of rendering and shader-compilation
//! concerns. Node types are declarative shapes; the [`geometry`] module is
//! the single source of truth for how big a node is and where its ports
//! sit, so that wire rendering and automatic layout agree exactly.

pub mod geometry;
pub mod graph;
pub mod node;
pub mod port;
pub mod registry;
pub mod wire;

pub use graph::Graph;
pub use node::{Node, NodeCategory, NodeId, NodeType};
pub use port::{Port, PortDirection, PortId, PortKind};
pub use registry::NodeRegistry;
pub use wire::{Wire, WireId};
