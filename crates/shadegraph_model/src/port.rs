// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Value kind that can flow through a wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortKind {
    /// Scalar value
    Float,
    /// 2D vector (UV coordinates)
    Vec2,
    /// 3D vector (positions, normals)
    Vec3,
    /// 4D vector
    Vec4,
    /// Color (RGBA)
    Color,
    /// Texture sampler
    Texture,
    /// Any kind (for generic nodes)
    Any,
}

impl PortKind {
    /// Check if this kind can connect to another kind
    pub fn can_connect_to(&self, other: &PortKind) -> bool {
        // Any kind can connect to anything
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        // Same kinds can always connect
        if self == other {
            return true;
        }

        // Implicit conversions
        match (self, other) {
            // Scalar splat
            (Self::Float, Self::Vec2 | Self::Vec3 | Self::Vec4) => true,
            // Vector widening
            (Self::Vec2, Self::Vec3 | Self::Vec4) => true,
            (Self::Vec3, Self::Vec4) => true,
            // Color conversions
            (Self::Color, Self::Vec4) | (Self::Vec4, Self::Color) => true,
            // No other implicit conversions
            _ => false,
        }
    }
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Value kind
    pub kind: PortKind,
    /// Extra widget height rendered beneath this port's row, in canvas units
    pub extra_height: f32,
    /// Whether multiple connections are allowed
    pub multi_connect: bool,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            kind,
            extra_height: 0.0,
            multi_connect: false,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            kind,
            extra_height: 0.0,
            multi_connect: true, // Outputs can feed multiple inputs by default
        }
    }

    /// Set the extra widget height rendered beneath this port's row
    pub fn with_extra_height(mut self, height: f32) -> Self {
        self.extra_height = height;
        self
    }

    /// Check if a connection to another port is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        // Must be opposite directions
        if self.direction == other.direction {
            return false;
        }

        // Check kind compatibility
        self.kind.can_connect_to(&other.kind)
    }
}
