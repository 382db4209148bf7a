// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Spacing constants and iteration limits for the layout engine.
///
/// Passed explicitly into the layout entry points; there is no global
/// config singleton. [`LayoutConfig::default`] gives the values the
/// editor ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Base horizontal distance between adjacent layers in the layered
    /// fallback, left edge to left edge
    pub layer_spacing: f32,
    /// Base vertical distance between stacked nodes in the layered
    /// fallback
    pub vertical_spacing: f32,
    /// Vertical distance between adjacent leaves that feed the same
    /// node; the tightest spacing stage
    pub leaf_spacing: f32,
    /// Vertical distance between stacked branches of one component
    pub branch_spacing: f32,
    /// Vertical distance between stacked connected components
    pub component_spacing: f32,
    /// Barycenter sweep rounds in the layered fallback
    pub crossing_iterations: usize,
    /// Bounding boxes closer than this count as overlapping
    pub overlap_margin: f32,
    /// Push-apart attempts per child before accepting the last
    /// position as-is
    pub max_overlap_attempts: usize,
    /// Canvas position of the arranged set's top-left corner
    pub origin: [f32; 2],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: 250.0,
            vertical_spacing: 100.0,
            leaf_spacing: 40.0,
            branch_spacing: 60.0,
            component_spacing: 120.0,
            crossing_iterations: 8,
            overlap_margin: 2.0,
            max_overlap_attempts: 20,
            origin: [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.crossing_iterations, 8);
        assert_eq!(config.max_overlap_attempts, 20);
        assert_eq!(config.overlap_margin, 2.0);
        assert_eq!(config.origin, [0.0, 0.0]);
        assert!(config.leaf_spacing < config.vertical_spacing);
    }
}
