// SPDX-License-Identifier: MIT OR Apache-2.0
//! The auto layout engine and its host boundary.
//!
//! [`AutoLayoutEngine::auto_arrange`] runs to completion in one call:
//! build the dependency graph, partition it, lay out every branch, stack
//! the results and write positions back, then ask the host to render,
//! recenter and record an undo checkpoint. The engine holds no state
//! between calls beyond its configuration.

use crate::arrange::hierarchical_layout;
use crate::config::LayoutConfig;
use crate::dependency::DependencyGraph;
use crate::geometry::Rect;
use crate::layered::layered_layout;
use crate::partition::{find_branches, find_components};
use crate::stepper::{DebugSession, StepRecorder};
use indexmap::IndexMap;
use shadegraph_model::{Graph, NodeId};

/// Debug overlay data the host may draw on top of the canvas
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    /// Nodes the current step touched
    pub active_nodes: Vec<NodeId>,
    /// Bounding box of the current step's working set
    pub bbox: Option<Rect>,
    /// Human-readable step label
    pub label: String,
}

/// What the layout engine needs from its host.
///
/// The engine mutates node positions directly on the graph; everything
/// else goes through this trait. All calls arrive after the bulk
/// position mutation is complete.
pub trait LayoutHost {
    /// Redraw the canvas
    fn request_render(&mut self);
    /// Recenter the camera on the current node extents
    fn center_view(&mut self);
    /// Record an undo checkpoint with a human-readable description
    fn push_history(&mut self, description: &str);
    /// Show or clear the layout debug overlay
    fn set_debug_overlay(&mut self, overlay: Option<DebugOverlay>) {
        let _ = overlay;
    }
}

/// Automatic graph layout engine.
pub struct AutoLayoutEngine {
    /// Spacing constants and iteration limits
    pub config: LayoutConfig,
}

impl AutoLayoutEngine {
    /// Create an engine with the given configuration
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Arrange the graph, or just the selection when it is non-empty.
    ///
    /// Mutates node positions in place, then triggers a render, a
    /// camera recenter and a history push. An empty target set is a
    /// logged no-op.
    pub fn auto_arrange(&self, graph: &mut Graph, selection: &[NodeId], host: &mut dyn LayoutHost) {
        let mut recorder = StepRecorder::new(false);
        self.run(graph, selection, host, &mut recorder);
    }

    /// Same pass as [`AutoLayoutEngine::auto_arrange`], recording every
    /// step for interactive replay.
    ///
    /// Returns `None` when there was nothing to arrange.
    pub fn auto_arrange_stepped(
        &self,
        graph: &mut Graph,
        selection: &[NodeId],
        host: &mut dyn LayoutHost,
    ) -> Option<DebugSession> {
        let mut recorder = StepRecorder::new(true);
        if !self.run(graph, selection, host, &mut recorder) {
            return None;
        }
        let final_positions: IndexMap<NodeId, [f32; 2]> =
            graph.nodes().map(|n| (n.id, n.position)).collect();
        Some(DebugSession::new(recorder.into_steps(), final_positions))
    }

    fn run(
        &self,
        graph: &mut Graph,
        selection: &[NodeId],
        host: &mut dyn LayoutHost,
        recorder: &mut StepRecorder,
    ) -> bool {
        let targets: Vec<NodeId> = if selection.is_empty() {
            graph.node_ids().collect()
        } else {
            selection
                .iter()
                .copied()
                .filter(|id| graph.node(*id).is_some())
                .collect()
        };
        if targets.is_empty() {
            tracing::info!("auto-arrange: nothing to arrange");
            return false;
        }
        let selected_count = if selection.is_empty() {
            None
        } else {
            Some(targets.len())
        };

        let dep = DependencyGraph::build(graph, &targets);
        let components = find_components(&dep);
        tracing::debug!(
            nodes = targets.len(),
            components = components.len(),
            "auto-arrange started"
        );

        let mut placements: IndexMap<NodeId, [f32; 2]> = IndexMap::new();
        let mut global_bbox: Option<Rect> = None;
        let mut component_y = 0.0f32;

        for component in &components {
            let mut component_positions: IndexMap<NodeId, [f32; 2]> = IndexMap::new();
            let mut component_bbox: Option<Rect> = None;
            let mut branch_y = 0.0f32;

            for branch in find_branches(component, &dep) {
                let layout = match hierarchical_layout(graph, &dep, &branch, &self.config, recorder)
                {
                    Some(layout) => layout,
                    None => {
                        tracing::debug!(
                            nodes = branch.len(),
                            "no root identifiable, using layered fallback"
                        );
                        layered_layout(graph, &dep, &branch, &self.config, recorder)
                    }
                };

                // Branches stack downward with their right edges aligned
                let dx = -layout.bbox.right();
                let dy = branch_y - layout.bbox.y;
                for (id, position) in &layout.positions {
                    component_positions.insert(*id, [position[0] + dx, position[1] + dy]);
                }
                let placed = layout.bbox.translated(dx, dy);
                component_bbox = Some(component_bbox.map_or(placed, |b| b.union(&placed)));
                branch_y = placed.bottom() + self.config.branch_spacing;
                recorder.record(
                    format!("Stacked branch of {} nodes", layout.nodes.len()),
                    &component_positions,
                    Some(placed),
                    [dx, dy],
                );
            }

            let Some(bbox) = component_bbox else { continue };
            let dy = component_y - bbox.y;
            for (id, position) in component_positions {
                placements.insert(id, [position[0], position[1] + dy]);
            }
            let placed = bbox.translated(0.0, dy);
            global_bbox = Some(global_bbox.map_or(placed, |b| b.union(&placed)));
            component_y = placed.bottom() + self.config.component_spacing;
            recorder.record(
                format!("Stacked component of {} nodes", component.len()),
                &placements,
                Some(placed),
                [0.0, dy],
            );
        }

        // Translate the whole arrangement so its top-left lands on the
        // configured origin
        if let Some(bbox) = global_bbox {
            let dx = self.config.origin[0] - bbox.x;
            let dy = self.config.origin[1] - bbox.y;
            for position in placements.values_mut() {
                position[0] += dx;
                position[1] += dy;
            }
            global_bbox = Some(bbox.translated(dx, dy));
        }

        for (id, position) in &placements {
            if let Some(node) = graph.node_mut(*id) {
                node.position = *position;
            }
        }
        recorder.record(
            "Applied final positions",
            &placements,
            global_bbox,
            [0.0, 0.0],
        );

        host.request_render();
        host.center_view();
        match selected_count {
            Some(count) => host.push_history(&format!("Auto-arrange {count} selected nodes")),
            None => host.push_history("Auto-arrange all nodes"),
        }
        true
    }
}

impl Default for AutoLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
