// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-by-step recording and replay of a layout run.
//!
//! A presentation aid: a stepped run records a snapshot after every
//! placement decision, and [`DebugSession`] replays those snapshots on
//! the host so the process can be inspected one step at a time. None of
//! this changes the layout math; a stepped run produces the exact same
//! final coordinates as a plain run.

use crate::engine::{DebugOverlay, LayoutHost};
use crate::geometry::Rect;
use indexmap::IndexMap;
use serde::Serialize;
use shadegraph_model::{Graph, NodeId};

/// One recorded moment of the layout process
#[derive(Debug, Clone, Serialize)]
pub struct LayoutStep {
    /// What happened at this step
    pub description: String,
    /// Node positions as of this step, in the frame the step ran in
    pub positions: IndexMap<NodeId, [f32; 2]>,
    /// Bounding box of the step's working set, when one exists
    pub bbox: Option<Rect>,
    /// Offset applied by this step, if any
    pub offset: [f32; 2],
}

/// Collects [`LayoutStep`]s during a layout run.
///
/// A disabled recorder makes every call a no-op, so the plain arrange
/// path pays nothing for the instrumentation points.
#[derive(Debug)]
pub struct StepRecorder {
    enabled: bool,
    steps: Vec<LayoutStep>,
}

impl StepRecorder {
    /// Create a recorder; a disabled one records nothing
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            steps: Vec::new(),
        }
    }

    /// Whether this recorder captures steps
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a snapshot of the current positions
    pub fn record(
        &mut self,
        description: impl Into<String>,
        positions: &IndexMap<NodeId, [f32; 2]>,
        bbox: Option<Rect>,
        offset: [f32; 2],
    ) {
        if !self.enabled {
            return;
        }
        self.steps.push(LayoutStep {
            description: description.into(),
            positions: positions.clone(),
            bbox,
            offset,
        });
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consume the recorder, yielding the recorded steps
    pub fn into_steps(self) -> Vec<LayoutStep> {
        self.steps
    }
}

/// Keys the debug session responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKey {
    /// Step back
    ArrowLeft,
    /// Step forward
    ArrowRight,
    /// Step forward
    Space,
    /// Exit the session, restoring the final layout
    Escape,
}

/// An interactive replay of a recorded layout run.
///
/// Owns its step list and cursor; there is no shared debug state, so the
/// caller decides when a session starts and ends. Only one session
/// should drive a graph at a time. Dropping a session without calling
/// [`DebugSession::exit`] leaves the graph showing whatever step was
/// last applied.
#[derive(Debug)]
pub struct DebugSession {
    steps: Vec<LayoutStep>,
    cursor: usize,
    entered: bool,
    active: bool,
    final_positions: IndexMap<NodeId, [f32; 2]>,
}

impl DebugSession {
    pub(crate) fn new(steps: Vec<LayoutStep>, final_positions: IndexMap<NodeId, [f32; 2]>) -> Self {
        Self {
            steps,
            cursor: 0,
            entered: false,
            active: true,
            final_positions,
        }
    }

    /// Number of recorded steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Index of the currently shown step
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the session is still running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The currently shown step, once stepping has begun
    pub fn current(&self) -> Option<&LayoutStep> {
        if self.entered {
            self.steps.get(self.cursor)
        } else {
            None
        }
    }

    /// Advance to the next step and show it; the first call shows the
    /// first step
    pub fn step_forward(&mut self, graph: &mut Graph, host: &mut dyn LayoutHost) {
        if !self.active || self.steps.is_empty() {
            return;
        }
        if self.entered {
            if self.cursor + 1 < self.steps.len() {
                self.cursor += 1;
            }
        } else {
            self.entered = true;
        }
        self.apply_current(graph, host);
    }

    /// Go back one step and show it
    pub fn step_back(&mut self, graph: &mut Graph, host: &mut dyn LayoutHost) {
        if !self.active || self.steps.is_empty() {
            return;
        }
        self.entered = true;
        self.cursor = self.cursor.saturating_sub(1);
        self.apply_current(graph, host);
    }

    /// Handle a navigation key. Returns `false` once the session has
    /// exited.
    pub fn handle_key(
        &mut self,
        key: DebugKey,
        graph: &mut Graph,
        host: &mut dyn LayoutHost,
    ) -> bool {
        match key {
            DebugKey::ArrowRight | DebugKey::Space => self.step_forward(graph, host),
            DebugKey::ArrowLeft => self.step_back(graph, host),
            DebugKey::Escape => self.exit(graph, host),
        }
        self.active
    }

    /// End the session: restore the final layout, clear the overlay and
    /// request a render
    pub fn exit(&mut self, graph: &mut Graph, host: &mut dyn LayoutHost) {
        if !self.active {
            return;
        }
        for (id, position) in &self.final_positions {
            if let Some(node) = graph.node_mut(*id) {
                node.position = *position;
            }
        }
        host.set_debug_overlay(None);
        host.request_render();
        self.active = false;
    }

    /// Serialize the recorded steps as JSON
    pub fn export_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(&self.steps)
        } else {
            serde_json::to_string(&self.steps)
        }
    }

    fn apply_current(&self, graph: &mut Graph, host: &mut dyn LayoutHost) {
        let Some(step) = self.steps.get(self.cursor) else {
            return;
        };
        for (id, position) in &step.positions {
            if let Some(node) = graph.node_mut(*id) {
                node.position = *position;
            }
        }
        host.set_debug_overlay(Some(DebugOverlay {
            active_nodes: step.positions.keys().copied().collect(),
            bbox: step.bbox,
            label: step.description.clone(),
        }));
        host.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_recorder_ignores_records() {
        let mut recorder = StepRecorder::new(false);
        recorder.record("noop", &IndexMap::new(), None, [0.0, 0.0]);
        assert!(recorder.is_empty());
        assert!(!recorder.is_enabled());
    }

    #[test]
    fn test_enabled_recorder_snapshots() {
        let mut recorder = StepRecorder::new(true);
        let mut positions = IndexMap::new();
        positions.insert(NodeId::new(), [1.0, 2.0]);
        recorder.record(
            "placed a node",
            &positions,
            Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            [0.0, 0.0],
        );
        // Mutating the source after recording must not change the step
        positions.insert(NodeId::new(), [3.0, 4.0]);

        assert_eq!(recorder.len(), 1);
        let steps = recorder.into_steps();
        assert_eq!(steps[0].positions.len(), 1);
        assert_eq!(steps[0].description, "placed a node");
    }

    #[test]
    fn test_step_json_export() {
        let mut recorder = StepRecorder::new(true);
        let mut positions = IndexMap::new();
        positions.insert(NodeId::new(), [5.0, -3.0]);
        recorder.record("step", &positions, None, [1.0, 0.0]);

        let session = DebugSession::new(recorder.into_steps(), IndexMap::new());
        let json = session.export_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["description"], "step");
    }
}
