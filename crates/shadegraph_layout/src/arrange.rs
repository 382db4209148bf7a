// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hierarchical bottom-up branch layout.
//!
//! Processes a branch leaves-first in descending depth order. Each node's
//! subtree layout is assembled from its children's already-computed
//! layouts, in a local frame where the node's right edge sits at x = 0
//! and producers extend left. The root's layout is the branch result.

use crate::config::LayoutConfig;
use crate::dependency::DependencyGraph;
use crate::geometry::Rect;
use crate::stepper::StepRecorder;
use crate::tree::{find_root, LayoutTree};
use indexmap::{IndexMap, IndexSet};
use shadegraph_model::{geometry, Graph, NodeId};

/// Placeholder box used for leaf subtrees
const LEAF_WIDTH: f32 = 200.0;
/// Placeholder box height for leaf subtrees
const LEAF_HEIGHT: f32 = 100.0;

/// The computed layout of a subtree, in its local coordinate frame
#[derive(Debug, Clone)]
pub struct BranchLayout {
    /// Bounding box of every placed node
    pub bbox: Rect,
    /// Local top-left position per node
    pub positions: IndexMap<NodeId, [f32; 2]>,
    /// Placed node ids, in placement order
    pub nodes: Vec<NodeId>,
}

/// Lay out one branch bottom-up from its detected root.
///
/// Returns `None` when no root can be identified; the caller then runs
/// the layered fallback instead.
pub fn hierarchical_layout(
    graph: &Graph,
    dep: &DependencyGraph,
    subset: &[NodeId],
    config: &LayoutConfig,
    recorder: &mut StepRecorder,
) -> Option<BranchLayout> {
    let root = find_root(graph, dep, subset)?;
    let tree = LayoutTree::build(dep, root, subset);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let violations = tree.verify_depth_ordering();
        if violations > 0 {
            tracing::debug!(violations, "depth ordering violations in branch");
        }
    }

    let mut layouts: IndexMap<NodeId, BranchLayout> = IndexMap::new();
    let mut processed: IndexSet<NodeId> = IndexSet::new();

    for id in tree.nodes_by_depth_desc() {
        // Traversal can reach a node through several parents; lay each
        // node out exactly once
        if !processed.insert(id) {
            continue;
        }
        let children = tree.children(id);
        let layout = if children.is_empty() {
            leaf_layout(id)
        } else {
            arrange_branch_with_children(id, children, &layouts, graph, dep, config)
        };
        recorder.record(
            format!("Arranged {}", node_label(graph, id)),
            &layout.positions,
            Some(layout.bbox),
            [0.0, 0.0],
        );
        layouts.insert(id, layout);
    }

    layouts.swap_remove(&root)
}

/// Trivial single-node layout at the local origin
fn leaf_layout(node_id: NodeId) -> BranchLayout {
    let mut positions = IndexMap::new();
    positions.insert(node_id, [0.0, 0.0]);
    BranchLayout {
        bbox: Rect::new(0.0, 0.0, LEAF_WIDTH, LEAF_HEIGHT),
        positions,
        nodes: vec![node_id],
    }
}

/// Horizontal gap between a node and its children, scaled by total
/// descendant count so small branches stay tight and large ones leave
/// room for wires
pub(crate) fn child_gap(descendants: usize) -> f32 {
    match descendants {
        0 | 1 => 20.0,
        2 | 3 => 30.0,
        4..=6 => 40.0,
        n => 50.0 + ((n - 6) as f32 * 10.0).min(50.0),
    }
}

/// Assemble a node's subtree layout from its children's layouts.
///
/// The node's own box is anchored with its right edge at x = 0. A single
/// child is aligned so the connecting port pair shares a Y coordinate
/// and the wire runs horizontal. Multiple children each start at local
/// Y = 0 and get pushed apart, least displacement first, until their
/// bounding boxes clear every previously placed sibling or the attempt
/// budget runs out.
fn arrange_branch_with_children(
    node_id: NodeId,
    children: &[NodeId],
    layouts: &IndexMap<NodeId, BranchLayout>,
    graph: &Graph,
    dep: &DependencyGraph,
    config: &LayoutConfig,
) -> BranchLayout {
    let parent_size = graph
        .node(node_id)
        .map_or([LEAF_WIDTH, LEAF_HEIGHT], geometry::node_size);
    let parent_rect = Rect::new(-parent_size[0], 0.0, parent_size[0], parent_size[1]);

    let descendants: usize = children
        .iter()
        .filter_map(|c| layouts.get(c))
        .map(|l| l.nodes.len())
        .sum();
    let gap = child_gap(descendants);

    let single_child = children.len() == 1;
    let mut placed: Vec<Rect> = Vec::new();
    let mut offsets: Vec<(NodeId, [f32; 2])> = Vec::new();

    for child in children {
        let Some(layout) = layouts.get(child) else {
            // Reachable when a cycle kept a child from being processed
            // before its consumer; skip it and keep going
            tracing::error!(node = ?child, "child has no computed layout, skipping");
            continue;
        };

        let offset_x = parent_rect.x - gap - layout.bbox.right();
        let mut offset_y = if single_child {
            port_alignment_offset(graph, dep, node_id, *child, layout).unwrap_or(0.0)
        } else {
            // Each subtree starts at local Y = 0; overlap pushes move it
            -layout.bbox.y
        };

        let settled = resolve_overlaps(&layout.bbox, offset_x, &mut offset_y, &placed, config);
        if !settled {
            tracing::debug!(
                node = ?child,
                "overlap resolution budget exhausted, accepting last position"
            );
        }

        placed.push(layout.bbox.translated(offset_x, offset_y));
        offsets.push((*child, [offset_x, offset_y]));
    }

    // Merge positions; a shared subtree seen under more than one parent
    // keeps the last placement
    let mut positions: IndexMap<NodeId, [f32; 2]> = IndexMap::new();
    positions.insert(node_id, [parent_rect.x, parent_rect.y]);
    let mut bbox = parent_rect;
    for ((child, offset), rect) in offsets.iter().zip(&placed) {
        bbox = bbox.union(rect);
        if let Some(layout) = layouts.get(child) {
            for (id, position) in &layout.positions {
                let moved = [position[0] + offset[0], position[1] + offset[1]];
                if positions.insert(*id, moved).is_some() {
                    tracing::debug!(node = ?id, "shared subtree node repositioned");
                }
            }
        }
    }

    // Keep the local frame non-negative in Y
    if bbox.y < 0.0 {
        let shift = -bbox.y;
        for position in positions.values_mut() {
            position[1] += shift;
        }
        bbox = bbox.translated(0.0, shift);
    }

    let nodes = positions.keys().copied().collect();
    BranchLayout {
        bbox,
        positions,
        nodes,
    }
}

/// Push a child's Y offset, least displacement first, until its box
/// clears every placed sibling.
///
/// Returns whether the box is clear of all siblings when the loop ends;
/// `false` means the attempt budget ran out and the last computed
/// position stands as-is.
pub(crate) fn resolve_overlaps(
    bbox: &Rect,
    offset_x: f32,
    offset_y: &mut f32,
    placed: &[Rect],
    config: &LayoutConfig,
) -> bool {
    let mut attempts = 0;
    while attempts < config.max_overlap_attempts {
        let current = bbox.translated(offset_x, *offset_y);
        let Some(other) = placed
            .iter()
            .find(|r| current.overlaps(r, config.overlap_margin))
        else {
            return true;
        };
        // Push whichever way needs less displacement
        let push_up = other.y - config.overlap_margin - current.bottom();
        let push_down = other.bottom() + config.overlap_margin - current.y;
        *offset_y += if push_up.abs() <= push_down.abs() {
            push_up
        } else {
            push_down
        };
        attempts += 1;
    }
    let current = bbox.translated(offset_x, *offset_y);
    placed
        .iter()
        .all(|r| !current.overlaps(r, config.overlap_margin))
}

/// Y offset for a single child so the connecting port pair lines up,
/// using the same port formulas the renderer draws with
fn port_alignment_offset(
    graph: &Graph,
    dep: &DependencyGraph,
    parent_id: NodeId,
    child_id: NodeId,
    child_layout: &BranchLayout,
) -> Option<f32> {
    let (input_index, output_index) = dep.port_pair(parent_id, child_id)?;
    let parent = graph.node(parent_id)?;
    let child = graph.node(child_id)?;
    // Parent's box top sits at local y = 0
    let parent_port_y = geometry::input_port_offset_y(parent, input_index)?;
    let child_local = child_layout.positions.get(&child_id)?;
    let child_port_y = child_local[1] + geometry::output_port_offset_y(child, output_index)?;
    Some(parent_port_y - child_port_y)
}

fn node_label(graph: &Graph, node_id: NodeId) -> String {
    graph
        .node(node_id)
        .map_or_else(|| format!("{node_id:?}"), |n| n.name.clone())
}
