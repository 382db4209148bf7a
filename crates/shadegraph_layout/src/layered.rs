// SPDX-License-Identifier: MIT OR Apache-2.0
//! Traditional layered layout, used when no root can be identified.
//!
//! Classic three-stage Sugiyama pass: longest-path layer assignment,
//! barycenter crossing reduction, then coordinate calculation. Unlike
//! the hierarchical path this never needs a designated sink, so it also
//! covers purely cyclic subgraphs.

use crate::arrange::BranchLayout;
use crate::config::LayoutConfig;
use crate::dependency::DependencyGraph;
use crate::geometry::Rect;
use crate::stepper::StepRecorder;
use indexmap::{IndexMap, IndexSet};
use shadegraph_model::{geometry, Graph, NodeId};

/// Lay out a subset with the layered algorithm.
pub fn layered_layout(
    graph: &Graph,
    dep: &DependencyGraph,
    subset: &[NodeId],
    config: &LayoutConfig,
    recorder: &mut StepRecorder,
) -> BranchLayout {
    let layers = assign_layers(dep, subset);
    let ordered = reduce_crossings(dep, &layers, config.crossing_iterations);
    let layout = calculate_positions(graph, dep, &ordered, config);
    recorder.record(
        format!("Layered fallback for {} nodes", subset.len()),
        &layout.positions,
        Some(layout.bbox),
        [0.0, 0.0],
    );
    layout
}

/// Longest-path layer assignment.
///
/// Nodes with no inputs inside the subset seed layer 0; when a pure
/// cycle leaves no such node, the nodes with the fewest inputs seed
/// instead and stay pinned. Every other node is repeatedly raised to one
/// past its highest assigned input until a fixed point, cut off after
/// 2x|V| sweeps so cyclic subgraphs terminate with finite layers.
pub fn assign_layers(dep: &DependencyGraph, subset: &[NodeId]) -> IndexMap<NodeId, usize> {
    let set: IndexSet<NodeId> = subset.iter().copied().collect();
    let input_count = |id: NodeId| -> usize {
        dep.entry(id)
            .map_or(0, |e| e.inputs.iter().filter(|i| set.contains(*i)).count())
    };

    let min_inputs = subset.iter().map(|id| input_count(*id)).min().unwrap_or(0);
    let seeds: IndexSet<NodeId> = subset
        .iter()
        .copied()
        .filter(|id| input_count(*id) == min_inputs)
        .collect();
    if min_inputs > 0 {
        tracing::debug!(
            seeds = seeds.len(),
            "no zero-input node, seeding minimum-input nodes at layer 0"
        );
    }

    let mut layers: IndexMap<NodeId, usize> = subset.iter().map(|id| (*id, 0)).collect();
    let max_sweeps = 2 * subset.len();
    for _ in 0..max_sweeps {
        let mut changed = false;
        for id in subset {
            if seeds.contains(id) {
                continue;
            }
            let target = dep
                .entry(*id)
                .map_or(0, |e| {
                    e.inputs
                        .iter()
                        .filter(|i| set.contains(*i))
                        .map(|i| layers.get(i).copied().unwrap_or(0) + 1)
                        .max()
                        .unwrap_or(0)
                });
            let current = layers.get(id).copied().unwrap_or(0);
            if target > current {
                layers.insert(*id, target);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    layers
}

/// Barycenter crossing reduction.
///
/// Alternates forward sweeps (each layer ordered by the mean position of
/// its neighbors one layer down) and backward sweeps (mirrored) for a
/// fixed number of rounds. A node with no positioned neighbors keeps its
/// current index.
pub fn reduce_crossings(
    dep: &DependencyGraph,
    layers: &IndexMap<NodeId, usize>,
    iterations: usize,
) -> Vec<Vec<NodeId>> {
    let max_layer = layers.values().max().copied().unwrap_or(0);
    let mut lists: Vec<Vec<NodeId>> = vec![Vec::new(); max_layer + 1];
    for (id, layer) in layers {
        lists[*layer].push(*id);
    }

    for _ in 0..iterations {
        for i in 1..lists.len() {
            let adjacent = lists[i - 1].clone();
            sort_by_barycenter(dep, &mut lists[i], &adjacent);
        }
        for i in (0..lists.len().saturating_sub(1)).rev() {
            let adjacent = lists[i + 1].clone();
            sort_by_barycenter(dep, &mut lists[i], &adjacent);
        }
    }
    lists
}

fn sort_by_barycenter(dep: &DependencyGraph, layer: &mut Vec<NodeId>, adjacent: &[NodeId]) {
    let index_of: IndexMap<NodeId, usize> = adjacent
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut keyed: Vec<(f32, NodeId)> = layer
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let neighbor_indices: Vec<usize> = dep.entry(*id).map_or_else(Vec::new, |e| {
                e.inputs
                    .iter()
                    .chain(e.outputs.iter())
                    .filter_map(|n| index_of.get(n).copied())
                    .collect()
            });
            let barycenter = if neighbor_indices.is_empty() {
                index as f32
            } else {
                neighbor_indices.iter().sum::<usize>() as f32 / neighbor_indices.len() as f32
            };
            (barycenter, *id)
        })
        .collect();

    // Stable sort keeps ties in their current order
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    *layer = keyed.into_iter().map(|(_, id)| id).collect();
}

/// Turn layer orderings into coordinates.
///
/// X walks left to right, spacing each pair of layers wider when they
/// hold more nodes (capped at twice the base spacing). Y stacks a
/// layer's nodes top to bottom with the gap staged by how related two
/// adjacent nodes are: same-parent leaves tightest, then
/// single-connection leaves, then nodes sharing a neighbor or directly
/// connected, then the full base spacing.
pub fn calculate_positions(
    graph: &Graph,
    dep: &DependencyGraph,
    lists: &[Vec<NodeId>],
    config: &LayoutConfig,
) -> BranchLayout {
    let mut positions: IndexMap<NodeId, [f32; 2]> = IndexMap::new();
    let mut bbox: Option<Rect> = None;
    let mut x = 0.0f32;

    for (i, layer) in lists.iter().enumerate() {
        let mut y = 0.0f32;
        let mut previous: Option<NodeId> = None;
        for id in layer {
            if let Some(prev) = previous {
                y += vertical_gap(dep, prev, *id, config);
            }
            let size = graph
                .node(*id)
                .map_or([geometry::NODE_WIDTH, 100.0], geometry::node_size);
            positions.insert(*id, [x, y]);
            let rect = Rect::new(x, y, size[0], size[1]);
            bbox = Some(bbox.map_or(rect, |b| b.union(&rect)));
            y += size[1];
            previous = Some(*id);
        }

        if i + 1 < lists.len() {
            let average = (layer.len() + lists[i + 1].len()) as f32 / 2.0;
            let scale = (1.0 + (average - 1.0) * 0.15).clamp(1.0, 2.0);
            x += config.layer_spacing * scale;
        }
    }

    // Shift into the branch-local frame: right edge at x = 0, top at 0
    let mut bbox = bbox.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    let dx = -bbox.right();
    let dy = -bbox.y;
    for position in positions.values_mut() {
        position[0] += dx;
        position[1] += dy;
    }
    bbox = bbox.translated(dx, dy);

    let nodes = positions.keys().copied().collect();
    BranchLayout {
        bbox,
        positions,
        nodes,
    }
}

fn is_leaf(dep: &DependencyGraph, id: NodeId) -> bool {
    dep.entry(id).map_or(true, |e| e.inputs.is_empty())
}

fn connection_count(dep: &DependencyGraph, id: NodeId) -> usize {
    dep.entry(id)
        .map_or(0, |e| e.inputs.len() + e.outputs.len())
}

fn share_neighbor(dep: &DependencyGraph, a: NodeId, b: NodeId) -> bool {
    let neighbors = |id: NodeId| -> IndexSet<NodeId> {
        dep.entry(id).map_or_else(IndexSet::new, |e| {
            e.inputs.iter().chain(e.outputs.iter()).copied().collect()
        })
    };
    let a_neighbors = neighbors(a);
    neighbors(b).iter().any(|n| a_neighbors.contains(n))
}

fn directly_connected(dep: &DependencyGraph, a: NodeId, b: NodeId) -> bool {
    dep.entry(a)
        .map_or(false, |e| e.inputs.contains(&b) || e.outputs.contains(&b))
}

/// Vertical gap between two adjacent nodes in a layer, most specific
/// relation first
fn vertical_gap(dep: &DependencyGraph, a: NodeId, b: NodeId, config: &LayoutConfig) -> f32 {
    let both_leaves = is_leaf(dep, a) && is_leaf(dep, b);
    if both_leaves && share_neighbor(dep, a, b) {
        return config.leaf_spacing;
    }
    if connection_count(dep, a) == 1 && connection_count(dep, b) == 1 {
        return config.vertical_spacing * 0.7;
    }
    if share_neighbor(dep, a, b) || directly_connected(dep, a, b) {
        return config.vertical_spacing * 0.6;
    }
    config.vertical_spacing
}
