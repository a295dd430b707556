use super::LayoutEdge;
use crate::geom::{Point3, point3};
use crate::layout_node::{LayoutNode, LayoutNodes};

/// Straight edges: up from the source, across, and down onto the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightEdges {
    pub edges_above_blocks: bool,
    pub minimal_edge_level_distance: f64,
}

impl StraightEdges {
    pub fn new(edges_above_blocks: bool, minimal_edge_level_distance: f64) -> Self {
        Self {
            edges_above_blocks,
            minimal_edge_level_distance,
        }
    }

    pub fn route(&self, nodes: &LayoutNodes, edge: &LayoutEdge) -> Vec<Point3> {
        let start = anchor(nodes.get(edge.source), self.edges_above_blocks);
        let end = anchor(nodes.get(edge.target), self.edges_above_blocks);
        let y = if self.edges_above_blocks {
            start.y.max(end.y) + self.minimal_edge_level_distance
        } else {
            start.y.min(end.y) - self.minimal_edge_level_distance
        };
        vec![
            start,
            point3(start.x, y, start.z),
            point3(end.x, y, end.z),
            end,
        ]
    }
}

/// Where an edge attaches to a block: the center of its roof, or of its ground when edges
/// run below the blocks.
pub(crate) fn anchor(node: &LayoutNode, above: bool) -> Point3 {
    if above { node.roof() } else { node.ground() }
}
