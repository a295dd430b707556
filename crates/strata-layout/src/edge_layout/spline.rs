use super::LayoutEdge;
use super::curve;
use super::straight::anchor;
use crate::geom::{Point3, point3};
use crate::layout_node::LayoutNodes;

/// A single arc per edge, lifted over (or under) both endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineEdges {
    pub edges_above_blocks: bool,
    pub minimal_edge_level_distance: f64,
    pub rdp: f64,
    pub segments: usize,
}

impl SplineEdges {
    pub fn new(
        edges_above_blocks: bool,
        minimal_edge_level_distance: f64,
        rdp: f64,
        segments: usize,
    ) -> Self {
        Self {
            edges_above_blocks,
            minimal_edge_level_distance,
            rdp,
            segments,
        }
    }

    pub fn route(&self, nodes: &LayoutNodes, edge: &LayoutEdge) -> Vec<Point3> {
        let start = anchor(nodes.get(edge.source), self.edges_above_blocks);
        let end = anchor(nodes.get(edge.target), self.edges_above_blocks);
        let mid = start.lerp(end, 0.5);
        let y = if self.edges_above_blocks {
            start.y.max(end.y) + self.minimal_edge_level_distance
        } else {
            start.y.min(end.y) - self.minimal_edge_level_distance
        };
        let controls = [start, point3(mid.x, y, mid.z), end];
        curve::simplify(&curve::bezier(&controls, self.segments), self.rdp)
    }
}
