//! Hierarchical edge bundling (Holten 2006).
//!
//! The control polygon of an edge follows the node hierarchy from the source up to the lowest
//! common ancestor and back down to the target. Each inner control point hovers over its
//! hierarchy node at a height given by the node's level, so edges leaving the same subtree
//! share control points and are drawn as a bundle. `tension` straightens the polygon before
//! it is sampled as a B-spline.

use super::LayoutEdge;
use super::curve;
use super::straight::anchor;
use crate::geom::{Point3, point3};
use crate::layout_node::{LayoutIx, LayoutNodes};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundledEdges {
    pub edges_above_blocks: bool,
    pub minimal_edge_level_distance: f64,
    pub rdp: f64,
    pub tension: f64,
    pub segments: usize,
}

/// Heights shared by all edges of one call.
struct Levels {
    above: bool,
    max_level: usize,
    distance: f64,
    offset: f64,
}

impl Levels {
    fn new(nodes: &LayoutNodes, above: bool, minimal_distance: f64) -> Self {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        let mut max_height: f64 = 0.0;
        let mut max_level = 0;
        for node in nodes.iter() {
            min_y = min_y.min(node.ground().y);
            max_y = max_y.max(node.roof().y);
            max_height = max_height.max(node.get_size().height);
            max_level = max_level.max(node.level() + 1);
        }
        if nodes.is_empty() {
            min_y = 0.0;
            max_y = 0.0;
        }
        let distance = minimal_distance.max(max_height / 5.0);
        let offset = if above {
            max_y + distance
        } else {
            min_y - distance
        };
        Self {
            above,
            max_level,
            distance,
            offset,
        }
    }

    /// Height of control points hovering over nodes of `level`; deeper levels are closer to
    /// the blocks. `None` is the level above all roots.
    fn height(&self, level: Option<usize>) -> f64 {
        let steps = match level {
            Some(level) => self.max_level.saturating_sub(level) as f64,
            None => self.max_level as f64 + 1.0,
        };
        if self.above {
            self.offset + steps * self.distance
        } else {
            self.offset - steps * self.distance
        }
    }
}

impl BundledEdges {
    pub fn new(
        edges_above_blocks: bool,
        minimal_edge_level_distance: f64,
        rdp: f64,
        tension: f64,
        segments: usize,
    ) -> Self {
        Self {
            edges_above_blocks,
            minimal_edge_level_distance,
            rdp,
            tension: tension.clamp(0.0, 1.0),
            segments,
        }
    }

    pub fn route(&self, nodes: &LayoutNodes, edges: &[LayoutEdge]) -> Vec<Vec<Point3>> {
        if edges.is_empty() {
            return Vec::new();
        }
        let levels = Levels::new(
            nodes,
            self.edges_above_blocks,
            self.minimal_edge_level_distance,
        );
        edges
            .iter()
            .map(|edge| {
                let points = self.route_one(nodes, &levels, edge);
                curve::simplify(&points, self.rdp)
            })
            .collect()
    }

    fn route_one(&self, nodes: &LayoutNodes, levels: &Levels, edge: &LayoutEdge) -> Vec<Point3> {
        let (source, target) = (edge.source, edge.target);
        if source == target {
            return self.self_loop(nodes, levels, source);
        }
        let up = path_to_root(nodes, source);
        let down = path_to_root(nodes, target);
        let Some(lca) = up.iter().copied().find(|v| down.contains(v)) else {
            warn!(
                source = nodes.get(source).id(),
                target = nodes.get(target).id(),
                "no common ancestor; routing the edge above all trees"
            );
            return self.direct(nodes, source, target, levels.height(None));
        };
        if lca == source || lca == target {
            return self.direct(nodes, source, target, levels.offset);
        }

        let up: Vec<LayoutIx> = up.into_iter().take_while(|&v| v != lca).collect();
        let down: Vec<LayoutIx> = down.into_iter().take_while(|&v| v != lca).collect();
        if up.len() == 1 && down.len() == 1 {
            // Siblings are close to each other; a detour over the parent would only hurt.
            return self.direct(nodes, source, target, levels.offset);
        }

        let path = up
            .iter()
            .copied()
            .chain(std::iter::once(lca))
            .chain(down.iter().rev().copied());
        let mut controls: Vec<Point3> = path
            .map(|v| {
                let node = nodes.get(v);
                let c = node.center_position();
                point3(c.x, levels.height(Some(node.level())), c.z)
            })
            .collect();
        let last = controls.len() - 1;
        controls[0] = anchor(nodes.get(source), self.edges_above_blocks);
        controls[last] = anchor(nodes.get(target), self.edges_above_blocks);

        let controls = curve::straighten(&controls, self.tension);
        curve::clamped_bspline(&controls, self.segments)
    }

    fn direct(&self, nodes: &LayoutNodes, source: LayoutIx, target: LayoutIx, y: f64) -> Vec<Point3> {
        let start = anchor(nodes.get(source), self.edges_above_blocks);
        let end = anchor(nodes.get(target), self.edges_above_blocks);
        let mid = start.lerp(end, 0.5);
        let controls = curve::through(start, point3(mid.x, y, mid.z), end);
        curve::bezier(&controls, self.segments)
    }

    fn self_loop(&self, nodes: &LayoutNodes, levels: &Levels, ix: LayoutIx) -> Vec<Point3> {
        let node = nodes.get(ix);
        let center = anchor(node, self.edges_above_blocks);
        let half = node.get_size() / 2.0;
        let start = point3(center.x - half.width, center.y, center.z - half.depth);
        let end = point3(center.x + half.width, center.y, center.z + half.depth);
        let lift = if self.edges_above_blocks {
            levels.distance
        } else {
            -levels.distance
        };
        let middle = point3(center.x, center.y + lift, center.z);
        curve::bezier(&curve::through(start, middle, end), self.segments)
    }
}

/// `ix` followed by its ancestors within the arena.
fn path_to_root(nodes: &LayoutNodes, ix: LayoutIx) -> Vec<LayoutIx> {
    let mut out = vec![ix];
    let mut cursor = nodes.get(ix).parent();
    while let Some(p) = cursor {
        out.push(p);
        cursor = nodes.get(p).parent();
    }
    out
}
