//! Whole-set geometry operations on layout nodes: bounding boxes, scaling, moving and
//! stacking.
//!
//! All operations take the arena plus the members they apply to, so that a pass can treat
//! the drawing canvas separately from the nodes laid out on it.

use crate::element::FactoryTable;
use crate::error::Result;
use crate::geom::{Point2, Point3, point2, point3};
use crate::layout_node::{LayoutIx, LayoutNodes};
use serde::Serialize;

/// A rectangle on the drawing plane. `x` of the corners is world x, `y` is world z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingArea {
    pub left_front: Point2,
    pub right_back: Point2,
}

impl DrawingArea {
    pub fn zero() -> Self {
        Self {
            left_front: point2(0.0, 0.0),
            right_back: point2(0.0, 0.0),
        }
    }

    /// The area of the given footprint centered at `(x, z)`.
    pub fn around(x: f64, z: f64, width: f64, depth: f64) -> Self {
        Self {
            left_front: point2(x - width / 2.0, z - depth / 2.0),
            right_back: point2(x + width / 2.0, z + depth / 2.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.right_back.x - self.left_front.x
    }

    pub fn depth(&self) -> f64 {
        self.right_back.y - self.left_front.y
    }

    pub fn center(&self) -> Point2 {
        self.left_front.lerp(self.right_back, 0.5)
    }

    pub fn contains(&self, other: &DrawingArea) -> bool {
        self.left_front.x <= other.left_front.x
            && self.left_front.y <= other.left_front.y
            && other.right_back.x <= self.right_back.x
            && other.right_back.y <= self.right_back.y
    }

    pub fn union(&self, other: &DrawingArea) -> DrawingArea {
        DrawingArea {
            left_front: self.left_front.min(other.left_front),
            right_back: self.right_back.max(other.right_back),
        }
    }
}

/// Bounding rectangle of `members` on the drawing plane. The extent of each node is the one
/// its factory reports for the node's scale; an empty set yields the zero area at the origin.
pub fn bounding_box(
    nodes: &LayoutNodes,
    members: &[LayoutIx],
    factories: &FactoryTable,
) -> Result<DrawingArea> {
    let mut area: Option<DrawingArea> = None;
    for &ix in members {
        let node = nodes.get(ix);
        let factory = factories.for_type(node.id(), node.node_type())?;
        let size = factory.size_of(node.get_size());
        let center = node.center_position();
        let this = DrawingArea::around(center.x, center.z, size.width, size.depth);
        area = Some(match area {
            Some(area) => area.union(&this),
            None => this,
        });
    }
    Ok(area.unwrap_or_else(DrawingArea::zero))
}

/// Lower-left-front and upper-right-back corners of the box enclosing `members`.
pub fn bounding_box_3d(nodes: &LayoutNodes, members: &[LayoutIx]) -> (Point3, Point3) {
    let mut corners: Option<(Point3, Point3)> = None;
    for &ix in members {
        let node = nodes.get(ix);
        let center = node.center_position();
        let half = node.get_size() / 2.0;
        let lo = point3(center.x - half.width, center.y - half.height, center.z - half.depth);
        let hi = point3(center.x + half.width, center.y + half.height, center.z + half.depth);
        corners = Some(match corners {
            Some((min, max)) => (min.min(lo), max.max(hi)),
            None => (lo, hi),
        });
    }
    corners.unwrap_or((Point3::origin(), Point3::origin()))
}

/// Multiplies the extent and the position of every member by `factor`.
pub fn scale(nodes: &mut LayoutNodes, members: &[LayoutIx], factor: f64) {
    for &ix in members {
        let node = nodes.get_mut(ix);
        node.scale_by(factor);
        let center = node.center_position();
        node.set_center_position(center * factor);
    }
}

/// Scales `members` uniformly so that their bounding box fits into `width` x `depth`.
/// Returns the factor applied; a set without horizontal extent is left as is.
pub fn scale_to_fit(nodes: &mut LayoutNodes, members: &[LayoutIx], width: f64, depth: f64) -> f64 {
    let (min, max) = bounding_box_3d(nodes, members);
    let current_width = max.x - min.x;
    let current_depth = max.z - min.z;

    let mut factor = f64::INFINITY;
    if current_width > 0.0 {
        factor = factor.min(width / current_width);
    }
    if current_depth > 0.0 {
        factor = factor.min(depth / current_depth);
    }
    if !factor.is_finite() || factor <= 0.0 {
        return 1.0;
    }
    scale(nodes, members, factor);
    factor
}

/// Translates `members` so that the center of their bounding box lands on `target`.
pub fn move_to(nodes: &mut LayoutNodes, members: &[LayoutIx], target: Point3) {
    if members.is_empty() {
        return;
    }
    let (min, max) = bounding_box_3d(nodes, members);
    let offset = target - min.lerp(max, 0.5);
    for &ix in members {
        let node = nodes.get_mut(ix);
        let center = node.center_position();
        node.set_center_position(center + offset);
    }
}

/// Puts the ground of every root of the arena on `ground` and every child `delta` above the
/// roof of its parent. Horizontal positions are kept.
pub fn stack(nodes: &mut LayoutNodes, ground: f64, delta: f64) {
    let mut pending: Vec<(LayoutIx, f64)> =
        nodes.roots().into_iter().rev().map(|ix| (ix, ground)).collect();
    while let Some((ix, ground)) = pending.pop() {
        let roof = put_on(nodes, ix, ground);
        for &child in nodes.get(ix).children().iter().rev() {
            pending.push((child, roof + delta));
        }
    }
}

fn put_on(nodes: &mut LayoutNodes, ix: LayoutIx, ground: f64) -> f64 {
    let node = nodes.get_mut(ix);
    let half = node.get_size().height / 2.0;
    let center = node.center_position();
    node.set_center_position(point3(center.x, ground + half, center.z));
    ground + 2.0 * half
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geom::size3;
    use crate::scene::{ObjectTag, RenderObject, Scene};
    use crate::settings::LayoutSettings;
    use strata_graph::Graph;

    struct Fixture {
        nodes: LayoutNodes,
        all: Vec<LayoutIx>,
    }

    // a (Cluster) contains b (Cluster) contains c (Component); d is a second root.
    fn fixture() -> Fixture {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Cluster").unwrap();
        let c = g.add_node("c", "Component").unwrap();
        let d = g.add_node("d", "Cluster").unwrap();
        g.add_child(a, b).unwrap();
        g.add_child(b, c).unwrap();

        let geometry = [
            (a, point3(0.0, 0.0, 0.0), size3(4.0, 0.5, 2.0)),
            (b, point3(0.5, 0.0, 0.0), size3(2.0, 0.5, 1.0)),
            (c, point3(1.0, 0.0, 0.0), size3(0.5, 1.0, 0.5)),
            (d, point3(5.0, 0.0, 3.0), size3(1.0, 0.25, 1.0)),
        ];
        let mut scene = Scene::new();
        let objects: Vec<_> = geometry
            .iter()
            .map(|&(ix, position, scale)| {
                let id = g.node(ix).id().to_string();
                (ix, scene.add(RenderObject::new(id, ObjectTag::Node, position, scale)))
            })
            .collect();
        let factories = FactoryTable::from_settings(&LayoutSettings::default());
        let nodes = LayoutNodes::from_objects(
            &g,
            &scene,
            &factories,
            objects.iter().map(|(n, o)| (n, o)),
        )
        .unwrap();
        let all = objects.iter().filter_map(|(n, _)| nodes.ix_of(*n)).collect();
        Fixture { nodes, all }
    }

    #[test]
    fn bounding_box_contains_every_node() {
        let f = fixture();
        let factories = FactoryTable::from_settings(&LayoutSettings::default());
        let area = bounding_box(&f.nodes, &f.all, &factories).unwrap();
        assert!(area.left_front.x <= area.right_back.x);
        assert!(area.left_front.y <= area.right_back.y);
        assert_eq!(area.left_front, point2(-2.0, -1.0));
        assert_eq!(area.right_back, point2(5.5, 3.5));
        for &ix in &f.all {
            let n = f.nodes.get(ix);
            let c = n.center_position();
            let s = n.get_size();
            let own = DrawingArea::around(c.x, c.z, s.width, s.depth);
            assert!(area.contains(&own), "{} escapes the bounding box", n.id());
        }
    }

    #[test]
    fn bounding_box_of_nothing_is_the_origin() {
        let f = fixture();
        let factories = FactoryTable::from_settings(&LayoutSettings::default());
        let area = bounding_box(&f.nodes, &[], &factories).unwrap();
        assert_eq!(area, DrawingArea::zero());
        assert_eq!(area.width(), 0.0);
        assert_eq!(bounding_box_3d(&f.nodes, &[]).0, Point3::origin());
    }

    #[test]
    fn unknown_types_never_enter_the_arena() {
        let mut g = Graph::new("g");
        let x = g.add_node("x", "Unknown").unwrap();
        let mut scene = Scene::new();
        let object = scene.add(RenderObject::new(
            "x",
            ObjectTag::Node,
            Point3::origin(),
            size3(1.0, 1.0, 1.0),
        ));
        let factories = FactoryTable::from_settings(&LayoutSettings::default());
        let mut nodes = LayoutNodes::new();
        let err = nodes.wrap(&g, &scene, &factories, x, object).unwrap_err();
        assert!(matches!(err, Error::UnknownElementType { .. }));
        assert!(nodes.is_empty());
    }

    #[test]
    fn scale_to_fit_keeps_proportions() {
        let mut f = fixture();
        let before: Vec<_> = f.all.iter().map(|&ix| f.nodes.get(ix).get_size()).collect();
        let factor = scale_to_fit(&mut f.nodes, &f.all, 1.0, 1.0);
        let (min, max) = bounding_box_3d(&f.nodes, &f.all);
        assert!(max.x - min.x <= 1.0 + 1e-9);
        assert!(max.z - min.z <= 1.0 + 1e-9);
        for (ix, size) in f.all.iter().zip(before) {
            let after = f.nodes.get(*ix).get_size();
            assert!((after.width - size.width * factor).abs() < 1e-12);
            assert!((after.height / after.width - size.height / size.width).abs() < 1e-12);
        }
    }

    #[test]
    fn move_to_keeps_relative_offsets() {
        let mut f = fixture();
        let a = f.all[0];
        let d = f.all[3];
        let gap = f.nodes.get(d).center_position() - f.nodes.get(a).center_position();
        move_to(&mut f.nodes, &f.all, point3(10.0, 1.0, -10.0));
        let (min, max) = bounding_box_3d(&f.nodes, &f.all);
        let center = min.lerp(max, 0.5);
        assert!((center - point3(10.0, 1.0, -10.0)).length() < 1e-12);
        let moved = f.nodes.get(d).center_position() - f.nodes.get(a).center_position();
        assert!((moved - gap).length() < 1e-12);
    }

    #[test]
    fn stack_puts_children_on_their_parents() {
        let mut f = fixture();
        stack(&mut f.nodes, 1.0, 0.01);
        let [a, b, c, d] = [f.all[0], f.all[1], f.all[2], f.all[3]];
        assert!((f.nodes.get(a).ground().y - 1.0).abs() < 1e-12);
        assert!((f.nodes.get(d).ground().y - 1.0).abs() < 1e-12);
        let roof_a = f.nodes.get(a).roof().y;
        assert!((f.nodes.get(b).ground().y - (roof_a + 0.01)).abs() < 1e-12);
        let roof_b = f.nodes.get(b).roof().y;
        assert!((f.nodes.get(c).ground().y - (roof_b + 0.01)).abs() < 1e-12);
        // x and z are untouched
        assert_eq!(f.nodes.get(c).center_position().x, 1.0);
    }

    #[test]
    fn stack_is_idempotent() {
        let mut f = fixture();
        stack(&mut f.nodes, 0.25, 0.001);
        let first: Vec<_> = f.all.iter().map(|&ix| f.nodes.get(ix).center_position()).collect();
        stack(&mut f.nodes, 0.25, 0.001);
        let second: Vec<_> = f.all.iter().map(|&ix| f.nodes.get(ix).center_position()).collect();
        assert_eq!(first, second);
    }
}
