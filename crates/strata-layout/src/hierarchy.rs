//! Mirrors the node hierarchy in the render-object hierarchy.

use crate::error::Error;
use crate::scene::{ObjectId, Scene};
use indexmap::IndexMap;
use strata_graph::{Graph, NodeIx};
use tracing::warn;

/// Outcome of [`build_hierarchy`]: how many objects were attached and what went wrong for
/// the others.
#[derive(Debug, Default)]
pub struct HierarchyReport {
    pub attached: usize,
    pub errors: Vec<Error>,
}

impl HierarchyReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Attaches the object of every node below the object of its parent node, and the objects
/// of root nodes below `root`. A node whose parent has no object is reported and skipped;
/// the remaining nodes are still attached.
pub fn build_hierarchy(
    graph: &Graph,
    scene: &mut Scene,
    objects: &IndexMap<NodeIx, ObjectId>,
    root: ObjectId,
) -> HierarchyReport {
    objects
        .iter()
        .fold(HierarchyReport::default(), |mut report, (&node, &object)| {
            let n = graph.node(node);
            let attached = match n.parent() {
                Some(parent) => match objects.get(&parent) {
                    Some(&parent_object) => scene.set_parent(object, parent_object),
                    None => Err(Error::InconsistentHierarchy {
                        node_id: n.id().to_string(),
                        parent_id: graph.node(parent).id().to_string(),
                    }),
                },
                None => scene.set_parent(object, root),
            };
            match attached {
                Ok(()) => report.attached += 1,
                Err(err) => {
                    warn!(node = n.id(), "{err}");
                    report.errors.push(err);
                }
            }
            report
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point3, size3};
    use crate::scene::{ObjectTag, RenderObject};

    fn object(scene: &mut Scene, name: &str) -> ObjectId {
        scene.add(RenderObject::new(
            name,
            ObjectTag::Node,
            point3(0.0, 0.0, 0.0),
            size3(1.0, 1.0, 1.0),
        ))
    }

    #[test]
    fn mirrors_the_node_tree() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Component").unwrap();
        let c = g.add_node("c", "Component").unwrap();
        g.add_child(a, b).unwrap();

        let mut scene = Scene::new();
        let plane = scene.add(RenderObject::new(
            "plane",
            ObjectTag::Plane,
            point3(0.0, 0.0, 0.0),
            size3(1.0, 0.0, 1.0),
        ));
        let objects: IndexMap<_, _> = [a, b, c]
            .into_iter()
            .map(|n| (n, object(&mut scene, g.node(n).id())))
            .collect();

        let report = build_hierarchy(&g, &mut scene, &objects, plane);
        assert!(report.is_ok());
        assert_eq!(report.attached, 3);
        assert_eq!(scene.children(plane).unwrap(), &[objects[&a], objects[&c]]);
        assert_eq!(scene.get(objects[&b]).unwrap().parent, Some(objects[&a]));
    }

    #[test]
    fn missing_parent_objects_are_isolated() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Component").unwrap();
        let c = g.add_node("c", "Cluster").unwrap();
        let d = g.add_node("d", "Component").unwrap();
        g.add_child(a, b).unwrap();
        g.add_child(c, d).unwrap();

        let mut scene = Scene::new();
        let root = object(&mut scene, "root");
        // `a` was never drawn
        let objects: IndexMap<_, _> = [b, c, d]
            .into_iter()
            .map(|n| (n, object(&mut scene, g.node(n).id())))
            .collect();

        let report = build_hierarchy(&g, &mut scene, &objects, root);
        assert_eq!(report.attached, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            Error::InconsistentHierarchy { node_id, parent_id } if node_id == "b" && parent_id == "a"
        ));
        assert_eq!(scene.get(objects[&d]).unwrap().parent, Some(objects[&c]));
        assert_eq!(scene.get(objects[&b]).unwrap().parent, None);
    }
}
