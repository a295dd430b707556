//! The layout orchestrator.
//!
//! [`GraphRenderer::draw`] runs a full layout pass over a graph and produces render objects
//! for all of its nodes and edges inside a caller-provided parent object.
//! [`GraphRenderer::draw_edge`] adds a single edge to an already drawn graph without moving
//! anything else. All state of a pass lives on the stack of these calls; a renderer can be
//! reused for any number of graphs and scenes.

use crate::edge_layout::{EdgeFactory, LayoutEdge, RoutedEdge};
use crate::element::{FactoryTable, Shape};
use crate::error::{Error, Result};
use crate::geom::{Point3, point3, size3};
use crate::geometry::{self, DrawingArea};
use crate::hierarchy::{self, HierarchyReport};
use crate::layout_node::{LayoutIx, LayoutNodes};
use crate::node_layout::NodeLayout;
use crate::root::{self, SyntheticRoot};
use crate::scene::{ObjectId, ObjectTag, RenderObject, Scene};
use crate::settings::{Color, LayoutSettings};
use crate::style;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use strata_graph::{EdgeIx, Graph, NodeIx, NodeRef, alg};
use tracing::{debug, info};

/// Edge type of edges added through [`GraphRenderer::draw_edge`].
pub const UNKNOWN_EDGE_TYPE: &str = "UNKNOWNTYPE";

/// The plane a graph is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingPlane {
    pub object: ObjectId,
    pub area: DrawingArea,
    /// Height of the center of the plane.
    pub y: f64,
}

#[derive(Debug)]
pub struct DrawOutput {
    pub plane: DrawingPlane,
    pub root: SyntheticRoot,
    /// Render object of every node, in graph order; a synthetic root comes last.
    pub nodes: IndexMap<NodeIx, ObjectId>,
    pub edges: Vec<RoutedEdge>,
    /// Render object of every routed edge, parallel to `edges`.
    pub edge_objects: Vec<ObjectId>,
    pub hierarchy: HierarchyReport,
}

#[derive(Debug)]
pub struct DrawnEdge {
    pub edge: EdgeIx,
    /// `None` when edges are not laid out at all.
    pub routed: Option<RoutedEdge>,
    pub object: Option<ObjectId>,
}

#[derive(Debug)]
pub struct GraphRenderer {
    settings: LayoutSettings,
    factories: FactoryTable,
    edges: EdgeFactory,
}

impl GraphRenderer {
    pub fn new(settings: LayoutSettings) -> Self {
        let factories = FactoryTable::from_settings(&settings);
        Self::with_factories(settings, factories)
    }

    pub fn with_factories(settings: LayoutSettings, factories: FactoryTable) -> Self {
        let edges = EdgeFactory::from_settings(&settings.edge_layout);
        Self {
            settings,
            factories,
            edges,
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn factories(&self) -> &FactoryTable {
        &self.factories
    }

    /// Lays out and draws `graph` below `parent`. The graph gains a synthetic root if it has
    /// more than one root node.
    pub fn draw(
        &self,
        graph: &mut Graph,
        scene: &mut Scene,
        parent: ObjectId,
        layout: &dyn NodeLayout,
    ) -> Result<DrawOutput> {
        scene.get(parent)?;
        if graph.is_empty() {
            info!(graph = graph.name(), "graph has no nodes; drawing an empty canvas");
            return self.prepare_new_graph(graph, scene, parent);
        }
        info!(
            graph = graph.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            layout = layout.name(),
            "drawing graph"
        );

        // A node of unknown type must leave the scene untouched.
        for (_, node) in graph.nodes() {
            self.factories.for_node(node)?;
        }
        let mut objects = IndexMap::with_capacity(graph.node_count() + 1);
        for node in graph.node_indices() {
            objects.insert(node, self.draw_node(graph, scene, node)?);
        }

        let root = root::ensure_single_root(graph)?;
        if let SyntheticRoot::Created(node) = root {
            objects.insert(node, self.draw_node(graph, scene, node)?);
        }

        let mut nodes = LayoutNodes::from_objects(graph, scene, &self.factories, &objects)?;
        layout.apply(&mut nodes)?;

        let parent_object = scene.get(parent)?;
        let center = parent_object.position;
        let footprint = parent_object.scale;
        let plane_y = parent_object.roof_y() + self.settings.level_distance;

        let content: Vec<LayoutIx> = nodes
            .indices()
            .filter(|&ix| !nodes.get(ix).is_canvas())
            .collect();
        let canvas: Option<LayoutIx> = self.canvas(graph, root).and_then(|n| nodes.ix_of(n));
        let max = self.settings.max_root_footprint;
        let (width, depth) = match canvas {
            Some(_) => (footprint.width.min(max.width), footprint.depth.min(max.depth)),
            None => (footprint.width, footprint.depth),
        };
        let factor = geometry::scale_to_fit(&mut nodes, &content, width, depth);
        geometry::move_to(&mut nodes, &content, point3(center.x, plane_y, center.z));
        debug!(factor, "fitted nodes into the parent footprint");

        let mut area = geometry::bounding_box(&nodes, &content, &self.factories)?;
        if canvas.is_some() {
            area = area.union(&DrawingArea::around(center.x, center.z, max.width, max.depth));
        }
        let plane = self.add_drawing_plane_if_necessary(scene, parent, area, plane_y)?;

        geometry::stack(
            &mut nodes,
            self.ground_level(&plane),
            self.settings.level_distance,
        );
        if let Some(canvas) = canvas {
            let node = nodes.get_mut(canvas);
            let height = node.get_size().height;
            let y = node.center_position().y;
            node.set_scale(size3(max.width, height, max.depth));
            node.set_center_position(point3(center.x, y, center.z));
        }
        nodes.write_back(scene)?;

        let hierarchy = hierarchy::build_hierarchy(graph, scene, &objects, plane.object);

        let members: FxHashSet<NodeIx> = objects.keys().copied().collect();
        let layout_edges = layout_edges(graph, &nodes, &alg::connecting_edges(graph, &members));
        let edges = self.edges.draw_edges(&nodes, &layout_edges);
        let edge_objects = edges
            .iter()
            .map(|edge| add_edge_object(scene, Some(plane.object), edge))
            .collect::<Result<Vec<_>>>()?;

        style::refresh_styles(graph, scene, &objects, &self.factories)?;

        info!(
            graph = graph.name(),
            objects = objects.len(),
            edges = edges.len(),
            hierarchy_errors = hierarchy.errors.len(),
            "graph drawn"
        );
        Ok(DrawOutput {
            plane,
            root,
            nodes: objects,
            edges,
            edge_objects,
            hierarchy,
        })
    }

    /// Draws the canvas of a graph without nodes: a synthetic root at the maximal footprint
    /// on a drawing plane.
    pub fn prepare_new_graph(
        &self,
        graph: &mut Graph,
        scene: &mut Scene,
        parent: ObjectId,
    ) -> Result<DrawOutput> {
        let (root, node) = match root::ensure_single_root(graph)? {
            SyntheticRoot::Created(node) => (SyntheticRoot::Created(node), node),
            SyntheticRoot::Existing(node) => (SyntheticRoot::Existing(node), node),
            SyntheticRoot::NotNeeded => {
                let node = root::add_synthetic_root(graph)?;
                (SyntheticRoot::Created(node), node)
            }
        };
        let object = self.draw_node(graph, scene, node)?;

        let parent_object = scene.get(parent)?;
        let center = parent_object.position;
        let plane_y = parent_object.roof_y() + self.settings.level_distance;
        let max = self.settings.max_root_footprint;
        let area = DrawingArea::around(center.x, center.z, max.width, max.depth);
        let plane = self.add_drawing_plane_if_necessary(scene, parent, area, plane_y)?;

        let ground = self.ground_level(&plane);
        let canvas = scene.get_mut(object)?;
        let height = canvas.scale.height;
        canvas.scale = size3(max.width, height, max.depth);
        canvas.position = point3(center.x, ground + height / 2.0, center.z);

        let objects = IndexMap::from([(node, object)]);
        let hierarchy = hierarchy::build_hierarchy(graph, scene, &objects, plane.object);
        style::refresh_styles(graph, scene, &objects, &self.factories)?;
        Ok(DrawOutput {
            plane,
            root,
            nodes: objects,
            edges: Vec::new(),
            edge_objects: Vec::new(),
            hierarchy,
        })
    }

    /// Adds an edge from `source` to `target` to a graph drawn before and routes only that
    /// edge. Node geometry is read, never written. Nothing is changed when the endpoints are
    /// invalid.
    pub fn draw_edge(
        &self,
        graph: &mut Graph,
        scene: &mut Scene,
        source: NodeRef,
        target: NodeRef,
        id: Option<&str>,
    ) -> Result<DrawnEdge> {
        if source.graph != target.graph {
            return Err(Error::CrossGraphReference {
                source_id: describe(graph, source),
                target_id: describe(graph, target),
            });
        }
        let s = graph.resolve(source)?;
        let t = graph.resolve(target)?;

        let closure = alg::ancestor_closure(graph, &[s, t]);
        let mut objects = IndexMap::with_capacity(closure.len());
        for node in closure {
            let node_id = graph.node(node).id();
            let object = scene
                .object_for_node(node_id)
                .ok_or_else(|| Error::NotDrawn {
                    node_id: node_id.to_string(),
                })?;
            objects.insert(node, object);
        }
        let nodes = LayoutNodes::from_objects(graph, scene, &self.factories, &objects)?;
        let (Some(ls), Some(lt)) = (nodes.ix_of(s), nodes.ix_of(t)) else {
            return Err(Error::NotDrawn {
                node_id: graph.node(s).id().to_string(),
            });
        };

        let edge = graph.add_edge(source, target, id, UNKNOWN_EDGE_TYPE)?;
        let layout_edge = LayoutEdge {
            source: ls,
            target: lt,
            edge,
            id: graph
                .edge(edge)
                .map(|e| e.id().to_string())
                .unwrap_or_default(),
        };
        let routed = self.edges.draw_edges(&nodes, &[layout_edge]).into_iter().next();
        let object = match &routed {
            Some(routed) => {
                let plane = scene.enclosing(objects[&s], ObjectTag::Plane)?;
                Some(add_edge_object(scene, plane, routed)?)
            }
            None => None,
        };
        debug!(
            edge = graph.edge(edge).map(|e| e.id()).unwrap_or_default(),
            routed = routed.is_some(),
            "drew single edge"
        );
        Ok(DrawnEdge {
            edge,
            routed,
            object,
        })
    }

    /// Creates the unstyled render object of one node at the origin with its factory's unit
    /// scale.
    pub fn draw_node(&self, graph: &Graph, scene: &mut Scene, node: NodeIx) -> Result<ObjectId> {
        let node = graph.node(node);
        let factory = self.factories.for_node(node)?;
        let mut object =
            RenderObject::new(node.id(), ObjectTag::Node, Point3::origin(), factory.unit());
        object.node_id = Some(node.id().to_string());
        object.shape = Some(factory.shape());
        Ok(scene.add(object))
    }

    /// Re-applies styles to all drawn nodes, e.g. after the color settings changed.
    pub fn refresh_styles(
        &self,
        graph: &Graph,
        scene: &mut Scene,
        objects: &IndexMap<NodeIx, ObjectId>,
    ) -> Result<()> {
        style::refresh_styles(graph, scene, objects, &self.factories)
    }

    /// The node that is resized to the maximal footprint: the synthetic root, or the single
    /// real root if so configured.
    fn canvas(&self, graph: &Graph, root: SyntheticRoot) -> Option<NodeIx> {
        if let Some(node) = root.node() {
            return Some(node);
        }
        if !self.settings.resize_single_root {
            return None;
        }
        match graph.roots().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    fn ground_level(&self, plane: &DrawingPlane) -> f64 {
        plane.y + self.settings.level_distance / 2.0 + self.settings.level_distance
    }

    /// Returns the drawing plane below `parent`, creating it over `area` at height `y` if
    /// there is none yet.
    fn add_drawing_plane_if_necessary(
        &self,
        scene: &mut Scene,
        parent: ObjectId,
        area: DrawingArea,
        y: f64,
    ) -> Result<DrawingPlane> {
        if let Some(existing) = scene.find_child(parent, ObjectTag::Plane)? {
            let plane = scene.get(existing)?;
            let p = plane.position;
            return Ok(DrawingPlane {
                object: existing,
                area: DrawingArea::around(p.x, p.z, plane.scale.width, plane.scale.depth),
                y: p.y,
            });
        }
        let center = area.center();
        let mut plane = RenderObject::new(
            "Drawing plane",
            ObjectTag::Plane,
            point3(center.x, y, center.y),
            size3(area.width(), self.settings.level_distance, area.depth()),
        );
        plane.shape = Some(Shape::Plane);
        plane.color = Some(Color::WHITE);
        let object = scene.add(plane);
        scene.set_parent(object, parent)?;
        Ok(DrawingPlane { object, area, y })
    }
}

fn layout_edges(graph: &Graph, nodes: &LayoutNodes, edges: &[EdgeIx]) -> Vec<LayoutEdge> {
    edges
        .iter()
        .filter_map(|&ix| {
            let edge = graph.edge(ix)?;
            Some(LayoutEdge {
                source: nodes.ix_of(edge.source())?,
                target: nodes.ix_of(edge.target())?,
                edge: ix,
                id: edge.id().to_string(),
            })
        })
        .collect()
}

fn add_edge_object(
    scene: &mut Scene,
    parent: Option<ObjectId>,
    edge: &RoutedEdge,
) -> Result<ObjectId> {
    let (min, max) = edge.points.iter().fold(
        (
            point3(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            point3(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    let (position, scale) = if edge.points.is_empty() {
        (Point3::origin(), size3(0.0, 0.0, 0.0))
    } else {
        let extent = max - min;
        (min.lerp(max, 0.5), size3(extent.x, extent.y, extent.z))
    };
    let mut object = RenderObject::new(edge.id.clone(), ObjectTag::Edge, position, scale);
    object.path = edge.points.clone();
    let id = scene.add(object);
    if let Some(parent) = parent {
        scene.set_parent(id, parent)?;
    }
    Ok(id)
}

/// Names a node handle for diagnostics, falling back to its raw index for foreign handles.
fn describe(graph: &Graph, node: NodeRef) -> String {
    if node.graph == graph.id() {
        if let Some(n) = graph.try_node(node.node) {
            return n.id().to_string();
        }
    }
    format!("{}:{}", node.graph, node.node.index())
}
