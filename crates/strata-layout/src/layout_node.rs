//! Per-pass geometry wrappers around graph nodes.
//!
//! A [`LayoutNodes`] arena is built at the start of a layout pass from the render objects of
//! the nodes taking part in it and is dropped at the end of the pass. Layout nodes copy their
//! initial geometry from the render objects; [`LayoutNodes::write_back`] publishes the result.

use crate::element::{ElementKind, FactoryTable};
use crate::error::{Error, Result};
use crate::geom::{Point3, Size3, point3};
use crate::scene::{ObjectId, Scene};
use rustc_hash::FxHashMap;
use strata_graph::{Graph, NodeIx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutIx(usize);

impl LayoutIx {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    node: NodeIx,
    id: String,
    node_type: String,
    kind: ElementKind,
    level: usize,
    object: ObjectId,
    center: Point3,
    scale: Size3,
    parent: Option<LayoutIx>,
    children: Vec<LayoutIx>,
}

impl LayoutNode {
    pub fn node(&self) -> NodeIx {
        self.node
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The synthetic root is the drawing canvas; it is sized by the renderer, not laid out.
    pub fn is_canvas(&self) -> bool {
        self.kind == ElementKind::Root
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn get_size(&self) -> Size3 {
        self.scale
    }

    pub fn center_position(&self) -> Point3 {
        self.center
    }

    pub fn set_center_position(&mut self, center: Point3) {
        self.center = center;
    }

    pub fn set_scale(&mut self, scale: Size3) {
        self.scale = scale;
    }

    pub fn scale_by(&mut self, factor: f64) {
        self.scale = self.scale * factor;
    }

    /// Center of the top face.
    pub fn roof(&self) -> Point3 {
        point3(self.center.x, self.center.y + self.scale.height / 2.0, self.center.z)
    }

    /// Center of the bottom face.
    pub fn ground(&self) -> Point3 {
        point3(self.center.x, self.center.y - self.scale.height / 2.0, self.center.z)
    }

    /// Parent within the same pass; `None` for roots and for nodes whose parent was not
    /// wrapped.
    pub fn parent(&self) -> Option<LayoutIx> {
        self.parent
    }

    pub fn children(&self) -> &[LayoutIx] {
        &self.children
    }
}

#[derive(Debug, Default, Clone)]
pub struct LayoutNodes {
    nodes: Vec<LayoutNode>,
    by_node: FxHashMap<NodeIx, LayoutIx>,
}

impl LayoutNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps every `(node, object)` pair and links parents and children among them.
    pub fn from_objects<'a>(
        graph: &Graph,
        scene: &Scene,
        factories: &FactoryTable,
        objects: impl IntoIterator<Item = (&'a NodeIx, &'a ObjectId)>,
    ) -> Result<Self> {
        let mut out = Self::new();
        for (&node, &object) in objects {
            out.wrap(graph, scene, factories, node, object)?;
        }
        out.link(graph);
        Ok(out)
    }

    /// Wraps one node. The node's type must resolve to a factory, and the node must not have
    /// been wrapped before in this arena.
    pub fn wrap(
        &mut self,
        graph: &Graph,
        scene: &Scene,
        factories: &FactoryTable,
        node: NodeIx,
        object: ObjectId,
    ) -> Result<LayoutIx> {
        let n = graph.node(node);
        if self.by_node.contains_key(&node) {
            return Err(Error::AlreadyWrapped {
                node_id: n.id().to_string(),
            });
        }
        let kind = factories.for_node(n)?.kind();
        let render = scene.get(object)?;

        let ix = LayoutIx(self.nodes.len());
        self.nodes.push(LayoutNode {
            node,
            id: n.id().to_string(),
            node_type: n.node_type().to_string(),
            kind,
            level: n.level(),
            object,
            center: render.position,
            scale: render.scale,
            parent: None,
            children: Vec::new(),
        });
        self.by_node.insert(node, ix);
        Ok(ix)
    }

    /// Recomputes parent/children links from the graph, restricted to wrapped nodes.
    pub fn link(&mut self, graph: &Graph) {
        for i in 0..self.nodes.len() {
            let parent = graph
                .node(self.nodes[i].node)
                .parent()
                .and_then(|p| self.by_node.get(&p).copied());
            self.nodes[i].parent = parent;
            self.nodes[i].children.clear();
        }
        for i in 0..self.nodes.len() {
            if let Some(parent) = self.nodes[i].parent {
                self.nodes[parent.0].children.push(LayoutIx(i));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, ix: LayoutIx) -> &LayoutNode {
        &self.nodes[ix.0]
    }

    pub fn get_mut(&mut self, ix: LayoutIx) -> &mut LayoutNode {
        &mut self.nodes[ix.0]
    }

    pub fn ix_of(&self, node: NodeIx) -> Option<LayoutIx> {
        self.by_node.get(&node).copied()
    }

    pub fn indices(&self) -> impl Iterator<Item = LayoutIx> + use<> {
        (0..self.nodes.len()).map(LayoutIx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LayoutNode> {
        self.nodes.iter_mut()
    }

    /// Nodes without a wrapped parent.
    pub fn roots(&self) -> Vec<LayoutIx> {
        (0..self.nodes.len())
            .map(LayoutIx)
            .filter(|&ix| self.nodes[ix.0].parent.is_none())
            .collect()
    }

    /// Copies position and scale of every layout node onto its render object.
    pub fn write_back(&self, scene: &mut Scene) -> Result<()> {
        for node in &self.nodes {
            let object = scene.get_mut(node.object)?;
            object.position = node.center;
            object.scale = node.scale;
        }
        Ok(())
    }
}
