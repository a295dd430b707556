//! The render-object hierarchy handed to a renderer.
//!
//! A [`Scene`] is an arena of [`RenderObject`]s. Positions and scales are in world space;
//! re-parenting an object never moves it.

use crate::element::Shape;
use crate::error::{Error, Result};
use crate::geom::{Point3, Size3};
use crate::settings::Color;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectTag {
    /// Caller-provided container, e.g. the object a graph is drawn into.
    Group,
    /// The drawing plane underneath a drawn graph.
    Plane,
    Node,
    Edge,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderObject {
    pub name: String,
    pub tag: ObjectTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    /// Center of the bounding volume.
    pub position: Point3,
    /// World-space extent.
    pub scale: Size3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Route of an edge object; empty for everything else.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Point3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectId>,
}

impl RenderObject {
    pub fn new(name: impl Into<String>, tag: ObjectTag, position: Point3, scale: Size3) -> Self {
        Self {
            name: name.into(),
            tag,
            node_id: None,
            shape: None,
            position,
            scale,
            style: None,
            color: None,
            path: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>, position: Point3, scale: Size3) -> Self {
        Self::new(name, ObjectTag::Group, position, scale)
    }

    /// Top face height.
    pub fn roof_y(&self) -> f64 {
        self.position.y + self.scale.height / 2.0
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Scene {
    objects: Vec<RenderObject>,
    #[serde(skip)]
    by_node: FxHashMap<String, ObjectId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Adds a detached object. An object carrying a `node_id` becomes the object of that node.
    pub fn add(&mut self, object: RenderObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        if let Some(node_id) = &object.node_id {
            self.by_node.insert(node_id.clone(), id);
        }
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Result<&RenderObject> {
        self.objects
            .get(id.0)
            .ok_or(Error::UnknownObject { id: id.0 })
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut RenderObject> {
        self.objects
            .get_mut(id.0)
            .ok_or(Error::UnknownObject { id: id.0 })
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &RenderObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn object_for_node(&self, node_id: &str) -> Option<ObjectId> {
        self.by_node.get(node_id).copied()
    }

    /// Moves `child` under `parent`, detaching it from its previous parent.
    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) -> Result<()> {
        self.get(parent)?;
        let previous = self.get(child)?.parent;
        if let Some(previous) = previous {
            self.objects[previous.0].children.retain(|&c| c != child);
        }
        self.objects[child.0].parent = Some(parent);
        self.objects[parent.0].children.push(child);
        Ok(())
    }

    pub fn children(&self, id: ObjectId) -> Result<&[ObjectId]> {
        Ok(&self.get(id)?.children)
    }

    /// First child of `parent` carrying `tag`.
    pub fn find_child(&self, parent: ObjectId, tag: ObjectTag) -> Result<Option<ObjectId>> {
        Ok(self
            .children(parent)?
            .iter()
            .copied()
            .find(|&c| self.objects[c.0].tag == tag))
    }

    /// Nearest proper ancestor of `id` carrying `tag`.
    pub fn enclosing(&self, id: ObjectId, tag: ObjectTag) -> Result<Option<ObjectId>> {
        let mut cursor = self.get(id)?.parent;
        while let Some(p) = cursor {
            let object = self.get(p)?;
            if object.tag == tag {
                return Ok(Some(p));
            }
            cursor = object.parent;
        }
        Ok(None)
    }

    /// All objects tagged `tag`, in creation order.
    pub fn tagged(&self, tag: ObjectTag) -> impl Iterator<Item = (ObjectId, &RenderObject)> {
        self.objects().filter(move |(_, o)| o.tag == tag)
    }
}
