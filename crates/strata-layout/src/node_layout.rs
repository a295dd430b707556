//! Node layout strategies.
//!
//! A [`NodeLayout`] assigns a position and a scale to every layout node of a pass. The
//! canonical strategy, [`LoadedNodeLayout`], reads them from a precomputed layout description:
//!
//! ```json
//! { "nodes": { "<node id>": { "x": 0.0, "z": 0.0, "width": 1.0, "depth": 1.0, "height": 0.1 } } }
//! ```
//!
//! `x`/`z` are the center of the node on the ground plane; `height` is optional and defaults to
//! the height the node was drawn with.

use crate::error::{Error, Result};
use crate::geom::{point3, size3};
use crate::layout_node::LayoutNodes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub trait NodeLayout {
    /// Name used in diagnostics, e.g. the path of the layout description.
    fn name(&self) -> &str;

    /// Assigns position and scale to every node in `nodes`.
    fn apply(&self, nodes: &mut LayoutNodes) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDescription {
    pub nodes: IndexMap<String, NodeEntry>,
}

#[derive(Debug, Clone)]
pub struct LoadedNodeLayout {
    name: String,
    ground_level: f64,
    entries: IndexMap<String, NodeEntry>,
}

impl LoadedNodeLayout {
    pub const GROUND_LEVEL: f64 = 0.0;

    /// Reads a layout description from `path`. A missing file is reported as
    /// [`Error::ResourceNotFound`] before any attempt to read it.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(path.display().to_string(), &text)
    }

    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let description: LayoutDescription =
            serde_json::from_str(text).map_err(|err| Error::InvalidLayoutDescription {
                layout: name.clone(),
                message: err.to_string(),
            })?;
        Ok(Self::from_description(name, description))
    }

    pub fn from_description(name: impl Into<String>, description: LayoutDescription) -> Self {
        Self {
            name: name.into(),
            ground_level: Self::GROUND_LEVEL,
            entries: description.nodes,
        }
    }

    pub fn with_entry(mut self, node_id: impl Into<String>, entry: NodeEntry) -> Self {
        self.entries.insert(node_id.into(), entry);
        self
    }

    pub fn entry(&self, node_id: &str) -> Option<&NodeEntry> {
        self.entries.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NodeLayout for LoadedNodeLayout {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, nodes: &mut LayoutNodes) -> Result<()> {
        for node in nodes.iter_mut() {
            let Some(entry) = self.entries.get(node.id()) else {
                // The canvas is sized by the renderer.
                if node.is_canvas() {
                    continue;
                }
                return Err(Error::MissingLayoutEntry {
                    node_id: node.id().to_string(),
                    layout: self.name.clone(),
                });
            };
            let height = entry.height.unwrap_or(node.get_size().height);
            node.set_scale(size3(entry.width, height, entry.depth));
            node.set_center_position(point3(entry.x, self.ground_level + height / 2.0, entry.z));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{FactoryTable, ROOT_TYPE};
    use crate::geom::Point3;
    use crate::scene::{ObjectTag, RenderObject, Scene};
    use crate::settings::LayoutSettings;
    use strata_graph::Graph;

    fn arena(graph: &Graph) -> LayoutNodes {
        let mut scene = Scene::new();
        let objects: Vec<_> = graph
            .nodes()
            .map(|(ix, n)| {
                let object = RenderObject::new(
                    n.id(),
                    ObjectTag::Node,
                    Point3::origin(),
                    size3(1.0, 0.2, 1.0),
                );
                (ix, scene.add(object))
            })
            .collect();
        let factories = FactoryTable::from_settings(&LayoutSettings::default());
        LayoutNodes::from_objects(graph, &scene, &factories, objects.iter().map(|(n, o)| (n, o)))
            .unwrap()
    }

    #[test]
    fn entries_are_applied_by_node_id() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Component").unwrap();
        let mut nodes = arena(&g);
        let layout = LoadedNodeLayout::from_json_str(
            "inline",
            r#"{ "nodes": {
                "a": { "x": 1.0, "z": 2.0, "width": 3.0, "depth": 4.0 },
                "b": { "x": -1.0, "z": 0.5, "width": 0.5, "depth": 0.5, "height": 1.0 }
            } }"#,
        )
        .unwrap();
        layout.apply(&mut nodes).unwrap();

        let a = nodes.get(nodes.ix_of(a).unwrap());
        assert_eq!(a.get_size(), size3(3.0, 0.2, 4.0));
        assert_eq!(a.center_position(), point3(1.0, 0.1, 2.0));
        let b = nodes.get(nodes.ix_of(b).unwrap());
        assert_eq!(b.get_size(), size3(0.5, 1.0, 0.5));
        assert_eq!(b.ground().y, 0.0);
    }

    #[test]
    fn missing_entry_is_fatal() {
        let mut g = Graph::new("g");
        g.add_node("a", "Cluster").unwrap();
        g.add_node("stale", "Cluster").unwrap();
        let mut nodes = arena(&g);
        let layout = LoadedNodeLayout::from_description("v1.json", LayoutDescription::default())
            .with_entry(
                "a",
                NodeEntry {
                    x: 0.0,
                    z: 0.0,
                    width: 1.0,
                    depth: 1.0,
                    height: None,
                },
            );
        let err = layout.apply(&mut nodes).unwrap_err();
        assert!(matches!(
            &err,
            Error::MissingLayoutEntry { node_id, layout } if node_id == "stale" && layout == "v1.json"
        ));
    }

    #[test]
    fn canvas_needs_no_entry() {
        let mut g = Graph::new("g");
        g.add_node("g#ROOT", ROOT_TYPE).unwrap();
        let mut nodes = arena(&g);
        let layout = LoadedNodeLayout::from_description("empty", LayoutDescription::default());
        assert!(layout.is_empty());
        layout.apply(&mut nodes).unwrap();
    }

    #[test]
    fn missing_file_is_reported_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            LoadedNodeLayout::load(&path),
            Err(Error::ResourceNotFound { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            LoadedNodeLayout::load(&bad),
            Err(Error::InvalidLayoutDescription { .. })
        ));
    }
}
