//! Element kinds and the factories that create and size their render objects.
//!
//! Node type tags are mapped onto a closed set of [`ElementKind`]s; each kind has exactly one
//! [`NodeFactory`] in a [`FactoryTable`]. The table is checked for completeness when it is
//! built, so a lookup can only fail for a type tag that maps onto no kind at all.

use crate::error::{Error, Result};
use crate::geom::{Size3, size3};
use crate::settings::{Color, ColorRange, LayoutSettings};
use serde::{Deserialize, Serialize};
use strata_graph::Node;

/// Type tag of the synthetic root node that acts as the drawing canvas.
pub const ROOT_TYPE: &str = "ROOTTYPE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Cluster,
    Component,
    Root,
}

impl ElementKind {
    pub const COUNT: usize = 3;
    pub const ALL: [ElementKind; 3] =
        [ElementKind::Cluster, ElementKind::Component, ElementKind::Root];

    pub fn index(self) -> usize {
        match self {
            ElementKind::Cluster => 0,
            ElementKind::Component => 1,
            ElementKind::Root => 2,
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "Cluster" => Some(ElementKind::Cluster),
            "Component" => Some(ElementKind::Component),
            ROOT_TYPE => Some(ElementKind::Root),
            _ => None,
        }
    }

    pub fn type_tag(self) -> &'static str {
        match self {
            ElementKind::Cluster => "Cluster",
            ElementKind::Component => "Component",
            ElementKind::Root => ROOT_TYPE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    Cube,
    Cylinder,
    Plane,
}

/// Creates and styles the render objects of one element kind.
pub trait NodeFactory {
    fn kind(&self) -> ElementKind;

    fn shape(&self) -> Shape;

    /// Number of discrete style buckets this factory can render.
    fn number_of_styles(&self) -> u32;

    /// Scale of a freshly created block.
    fn unit(&self) -> Size3;

    /// Extent of an object of this kind carrying the given scale.
    fn size_of(&self, scale: Size3) -> Size3 {
        scale
    }

    fn style_color(&self, style: u32) -> Color;
}

/// The default factory: one shape per kind, colored from a [`ColorRange`].
#[derive(Debug, Clone)]
pub struct BlockFactory {
    kind: ElementKind,
    shape: Shape,
    element_height: f64,
    colors: ColorRange,
}

impl BlockFactory {
    pub fn new(kind: ElementKind, shape: Shape, element_height: f64, colors: ColorRange) -> Self {
        Self {
            kind,
            shape,
            element_height,
            colors,
        }
    }
}

impl NodeFactory for BlockFactory {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn shape(&self) -> Shape {
        self.shape
    }

    fn number_of_styles(&self) -> u32 {
        self.colors.number_of_colors.max(1)
    }

    fn unit(&self) -> Size3 {
        size3(1.0, self.element_height, 1.0)
    }

    fn size_of(&self, scale: Size3) -> Size3 {
        match self.shape {
            // Cylinders are inscribed in their scale box; the footprint stays square.
            Shape::Cylinder => {
                let diameter = scale.width.min(scale.depth);
                size3(diameter, scale.height, diameter)
            }
            Shape::Cube | Shape::Plane => scale,
        }
    }

    fn style_color(&self, style: u32) -> Color {
        self.colors.color_at(style)
    }
}

pub struct FactoryTable {
    // Indexed by `ElementKind::index`; complete by construction.
    factories: Vec<Box<dyn NodeFactory + Send + Sync>>,
}

impl std::fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|factory| factory.kind()))
            .finish()
    }
}

impl FactoryTable {
    /// Builds a table from one factory per kind. Later factories for the same kind replace
    /// earlier ones; a kind without any factory is an error.
    pub fn new(
        factories: impl IntoIterator<Item = Box<dyn NodeFactory + Send + Sync>>,
    ) -> Result<Self> {
        let mut slots: Vec<Option<Box<dyn NodeFactory + Send + Sync>>> =
            (0..ElementKind::COUNT).map(|_| None).collect();
        for factory in factories {
            let index = factory.kind().index();
            slots[index] = Some(factory);
        }
        let mut out = Vec::with_capacity(ElementKind::COUNT);
        for (kind, slot) in ElementKind::ALL.into_iter().zip(slots) {
            out.push(slot.ok_or(Error::MissingFactory { kind })?);
        }
        Ok(Self { factories: out })
    }

    /// Cubes for clusters, cylinders for components and a flat plane for the synthetic root.
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        let factories = ElementKind::ALL.map(|kind| {
            let element = settings.elements.for_kind(kind);
            let shape = match kind {
                ElementKind::Cluster => Shape::Cube,
                ElementKind::Component => Shape::Cylinder,
                ElementKind::Root => Shape::Plane,
            };
            Box::new(BlockFactory::new(
                kind,
                shape,
                element.element_height,
                element.color_range.clone(),
            )) as Box<dyn NodeFactory + Send + Sync>
        });
        Self {
            factories: factories.into_iter().collect(),
        }
    }

    pub fn for_kind(&self, kind: ElementKind) -> &dyn NodeFactory {
        self.factories[kind.index()].as_ref()
    }

    /// Resolves the factory for a node type tag. Unmapped tags are never defaulted.
    pub fn for_type(&self, node_id: &str, node_type: &str) -> Result<&dyn NodeFactory> {
        ElementKind::from_type_tag(node_type)
            .map(|kind| self.for_kind(kind))
            .ok_or_else(|| Error::UnknownElementType {
                node_id: node_id.to_string(),
                node_type: node_type.to_string(),
            })
    }

    pub fn for_node(&self, node: &Node) -> Result<&dyn NodeFactory> {
        self.for_type(node.id(), node.node_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_requires_a_factory_for_every_kind() {
        let settings = LayoutSettings::default();
        let cluster = settings.elements.cluster.clone();
        let only_cluster: Vec<Box<dyn NodeFactory + Send + Sync>> = vec![Box::new(
            BlockFactory::new(
                ElementKind::Cluster,
                Shape::Cube,
                cluster.element_height,
                cluster.color_range,
            ),
        )];
        assert!(matches!(
            FactoryTable::new(only_cluster),
            Err(Error::MissingFactory {
                kind: ElementKind::Component
            })
        ));
    }

    #[test]
    fn unknown_type_tags_are_not_defaulted() {
        let table = FactoryTable::from_settings(&LayoutSettings::default());
        assert_eq!(
            table.for_type("n", "Cluster").unwrap().shape(),
            Shape::Cube
        );
        assert_eq!(
            table.for_type("r", ROOT_TYPE).unwrap().kind(),
            ElementKind::Root
        );
        let err = table.for_type("n", "Unknown").err().unwrap();
        assert!(matches!(err, Error::UnknownElementType { .. }));
        assert!(err.to_string().contains("`n`"));
    }

    #[test]
    fn cylinder_footprint_is_square() {
        let table = FactoryTable::from_settings(&LayoutSettings::default());
        let size = table
            .for_kind(ElementKind::Component)
            .size_of(size3(2.0, 0.5, 1.0));
        assert_eq!(size, size3(1.0, 0.5, 1.0));
    }
}
