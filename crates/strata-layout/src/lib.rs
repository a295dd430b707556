#![forbid(unsafe_code)]

//! Headless layout pipeline for hierarchical architecture graphs.
//!
//! Given a [`strata_graph::Graph`], a [`LayoutSettings`] and a precomputed node layout, the
//! [`GraphRenderer`] produces a [`Scene`]: one render object per node with its final position,
//! scale and style index, a drawing plane underneath, and one routed edge per graph edge.
//! Actually drawing the scene is left to the caller.

pub mod edge_layout;
pub mod element;
pub mod error;
pub mod geom;
pub mod geometry;
pub mod hierarchy;
pub mod layout_node;
pub mod node_layout;
pub mod renderer;
pub mod root;
pub mod scene;
pub mod settings;
pub mod style;

pub use edge_layout::{
    BundledEdges, EdgeFactory, EdgeLayout, EdgeLayoutKind, LayoutEdge, RoutedEdge, SplineEdges,
    StraightEdges,
};
pub use element::{ElementKind, FactoryTable, NodeFactory, ROOT_TYPE, Shape};
pub use error::{Error, Result};
pub use geometry::DrawingArea;
pub use hierarchy::HierarchyReport;
pub use layout_node::{LayoutIx, LayoutNode, LayoutNodes};
pub use node_layout::{LayoutDescription, LoadedNodeLayout, NodeEntry, NodeLayout};
pub use renderer::{DrawOutput, DrawingPlane, DrawnEdge, GraphRenderer, UNKNOWN_EDGE_TYPE};
pub use root::SyntheticRoot;
pub use scene::{ObjectId, ObjectTag, RenderObject, Scene};
pub use settings::{Color, ColorRange, EdgeLayoutSettings, Footprint, LayoutSettings};
