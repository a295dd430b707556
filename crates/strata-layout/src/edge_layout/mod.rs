//! Edge layout dispatch.
//!
//! [`EdgeLayout`] holds one of the fixed set of routing strategies, parametrized from
//! [`EdgeLayoutSettings`]. Every strategy returns exactly one route per [`LayoutEdge`], in
//! input order; [`EdgeLayout::None`] returns nothing at all.

mod bundled;
mod curve;
mod spline;
mod straight;

pub use bundled::BundledEdges;
pub use spline::SplineEdges;
pub use straight::StraightEdges;

use crate::error::Error;
use crate::geom::Point3;
use crate::layout_node::{LayoutIx, LayoutNodes};
use crate::settings::EdgeLayoutSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strata_graph::EdgeIx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EdgeLayoutKind {
    Straight,
    Spline,
    #[default]
    Bundled,
    None,
}

impl EdgeLayoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeLayoutKind::Straight => "Straight",
            EdgeLayoutKind::Spline => "Spline",
            EdgeLayoutKind::Bundled => "Bundled",
            EdgeLayoutKind::None => "None",
        }
    }
}

impl fmt::Display for EdgeLayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeLayoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Straight" => Ok(EdgeLayoutKind::Straight),
            "Spline" => Ok(EdgeLayoutKind::Spline),
            "Bundled" => Ok(EdgeLayoutKind::Bundled),
            "None" => Ok(EdgeLayoutKind::None),
            other => Err(Error::UnrecognizedLayoutKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EdgeLayoutKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EdgeLayoutKind> for String {
    fn from(value: EdgeLayoutKind) -> Self {
        value.as_str().to_string()
    }
}

/// An edge to be routed between two layout nodes of the same pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: LayoutIx,
    pub target: LayoutIx,
    pub edge: EdgeIx,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeLayout {
    Straight(StraightEdges),
    Spline(SplineEdges),
    Bundled(BundledEdges),
    None,
}

impl EdgeLayout {
    pub fn from_settings(settings: &EdgeLayoutSettings) -> Self {
        let above = settings.edges_above_blocks;
        let distance = settings.minimal_edge_level_distance();
        let segments = settings.tubular_segments.max(1) as usize;
        match settings.kind {
            EdgeLayoutKind::Straight => EdgeLayout::Straight(StraightEdges::new(above, distance)),
            EdgeLayoutKind::Spline => {
                EdgeLayout::Spline(SplineEdges::new(above, distance, settings.rdp, segments))
            }
            EdgeLayoutKind::Bundled => EdgeLayout::Bundled(BundledEdges::new(
                above,
                distance,
                settings.rdp,
                settings.tension,
                segments,
            )),
            EdgeLayoutKind::None => EdgeLayout::None,
        }
    }

    pub fn kind(&self) -> EdgeLayoutKind {
        match self {
            EdgeLayout::Straight(_) => EdgeLayoutKind::Straight,
            EdgeLayout::Spline(_) => EdgeLayoutKind::Spline,
            EdgeLayout::Bundled(_) => EdgeLayoutKind::Bundled,
            EdgeLayout::None => EdgeLayoutKind::None,
        }
    }

    /// Routes `edges` over the geometry of `nodes`.
    pub fn route(&self, nodes: &LayoutNodes, edges: &[LayoutEdge]) -> Vec<Vec<Point3>> {
        match self {
            EdgeLayout::Straight(layout) => edges.iter().map(|e| layout.route(nodes, e)).collect(),
            EdgeLayout::Spline(layout) => edges.iter().map(|e| layout.route(nodes, e)).collect(),
            EdgeLayout::Bundled(layout) => layout.route(nodes, edges),
            EdgeLayout::None => Vec::new(),
        }
    }
}

/// A routed edge, ready to be drawn as a tube along `points`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedEdge {
    #[serde(skip)]
    pub edge: EdgeIx,
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub points: Vec<Point3>,
    pub width: f64,
    pub radius: f64,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub selectable: bool,
}

/// Turns layout edges into [`RoutedEdge`]s carrying the tube parameters of the settings.
#[derive(Debug, Clone)]
pub struct EdgeFactory {
    layout: EdgeLayout,
    width: f64,
    radius: f64,
    radial_segments: u32,
    tubular_segments: u32,
    selectable: bool,
}

impl EdgeFactory {
    pub fn new(layout: EdgeLayout, settings: &EdgeLayoutSettings) -> Self {
        Self {
            layout,
            width: settings.edge_width,
            radius: settings.radius,
            radial_segments: settings.radial_segments,
            tubular_segments: settings.tubular_segments,
            selectable: settings.is_edge_selectable,
        }
    }

    pub fn from_settings(settings: &EdgeLayoutSettings) -> Self {
        Self::new(EdgeLayout::from_settings(settings), settings)
    }

    pub fn layout(&self) -> &EdgeLayout {
        &self.layout
    }

    pub fn draw_edges(&self, nodes: &LayoutNodes, edges: &[LayoutEdge]) -> Vec<RoutedEdge> {
        self.layout
            .route(nodes, edges)
            .into_iter()
            .zip(edges)
            .map(|(points, edge)| RoutedEdge {
                edge: edge.edge,
                id: edge.id.clone(),
                source_id: nodes.get(edge.source).id().to_string(),
                target_id: nodes.get(edge.target).id().to_string(),
                points,
                width: self.width,
                radius: self.radius,
                radial_segments: self.radial_segments,
                tubular_segments: self.tubular_segments,
                selectable: self.selectable,
            })
            .collect()
    }
}
