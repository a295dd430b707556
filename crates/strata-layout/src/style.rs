//! Level-based node styles.

use crate::element::FactoryTable;
use crate::error::Result;
use crate::scene::{ObjectId, Scene};
use indexmap::IndexMap;
use strata_graph::{Graph, NodeIx};
use tracing::debug;

/// Style bucket of a node at `level` in a tree of depth `max_depth`, interpolated linearly
/// over `number_of_styles` buckets. Flat trees use bucket 0.
pub fn select_style(level: usize, max_depth: usize, number_of_styles: u32) -> u32 {
    if max_depth == 0 || number_of_styles == 0 {
        return 0;
    }
    let t = level as f64 / max_depth as f64;
    let style = (number_of_styles as f64 * t).round_ties_even();
    (style.max(0.0) as u32).min(number_of_styles - 1)
}

/// Recomputes style index and color of every node object from the current tree shape.
pub fn refresh_styles(
    graph: &Graph,
    scene: &mut Scene,
    objects: &IndexMap<NodeIx, ObjectId>,
    factories: &FactoryTable,
) -> Result<()> {
    let max_depth = graph.max_depth();
    for (&node, &object) in objects {
        let node = graph.node(node);
        let factory = factories.for_node(node)?;
        let style = select_style(node.level(), max_depth, factory.number_of_styles());
        let color = factory.style_color(style);
        debug!(node = node.id(), level = node.level(), style, "style");
        let object = scene.get_mut(object)?;
        object.style = Some(style);
        object.color = Some(color);
    }
    Ok(())
}
