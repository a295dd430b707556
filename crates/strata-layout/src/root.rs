//! Synthetic root node.
//!
//! A graph with several top-level nodes is drawn onto a canvas: a synthetic node of type
//! [`ROOT_TYPE`] that becomes the parent of every former root. A graph with exactly one root
//! keeps it as its drawing anchor.

use crate::element::ROOT_TYPE;
use crate::error::Result;
use strata_graph::{Graph, NodeIx};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticRoot {
    /// Created by this call; the former roots are its children.
    Created(NodeIx),
    /// Created by an earlier call and left unchanged.
    Existing(NodeIx),
    /// The graph has at most one root and needs no canvas node.
    NotNeeded,
}

impl SyntheticRoot {
    pub fn node(self) -> Option<NodeIx> {
        match self {
            SyntheticRoot::Created(ix) | SyntheticRoot::Existing(ix) => Some(ix),
            SyntheticRoot::NotNeeded => None,
        }
    }
}

/// Reserved ID of the synthetic root of `graph`.
pub fn synthetic_root_id(graph: &Graph) -> String {
    format!("{}#ROOT", graph.name())
}

/// Makes sure `graph` has a single root, creating the synthetic root when there is more than
/// one. Calling this again returns the existing synthetic root.
pub fn ensure_single_root(graph: &mut Graph) -> Result<SyntheticRoot> {
    if let Ok(existing) = graph.node_ix(&synthetic_root_id(graph)) {
        return Ok(SyntheticRoot::Existing(existing));
    }
    if graph.roots().len() <= 1 {
        return Ok(SyntheticRoot::NotNeeded);
    }
    add_synthetic_root(graph).map(SyntheticRoot::Created)
}

/// Adds the synthetic root and moves every current root below it.
pub fn add_synthetic_root(graph: &mut Graph) -> Result<NodeIx> {
    let roots = graph.roots();
    let id = synthetic_root_id(graph);
    let root = graph.add_node(id, ROOT_TYPE)?;
    for child in roots {
        graph.add_child(root, child)?;
    }
    debug!(
        graph = graph.name(),
        children = graph.node(root).children().len(),
        "added synthetic root"
    );
    Ok(root)
}
