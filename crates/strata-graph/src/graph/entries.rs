//! Storage entries for [`Graph`](super::Graph).

use super::{EdgeIx, NodeIx};

#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    node_type: String,
    pub(in crate::graph) level: usize,
    pub(in crate::graph) parent: Option<NodeIx>,
    pub(in crate::graph) children: Vec<NodeIx>,
    pub(in crate::graph) outgoings: Vec<EdgeIx>,
    pub(in crate::graph) incomings: Vec<EdgeIx>,
}

impl Node {
    pub(in crate::graph) fn new(id: String, node_type: String) -> Self {
        Self {
            id,
            node_type,
            level: 0,
            parent: None,
            children: Vec::new(),
            outgoings: Vec::new(),
            incomings: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The type tag, e.g. `"Cluster"` or `"Component"`.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Depth in the node hierarchy; roots have level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent(&self) -> Option<NodeIx> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIx] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn outgoings(&self) -> &[EdgeIx] {
        &self.outgoings
    }

    pub fn incomings(&self) -> &[EdgeIx] {
        &self.incomings
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    id: String,
    source: NodeIx,
    target: NodeIx,
    edge_type: String,
}

impl Edge {
    pub(in crate::graph) fn new(id: String, source: NodeIx, target: NodeIx, edge_type: String) -> Self {
        Self {
            id,
            source,
            target,
            edge_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> NodeIx {
        self.source
    }

    pub fn target(&self) -> NodeIx {
        self.target
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
