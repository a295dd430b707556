//! The core [`Graph`] container plus a small set of hierarchy helpers re-exported as
//! `strata_graph::alg`.

use crate::error::{Error, Result};
use rustc_hash::FxBuildHasher;
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod alg;
mod entries;

pub use entries::{Edge, Node};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`Graph`] instance. Two graphs never share an id, even if they have the
/// same name and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

/// Index of a node inside its graph. Stable for the lifetime of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIx(usize);

impl NodeIx {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge inside its graph. Stable for the lifetime of the graph, also across
/// removals of other edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIx(usize);

impl EdgeIx {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node index tagged with the graph it was issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub graph: GraphId,
    pub node: NodeIx,
}

pub struct Graph {
    id: GraphId,
    name: String,

    nodes: Vec<Node>,
    node_index: HashMap<String, NodeIx>,

    // Removed edges leave a hole so that outstanding `EdgeIx` values stay valid.
    edges: Vec<Option<Edge>>,
    edge_index: HashMap<String, EdgeIx>,
    edge_count: usize,

    // Invalidated by every structural change of the node hierarchy.
    max_depth: Cell<Option<usize>>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            edge_count: 0,
            max_depth: Cell::new(None),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a new root node. Fails if `id` is empty or already used in this graph.
    pub fn add_node(&mut self, id: impl Into<String>, node_type: impl Into<String>) -> Result<NodeIx> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::EmptyId { what: "node" });
        }
        if self.node_index.contains_key(&id) {
            return Err(Error::DuplicateNode {
                graph: self.name.clone(),
                id,
            });
        }
        let ix = NodeIx(self.nodes.len());
        self.nodes.push(Node::new(id.clone(), node_type.into()));
        self.node_index.insert(id, ix);
        self.max_depth.set(None);
        Ok(ix)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_ix(&self, id: &str) -> Result<NodeIx> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::NodeNotFound {
                graph: self.name.clone(),
                id: id.to_string(),
            })
    }

    pub fn get_node(&self, id: &str) -> Result<&Node> {
        self.node_ix(id).map(|ix| &self.nodes[ix.0])
    }

    /// Returns a graph-tagged handle for the node with the given `id`.
    pub fn node_ref(&self, id: &str) -> Result<NodeRef> {
        Ok(self.to_ref(self.node_ix(id)?))
    }

    pub fn to_ref(&self, node: NodeIx) -> NodeRef {
        NodeRef {
            graph: self.id,
            node,
        }
    }

    /// Resolves a handle issued by this graph. Handles of other graphs are rejected.
    pub fn resolve(&self, node: NodeRef) -> Result<NodeIx> {
        if node.graph != self.id || node.node.0 >= self.nodes.len() {
            return Err(Error::ForeignNode {
                graph: self.name.clone(),
                owner: node.graph,
                ix: node.node.0,
            });
        }
        Ok(node.node)
    }

    /// Panics if `ix` was not issued by this graph.
    pub fn node(&self, ix: NodeIx) -> &Node {
        &self.nodes[ix.0]
    }

    pub fn try_node(&self, ix: NodeIx) -> Option<&Node> {
        self.nodes.get(ix.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIx, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIx(i), n))
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIx> + '_ {
        (0..self.nodes.len()).map(NodeIx)
    }

    /// All nodes without a parent, in insertion order.
    pub fn roots(&self) -> Vec<NodeIx> {
        self.nodes()
            .filter(|(_, n)| n.parent().is_none())
            .map(|(ix, _)| ix)
            .collect()
    }

    /// Makes `child` a child of `parent`. The child (and its whole subtree) takes the level
    /// of `parent` plus one.
    pub fn add_child(&mut self, parent: NodeIx, child: NodeIx) -> Result<()> {
        self.check_ix(parent)?;
        self.check_ix(child)?;
        if let Some(existing) = self.nodes[child.0].parent() {
            return Err(Error::AlreadyHasParent {
                child: self.nodes[child.0].id().to_string(),
                parent: self.nodes[existing.0].id().to_string(),
            });
        }
        if alg::ancestors(self, parent).contains(&child) {
            return Err(Error::CycleDetected {
                parent: self.nodes[parent.0].id().to_string(),
                child: self.nodes[child.0].id().to_string(),
            });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        let level = self.nodes[parent.0].level + 1;
        self.relevel(child, level);
        self.max_depth.set(None);
        Ok(())
    }

    fn relevel(&mut self, start: NodeIx, level: usize) {
        let mut stack = vec![(start, level)];
        while let Some((ix, level)) = stack.pop() {
            self.nodes[ix.0].level = level;
            for &child in &self.nodes[ix.0].children {
                stack.push((child, level + 1));
            }
        }
    }

    fn check_ix(&self, ix: NodeIx) -> Result<()> {
        if ix.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::ForeignNode {
                graph: self.name.clone(),
                owner: self.id,
                ix: ix.0,
            })
        }
    }

    /// The maximal level of all nodes; 0 for the empty graph and for flat graphs.
    pub fn max_depth(&self) -> usize {
        if let Some(depth) = self.max_depth.get() {
            return depth;
        }
        let depth = self.nodes.iter().map(Node::level).max().unwrap_or(0);
        self.max_depth.set(Some(depth));
        depth
    }

    /// Adds an edge from `source` to `target`. Both handles must have been issued by this
    /// graph. When `id` is `None`, a unique ID is derived from the endpoints.
    pub fn add_edge(
        &mut self,
        source: NodeRef,
        target: NodeRef,
        id: Option<&str>,
        edge_type: impl Into<String>,
    ) -> Result<EdgeIx> {
        if source.graph != target.graph {
            return Err(Error::CrossGraphReference {
                source_id: self.describe_ref(source),
                target_id: self.describe_ref(target),
            });
        }
        let s = self.resolve(source)?;
        let t = self.resolve(target)?;

        let id = match id {
            Some("") => return Err(Error::EmptyId { what: "edge" }),
            Some(id) => {
                if self.edge_index.contains_key(id) {
                    return Err(Error::DuplicateEdge {
                        graph: self.name.clone(),
                        id: id.to_string(),
                    });
                }
                id.to_string()
            }
            None => self.fresh_edge_id(s, t),
        };

        let ix = EdgeIx(self.edges.len());
        self.edges
            .push(Some(Edge::new(id.clone(), s, t, edge_type.into())));
        self.edge_index.insert(id, ix);
        self.edge_count += 1;
        self.nodes[s.0].outgoings.push(ix);
        self.nodes[t.0].incomings.push(ix);
        Ok(ix)
    }

    fn describe_ref(&self, node: NodeRef) -> String {
        if node.graph == self.id {
            if let Some(n) = self.nodes.get(node.node.0) {
                return n.id().to_string();
            }
        }
        format!("{}:{}", node.graph, node.node.0)
    }

    fn fresh_edge_id(&self, s: NodeIx, t: NodeIx) -> String {
        let base = format!("{}->{}", self.nodes[s.0].id(), self.nodes[t.0].id());
        if !self.edge_index.contains_key(&base) {
            return base;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}#{n}");
            if !self.edge_index.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn remove_edge(&mut self, ix: EdgeIx) -> Result<Edge> {
        let Some(edge) = self.edges.get_mut(ix.0).and_then(Option::take) else {
            return Err(Error::EdgeNotFound {
                graph: self.name.clone(),
                id: format!("#{}", ix.0),
            });
        };
        self.edge_index.remove(edge.id());
        self.edge_count -= 1;
        self.nodes[edge.source().0].outgoings.retain(|&e| e != ix);
        self.nodes[edge.target().0].incomings.retain(|&e| e != ix);
        Ok(edge)
    }

    pub fn edge(&self, ix: EdgeIx) -> Option<&Edge> {
        self.edges.get(ix.0).and_then(Option::as_ref)
    }

    pub fn edge_ix(&self, id: &str) -> Result<EdgeIx> {
        self.edge_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::EdgeNotFound {
                graph: self.name.clone(),
                id: id.to_string(),
            })
    }

    pub fn get_edge(&self, id: &str) -> Result<&Edge> {
        let ix = self.edge_ix(id)?;
        self.edge(ix).ok_or_else(|| Error::EdgeNotFound {
            graph: self.name.clone(),
            id: id.to_string(),
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIx, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeIx(i), e)))
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edge_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_sets_levels_of_the_whole_subtree() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Cluster").unwrap();
        let c = g.add_node("c", "Component").unwrap();
        g.add_child(b, c).unwrap();
        assert_eq!(g.node(c).level(), 1);

        g.add_child(a, b).unwrap();
        assert_eq!(g.node(a).level(), 0);
        assert_eq!(g.node(b).level(), 1);
        assert_eq!(g.node(c).level(), 2);
        assert_eq!(g.max_depth(), 2);
    }

    #[test]
    fn add_child_rejects_second_parent_and_cycles() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Cluster").unwrap();
        let c = g.add_node("c", "Cluster").unwrap();
        g.add_child(a, b).unwrap();

        assert!(matches!(
            g.add_child(c, b),
            Err(Error::AlreadyHasParent { .. })
        ));
        assert!(matches!(g.add_child(b, a), Err(Error::CycleDetected { .. })));
        assert!(matches!(g.add_child(a, a), Err(Error::CycleDetected { .. })));
    }

    #[test]
    fn max_depth_follows_structural_changes() {
        let mut g = Graph::new("g");
        assert_eq!(g.max_depth(), 0);
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Cluster").unwrap();
        assert_eq!(g.max_depth(), 0);
        g.add_child(a, b).unwrap();
        assert_eq!(g.max_depth(), 1);
    }

    #[test]
    fn removed_edges_keep_other_indices_valid() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "Cluster").unwrap();
        let b = g.add_node("b", "Cluster").unwrap();
        let (ra, rb) = (g.to_ref(a), g.to_ref(b));
        let e1 = g.add_edge(ra, rb, None, "Dependency").unwrap();
        let e2 = g.add_edge(ra, rb, None, "Dependency").unwrap();
        assert_eq!(g.edge(e1).unwrap().id(), "a->b");
        assert_eq!(g.edge(e2).unwrap().id(), "a->b#1");

        g.remove_edge(e1).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert!(g.edge(e1).is_none());
        assert_eq!(g.edge(e2).unwrap().id(), "a->b#1");
        assert_eq!(g.node(a).outgoings(), &[e2]);
        assert_eq!(g.node(b).incomings(), &[e2]);
    }
}
