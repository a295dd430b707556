//! Hierarchy helpers over [`Graph`].

use super::{EdgeIx, Graph, NodeIx};
use rustc_hash::FxHashSet;

/// `node` followed by its parent, grandparent, ... up to its root.
pub fn ancestors(g: &Graph, node: NodeIx) -> Vec<NodeIx> {
    let mut out = vec![node];
    let mut cursor = g.node(node).parent();
    while let Some(p) = cursor {
        out.push(p);
        cursor = g.node(p).parent();
    }
    out
}

/// `node` and all nodes below it, in pre-order (children in insertion order).
pub fn descendants(g: &Graph, node: NodeIx) -> Vec<NodeIx> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(v) = stack.pop() {
        out.push(v);
        for &child in g.node(v).children().iter().rev() {
            stack.push(child);
        }
    }
    out
}

/// Pre-order traversal of the whole forest, roots in insertion order.
pub fn preorder(g: &Graph) -> Vec<NodeIx> {
    let mut out = Vec::with_capacity(g.node_count());
    for root in g.roots() {
        out.extend(descendants(g, root));
    }
    out
}

/// Lowest common ancestor of `a` and `b`, or `None` if they live in different trees.
/// A node counts as its own ancestor.
pub fn lca(g: &Graph, a: NodeIx, b: NodeIx) -> Option<NodeIx> {
    let above_a: FxHashSet<NodeIx> = ancestors(g, a).into_iter().collect();
    ancestors(g, b).into_iter().find(|v| above_a.contains(v))
}

/// Edges whose source and target are both contained in `nodes`, in graph order.
pub fn connecting_edges(g: &Graph, nodes: &FxHashSet<NodeIx>) -> Vec<EdgeIx> {
    g.edges()
        .filter(|(_, e)| nodes.contains(&e.source()) && nodes.contains(&e.target()))
        .map(|(ix, _)| ix)
        .collect()
}

/// Union of the ancestor chains of all `nodes`, deduplicated, in first-seen order.
pub fn ancestor_closure(g: &Graph, nodes: &[NodeIx]) -> Vec<NodeIx> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for &node in nodes {
        for v in ancestors(g, node) {
            if seen.insert(v) {
                out.push(v);
            }
        }
    }
    out
}
