#![forbid(unsafe_code)]

//! Graph container used by `strata-layout`.
//!
//! Nodes form a forest through their parent/child links (the node hierarchy); edges connect
//! arbitrary nodes of the same graph. Nodes and edges are stored in insertion order and are
//! addressed by stable indices ([`NodeIx`], [`EdgeIx`]). A [`NodeRef`] additionally remembers
//! which graph instance a node belongs to, so that cross-graph edges can be rejected.

mod error;
mod graph;

pub use error::{Error, Result};
pub use graph::alg;
pub use graph::{Edge, EdgeIx, Graph, GraphId, Node, NodeIx, NodeRef};
