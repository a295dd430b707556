//! JSON graph documents read by the CLI.

use serde::Deserialize;
use strata_graph::Graph;
use strata_layout::UNKNOWN_EDGE_TYPE;

#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, rename = "type")]
    pub edge_type: Option<String>,
}

impl GraphDocument {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Builds the graph. Parents may be declared after their children.
    pub fn into_graph(self) -> strata_graph::Result<Graph> {
        let mut graph = Graph::new(self.name);
        for node in &self.nodes {
            graph.add_node(node.id.clone(), node.node_type.clone())?;
        }
        for node in &self.nodes {
            if let Some(parent) = &node.parent {
                let parent = graph.node_ix(parent)?;
                let child = graph.node_ix(&node.id)?;
                graph.add_child(parent, child)?;
            }
        }
        for edge in self.edges {
            let source = graph.node_ref(&edge.source)?;
            let target = graph.node_ref(&edge.target)?;
            let edge_type = edge
                .edge_type
                .unwrap_or_else(|| UNKNOWN_EDGE_TYPE.to_string());
            graph.add_edge(source, target, edge.id.as_deref(), edge_type)?;
        }
        Ok(graph)
    }
}
