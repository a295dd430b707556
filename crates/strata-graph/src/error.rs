use crate::graph::GraphId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("node `{id}` not found in graph `{graph}`")]
    NodeNotFound { graph: String, id: String },

    #[error("edge `{id}` not found in graph `{graph}`")]
    EdgeNotFound { graph: String, id: String },

    #[error("ID of a {what} must neither be null nor empty")]
    EmptyId { what: &'static str },

    #[error("node ID `{id}` is not unique in graph `{graph}`")]
    DuplicateNode { graph: String, id: String },

    #[error("edge ID `{id}` is not unique in graph `{graph}`")]
    DuplicateEdge { graph: String, id: String },

    #[error("node `{child}` already has parent `{parent}`")]
    AlreadyHasParent { child: String, parent: String },

    #[error("making `{child}` a child of `{parent}` would create a cycle in the node hierarchy")]
    CycleDetected { parent: String, child: String },

    #[error("source `{source_id}` and target `{target_id}` of the edge are in different graphs")]
    CrossGraphReference {
        source_id: String,
        target_id: String,
    },

    #[error("node handle {ix} belongs to graph {owner:?}, not to graph `{graph}`")]
    ForeignNode {
        graph: String,
        owner: GraphId,
        ix: usize,
    },
}
