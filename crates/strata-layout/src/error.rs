use crate::element::ElementKind;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no factory is registered for type `{node_type}` of node `{node_id}`")]
    UnknownElementType { node_id: String, node_type: String },

    #[error("no factory is registered for element kind {kind:?}")]
    MissingFactory { kind: ElementKind },

    #[error("the source `{source_id}` and target `{target_id}` of the edge are in different graphs")]
    CrossGraphReference {
        source_id: String,
        target_id: String,
    },

    #[error("layout `{layout}` has no entry for node `{node_id}`")]
    MissingLayoutEntry { node_id: String, layout: String },

    #[error("the layout description `{}` does not exist", .path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("invalid layout description `{layout}`: {message}")]
    InvalidLayoutDescription { layout: String, message: String },

    #[error("parent `{parent_id}` of node `{node_id}` has no render object")]
    InconsistentHierarchy { node_id: String, parent_id: String },

    #[error("unrecognized edge layout kind `{kind}` (expected Straight, Spline, Bundled or None)")]
    UnrecognizedLayoutKind { kind: String },

    #[error("node `{node_id}` is already wrapped by a layout node in this pass")]
    AlreadyWrapped { node_id: String },

    #[error("node `{node_id}` has no render object; draw the graph first")]
    NotDrawn { node_id: String },

    #[error("render object #{id} does not exist")]
    UnknownObject { id: usize },

    #[error("invalid layout settings: {message}")]
    InvalidSettings { message: String },

    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Graph(#[from] strata_graph::Error),
}
