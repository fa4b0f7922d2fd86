#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {edge_id}")]
    MissingEndpoint { edge_id: String },
    #[error("graph contains the node id more than once: {node_id}")]
    DuplicateNode { node_id: String },
    #[error("unknown layout algorithm: {name}")]
    UnknownAlgorithm { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
