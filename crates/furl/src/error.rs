pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parent chain of node {node_id} loops back on itself")]
    CyclicParent { node_id: String },

    #[error("no render surface is available to host the shadow graph")]
    MissingRenderSurface,

    #[error(transparent)]
    Layout(#[from] furl_layout::Error),

    #[error("layout solver failed: {message}")]
    Solver { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Invalid engine options: {message}")]
    InvalidOptions { message: String },
}
