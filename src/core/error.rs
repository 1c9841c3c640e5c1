use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgoraError {
    /// Clustering was invoked on an explicitly supplied, empty vertex set.
    /// Distinct from "no vertex set supplied yet", which is a silent no-op.
    #[error("Clustering invoked with an empty vertex set")]
    EmptyVertexSet,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown statement id: {0:?}")]
    UnknownStatement(crate::rules::statement::StatementId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgoraError>;
