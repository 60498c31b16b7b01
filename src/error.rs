use thiserror::Error;

/// Top-level error type for the edge geometry engine.
#[derive(Debug, Error)]
pub enum EdgeformError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("no real curve parameter in [0, 1] for {0}")]
    NoValidParameter(&'static str),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("non-finite value produced while computing {0}")]
    NonFinite(&'static str),
}

/// Errors related to the node/edge arena.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node not found")]
    NodeNotFound,

    #[error("edge not found")]
    EdgeNotFound,

    #[error("control point not found")]
    ControlPointNotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while reading a persisted attribute map.
#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("missing attribute `{0}`")]
    Missing(String),

    #[error("invalid attribute `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

/// Convenience type alias for results using [`EdgeformError`].
pub type Result<T> = std::result::Result<T, EdgeformError>;
