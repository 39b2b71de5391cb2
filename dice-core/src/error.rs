//! Error types for the dice core

/// Errors raised while building or driving the scene
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rotation channel index outside 0..=2
    #[error("Invalid rotation channel: {0}")]
    InvalidChannel(usize),

    /// A light model code with no matching model
    #[error("Unknown light model code: {0}")]
    UnknownLightModel(i32),

    /// A damping function code with no matching function
    #[error("Unknown damping function code: {0}")]
    UnknownDampingFunction(i32),

    /// A shading stage code other than vertex (1) or fragment (0)
    #[error("Unknown shading stage code: {0}")]
    UnknownShadingStage(i32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
