use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the 2D boolean backend. The public reconciliation
/// operations never surface these; they fall back to "nothing to do".
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Boolean operation resulted in empty geometry")]
    EmptyResult,

    #[error("Unresolved geometry: {0}")]
    Unresolved(String),

    #[error("Model error: {0}")]
    Model(#[from] bem_lite_core::Error),
}
