use thiserror::Error;

/// Errors raised by the sketching core.
///
/// Everything else the core does is total over its inputs; these are the
/// configuration mistakes it refuses up front.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    #[error("Invalid bit width: feature vector must hold at least one bit")]
    InvalidBitWidth,
    #[error("Feature vector width mismatch: {left} bits vs {right} bits")]
    WidthMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, SketchError>;
