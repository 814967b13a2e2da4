use thiserror::Error;

/// Error type for xor_nn
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A matrix or dataset was given a zero, ragged or otherwise unusable shape.
    #[error("shape has a zero, ragged or undersized dimension")]
    InvalidShape,
    /// Indicates some dimension is incompatible in a Matrix operation.
    #[error("matrices have incompatible dimensions")]
    DimensionMismatch,
    /// Element access outside of a matrix's bounds.
    #[error("element index out of range")]
    IndexOutOfRange,
    /// The training worker thread panicked or its channel closed.
    #[error("training thread failed")]
    ThreadErr,
}

pub type Result<T> = std::result::Result<T, Error>;
