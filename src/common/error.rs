use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Sizing
    #[error("Capacity exceeded: payload does not fit in any version")]
    CapacityExceeded,
    #[error("Invalid version: {0}")]
    InvalidVersion(usize),

    // Packing
    #[error("Invalid character for selected mode: {0:#04x}")]
    InvalidCharacter(u8),
    #[error("Character count {count} does not fit in {bits} bits")]
    CharCountOverflow { count: usize, bits: usize },
    #[error("Malformed bit stream: {0}")]
    MalformedBitStream(&'static str),

    // Error correction
    #[error("Galois field arithmetic error: {0}")]
    FieldArithmetic(&'static str),

    // Matrix
    #[error("Invalid masking pattern: {0}")]
    InvalidMaskPattern(u8),
    #[error("Matrix build failed for every mask pattern")]
    MatrixBuildFailure,
}

pub type QRResult<T> = Result<T, QRError>;
