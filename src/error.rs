use std::fmt;

/// Failures surfaced at the pipeline boundary.
///
/// Numeric degeneracies inside the stages (negative discriminants, near-zero
/// eigenvalue ratios) are handled locally and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A filter parameter was zero, negative or not finite.
    InvalidParameter { name: &'static str, value: f32 },
    /// Input grid does not match the configured working resolution.
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Raw buffer length does not match the declared dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// Display mode index outside `0..=2`.
    InvalidDisplayMode(u32),
    /// Working resolution with a zero dimension.
    EmptyImage,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {name}={value}: must be finite and > 0")
            }
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidDisplayMode(idx) => write!(f, "invalid display mode {idx}"),
            Self::EmptyImage => write!(f, "image has zero width or height"),
        }
    }
}

impl std::error::Error for Error {}
