//! Error type shared by the primitives, the transformation variants and the
//! manager.

use crate::mobius::TransformationId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MobiusError {
    /// The geometric input does not define a Möbius transformation, e.g.
    /// coincident axis points or a numerically singular frame.
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(&'static str),
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("unknown transformation {0}")]
    UnknownTransformation(TransformationId),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl MobiusError {
    /// Rejects non-finite scalars at the boundary.
    pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::InvalidParameter { name, value })
        }
    }
}

pub type MobiusResult<T> = Result<T, MobiusError>;
