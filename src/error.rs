//! Error type shared by every transform entry point.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Errors reported by the filter adapter, the padder and the separable engine.
///
/// Every error is raised eagerly at the point of violation; no partial result
/// is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveletError {
    /// The wavelet name is not in the built-in filter table.
    UnknownWavelet { name: String },
    /// The extension-mode name is not recognised.
    InvalidMode { name: String },
    /// An axis is too short for the filter or for the requested level count.
    InsufficientSignalLength {
        axis: usize,
        length: usize,
        required: usize,
    },
    /// A level count of zero was requested. `max` is the deepest request the
    /// signal supports, `None` when any depth is accepted.
    InvalidLevels {
        requested: usize,
        max: Option<usize>,
    },
    /// A coefficient tensor does not have the shape the tree layout implies.
    CoefficientShape {
        level: usize,
        label: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// A sub-band label is malformed, missing from a level, or repeated.
    InvalidLabel { label: String },
    /// A caller-supplied filter bank is unusable.
    InvalidFilter { reason: &'static str },
    /// A dimension-specific entry point received a tensor of the wrong rank.
    RankMismatch { expected: usize, actual: usize },
    /// Tensor data does not fill its shape, or the shape has a zero-length axis.
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    AxisOutOfRange { axis: usize, ndim: usize },
}

pub type Result<T> = core::result::Result<T, WaveletError>;

impl fmt::Display for WaveletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveletError::UnknownWavelet { name } => write!(f, "unknown wavelet '{}'", name),
            WaveletError::InvalidMode { name } => write!(f, "invalid extension mode '{}'", name),
            WaveletError::InsufficientSignalLength {
                axis,
                length,
                required,
            } => write!(
                f,
                "axis {} has length {} but at least {} samples are required",
                axis, length, required
            ),
            WaveletError::InvalidLevels { requested, max } => match max {
                Some(max) => write!(
                    f,
                    "invalid level count {} (signal supports 1..={})",
                    requested, max
                ),
                None => write!(f, "invalid level count {} (must be at least 1)", requested),
            },
            WaveletError::CoefficientShape {
                level,
                label,
                expected,
                actual,
            } => write!(
                f,
                "coefficient '{}' at level {} has shape {:?}, expected {:?}",
                label, level, actual, expected
            ),
            WaveletError::InvalidLabel { label } => write!(f, "invalid sub-band label '{}'", label),
            WaveletError::InvalidFilter { reason } => write!(f, "invalid filter bank: {}", reason),
            WaveletError::RankMismatch { expected, actual } => write!(
                f,
                "expected a tensor of rank {}, got rank {}",
                expected, actual
            ),
            WaveletError::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, actual)
            }
            WaveletError::AxisOutOfRange { axis, ndim } => {
                write!(f, "axis {} is out of range for a rank-{} tensor", axis, ndim)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WaveletError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn display_names_the_offending_value() {
        let e = WaveletError::UnknownWavelet {
            name: "db99".to_string(),
        };
        assert_eq!(e.to_string(), "unknown wavelet 'db99'");
        let e = WaveletError::CoefficientShape {
            level: 1,
            label: "ad".to_string(),
            expected: vec![1, 6, 6],
            actual: vec![1, 6, 5],
        };
        assert!(e.to_string().contains("'ad' at level 1"));
        let e = WaveletError::InvalidLevels {
            requested: 0,
            max: None,
        };
        assert_eq!(e.to_string(), "invalid level count 0 (must be at least 1)");
    }
}
