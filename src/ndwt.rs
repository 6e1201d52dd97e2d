//! Rank-specific entry points.
//!
//! `decompose_Nd` expects a tensor shaped `[batch, s1, .., sN]` and fails with
//! [`WaveletError::RankMismatch`] otherwise. The 1-D pair trades the labelled
//! tree for [`Coefficients1d`], whose single detail band per level is a plain
//! tensor.
//!
//! ```
//! use fswt::ndwt::{decompose_2d, reconstruct_2d};
//! use fswt::{ExtensionMode, Tensor};
//!
//! let image = Tensor::<f64>::from_fn(&[1, 12, 12], |ix| (ix[1] * 12 + ix[2]) as f64).unwrap();
//! let tree = decompose_2d(&image, "haar", ExtensionMode::Reflect, Some(1)).unwrap();
//! assert_eq!(tree.levels()[0].get("dd").unwrap().shape(), &[1, 6, 6]);
//! let back = reconstruct_2d(&tree, "haar").unwrap();
//! assert!(back.max_abs_diff(&image).unwrap() < 1e-10);
//! ```

use crate::coeffs::{CoefficientTree, Coefficients1d};
use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::padding::ExtensionMode;
use crate::separable::{decompose, reconstruct};
use crate::tensor::Tensor;

fn check_rank(actual: usize, spatial: usize) -> Result<()> {
    if actual != spatial + 1 {
        return Err(WaveletError::RankMismatch {
            expected: spatial + 1,
            actual,
        });
    }
    Ok(())
}

/// 1-D transform of `[batch, length]` signals.
pub fn decompose_1d<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
) -> Result<Coefficients1d<T>> {
    check_rank(signal.ndim(), 1)?;
    Coefficients1d::from_tree(decompose(signal, wavelet, mode, levels)?)
}

pub fn reconstruct_1d<T: Float>(coeffs: &Coefficients1d<T>, wavelet: &str) -> Result<Tensor<T>> {
    check_rank(coeffs.signal_shape.len(), 1)?;
    let tree = coeffs.clone().into_tree()?;
    reconstruct(&tree, wavelet)
}

/// 2-D transform of `[batch, height, width]` signals.
pub fn decompose_2d<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
) -> Result<CoefficientTree<T>> {
    check_rank(signal.ndim(), 2)?;
    decompose(signal, wavelet, mode, levels)
}

pub fn reconstruct_2d<T: Float>(tree: &CoefficientTree<T>, wavelet: &str) -> Result<Tensor<T>> {
    check_rank(tree.signal_shape().len(), 2)?;
    reconstruct(tree, wavelet)
}

/// 3-D transform of `[batch, depth, height, width]` signals.
pub fn decompose_3d<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
) -> Result<CoefficientTree<T>> {
    check_rank(signal.ndim(), 3)?;
    decompose(signal, wavelet, mode, levels)
}

pub fn reconstruct_3d<T: Float>(tree: &CoefficientTree<T>, wavelet: &str) -> Result<Tensor<T>> {
    check_rank(tree.signal_shape().len(), 3)?;
    reconstruct(tree, wavelet)
}

/// Transform of `[batch, s1, .., sN]` with any `N >= 1`.
pub fn decompose_nd<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
) -> Result<CoefficientTree<T>> {
    decompose(signal, wavelet, mode, levels)
}

pub fn reconstruct_nd<T: Float>(tree: &CoefficientTree<T>, wavelet: &str) -> Result<Tensor<T>> {
    reconstruct(tree, wavelet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_checks() {
        let x = Tensor::<f64>::zeros(&[2, 8, 8]).unwrap();
        assert_eq!(
            decompose_3d(&x, "haar", ExtensionMode::Reflect, None).unwrap_err(),
            WaveletError::RankMismatch { expected: 4, actual: 3 }
        );
        assert!(decompose_1d(&x, "haar", ExtensionMode::Reflect, None).is_err());
        let tree = decompose_2d(&x, "haar", ExtensionMode::Reflect, None).unwrap();
        assert_eq!(tree.level_count(), 3);
        assert!(reconstruct_3d(&tree, "haar").is_err());
        assert!(reconstruct_nd(&tree, "haar").is_ok());
    }

    #[test]
    fn test_1d_container_roundtrip() {
        let x = Tensor::<f64>::from_fn(&[3, 21], |ix| {
            (ix[0] as f64 + 1.0) * libm::cos(ix[1] as f64)
        })
        .unwrap();
        let c = decompose_1d(&x, "db3", ExtensionMode::Periodic, Some(2)).unwrap();
        assert_eq!(c.details.len(), 2);
        // 21 -> 13 -> 9 with six taps; details are stored coarsest first.
        assert_eq!(c.details[0].shape(), &[3, 9]);
        assert_eq!(c.details[1].shape(), &[3, 13]);
        let y = reconstruct_1d(&c, "db3").unwrap();
        assert!(y.max_abs_diff(&x).unwrap() < 1e-10);
    }
}
