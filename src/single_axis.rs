//! Multilevel DWT along a single axis of a tensor.
//!
//! Every other axis, including axis 0, is treated as batch. Sizes follow the
//! same padding plan as the separable transform, so a `[batch, n]` signal
//! decomposed along axis 1 gives exactly the coefficients of
//! [`decompose_1d`](crate::ndwt::decompose_1d).

use alloc::vec;
use alloc::vec::Vec;

use crate::coeffs::LevelDetails;
use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::padding::ExtensionMode;
use crate::separable::{decompose_axes, reconstruct_axes};
use crate::tensor::{check_shape, Tensor};
use crate::wavelet::Wavelet;

/// Coefficients of [`wavedec`]: details are ordered coarsest first.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisCoefficients<T: Float> {
    pub approx: Tensor<T>,
    pub details: Vec<Tensor<T>>,
    pub axis: usize,
    pub signal_shape: Vec<usize>,
}

impl<T: Float> AxisCoefficients<T> {
    pub fn level_count(&self) -> usize {
        self.details.len()
    }
}

/// Decompose `signal` along `axis`. `levels = None` picks the deepest level the
/// axis supports for this wavelet (possibly 0).
pub fn wavedec<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
    axis: usize,
) -> Result<AxisCoefficients<T>> {
    let bank = Wavelet::from_name(wavelet)?.filter_bank::<T>();
    let (approx, levels) = decompose_axes(&bank, mode, signal, &[axis], levels)?;
    let details = levels.into_iter().flat_map(|l| l.into_bands()).collect();
    Ok(AxisCoefficients {
        approx,
        details,
        axis,
        signal_shape: signal.shape().to_vec(),
    })
}

/// Invert [`wavedec`], cropping to the recorded signal shape.
pub fn waverec<T: Float>(coeffs: &AxisCoefficients<T>, wavelet: &str) -> Result<Tensor<T>> {
    let bank = Wavelet::from_name(wavelet)?.filter_bank::<T>();
    check_shape(&coeffs.signal_shape)?;
    if coeffs.axis >= coeffs.signal_shape.len() {
        return Err(WaveletError::AxisOutOfRange {
            axis: coeffs.axis,
            ndim: coeffs.signal_shape.len(),
        });
    }
    let levels: Vec<LevelDetails<T>> = coeffs
        .details
        .iter()
        .map(|d| LevelDetails::from_bands(1, vec![d.clone()]))
        .collect();
    reconstruct_axes(&bank, &coeffs.approx, &levels, &coeffs.signal_shape, &[coeffs.axis])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_axis_roundtrip() {
        let x = Tensor::<f64>::from_fn(&[2, 37, 3], |ix| {
            libm::sin((ix[1] * (ix[2] + 1)) as f64 * 0.3) + ix[0] as f64
        })
        .unwrap();
        let c = wavedec(&x, "sym4", ExtensionMode::Reflect, Some(3), 1).unwrap();
        assert_eq!(c.level_count(), 3);
        // 37 -> 22 -> 14 -> 10 with eight taps.
        assert_eq!(c.approx.shape(), &[2, 10, 3]);
        assert_eq!(c.details[2].shape(), &[2, 22, 3]);
        let y = waverec(&c, "sym4").unwrap();
        assert!(y.max_abs_diff(&x).unwrap() < 1e-10);
    }

    #[test]
    fn test_batch_axis_may_be_transformed() {
        let x =
            Tensor::<f64>::from_fn(&[16, 2], |ix| (ix[0] * ix[0]) as f64 - ix[1] as f64).unwrap();
        let c = wavedec(&x, "haar", ExtensionMode::Zero, None, 0).unwrap();
        assert_eq!(c.level_count(), 4);
        assert!(waverec(&c, "haar").unwrap().max_abs_diff(&x).unwrap() < 1e-10);
    }

    #[test]
    fn test_bad_coefficients_are_rejected() {
        let x = Tensor::<f64>::zeros(&[1, 32]).unwrap();
        let mut c = wavedec(&x, "db2", ExtensionMode::Reflect, Some(2), 1).unwrap();
        c.details[1] = Tensor::zeros(&[1, 3]).unwrap();
        match waverec(&c, "db2") {
            Err(WaveletError::CoefficientShape { level, label, .. }) => {
                assert_eq!((level, label.as_str()), (2, "d"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        c.axis = 2;
        assert!(matches!(
            waverec(&c, "db2"),
            Err(WaveletError::AxisOutOfRange { axis: 2, ndim: 2 })
        ));
        assert!(wavedec(&x, "db2", ExtensionMode::Reflect, None, 2).is_err());
    }
}
