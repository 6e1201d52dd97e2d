//! Strided two-channel filtering along one axis.
//!
//! [`analyze`] correlates an already padded axis with the decomposition pair and
//! keeps every second output; [`synthesize`] is its adjoint: it upsamples both
//! bands by two and accumulates them through the reconstruction pair. For an
//! orthogonal bank the adjoint is the inverse on the interior of the axis, so
//! cropping the padding back off recovers the input exactly.

use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::tensor::Tensor;

/// One analysis stage on a single lane.
///
/// `lo[i] = sum_k dec_lo[L-1-k] * x[2i+k]`, likewise for `hi`.
/// `x.len()` must be at least the filter length; `lo` and `hi` hold
/// `(x.len() - L) / 2 + 1` samples.
#[inline]
pub fn analysis_lane<T: Float>(x: &[T], dec_lo: &[T], dec_hi: &[T], lo: &mut [T], hi: &mut [T]) {
    let taps = dec_lo.len();
    for (i, (l, h)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
        let window = &x[2 * i..2 * i + taps];
        let mut acc_lo = T::zero();
        let mut acc_hi = T::zero();
        for (k, &v) in window.iter().enumerate() {
            acc_lo = dec_lo[taps - 1 - k].mul_add(v, acc_lo);
            acc_hi = dec_hi[taps - 1 - k].mul_add(v, acc_hi);
        }
        *l = acc_lo;
        *h = acc_hi;
    }
}

/// One synthesis stage on a single lane.
///
/// `out[j] = sum_i lo[i] * rec_lo[j-2i] + hi[i] * rec_hi[j-2i]`, with
/// `out.len() == 2 * lo.len() + L - 2`. `out` is cleared first.
#[inline]
pub fn synthesis_lane<T: Float>(lo: &[T], hi: &[T], rec_lo: &[T], rec_hi: &[T], out: &mut [T]) {
    for v in out.iter_mut() {
        *v = T::zero();
    }
    for (i, (&a, &d)) in lo.iter().zip(hi.iter()).enumerate() {
        let dst = &mut out[2 * i..];
        for ((o, &g), &h) in dst.iter_mut().zip(rec_lo).zip(rec_hi) {
            *o = a.mul_add(g, d.mul_add(h, *o));
        }
    }
}

/// Split `axis` of a padded tensor into its low and high band.
///
/// Fails when the axis is shorter than the filter.
pub fn analyze<T: Float>(
    tensor: &Tensor<T>,
    axis: usize,
    dec_lo: &[T],
    dec_hi: &[T],
) -> Result<(Tensor<T>, Tensor<T>)> {
    tensor.check_axis(axis)?;
    let taps = dec_lo.len();
    if taps < 2 || dec_hi.len() != taps {
        return Err(WaveletError::InvalidFilter {
            reason: "analysis filters must share a length of at least 2",
        });
    }
    let n = tensor.shape()[axis];
    if n < taps {
        return Err(WaveletError::InsufficientSignalLength {
            axis,
            length: n,
            required: taps,
        });
    }
    let out_len = (n - taps) / 2 + 1;
    Ok(tensor.split_lanes(axis, out_len, |x, lo, hi| {
        analysis_lane(x, dec_lo, dec_hi, lo, hi)
    }))
}

/// Merge a low and a high band along `axis`; the result holds
/// `2 * m + L - 2` samples for `m` coefficients per band.
pub fn synthesize<T: Float>(
    lo: &Tensor<T>,
    hi: &Tensor<T>,
    axis: usize,
    rec_lo: &[T],
    rec_hi: &[T],
) -> Result<Tensor<T>> {
    lo.check_axis(axis)?;
    if lo.shape() != hi.shape() {
        return Err(WaveletError::ShapeMismatch {
            expected: lo.shape().to_vec(),
            actual: hi.shape().to_vec(),
        });
    }
    let taps = rec_lo.len();
    if taps < 2 || rec_hi.len() != taps {
        return Err(WaveletError::InvalidFilter {
            reason: "synthesis filters must share a length of at least 2",
        });
    }
    let out_len = 2 * lo.shape()[axis] + taps - 2;
    Ok(lo.zip_lanes(hi, axis, out_len, |a, d, out| {
        synthesis_lane(a, d, rec_lo, rec_hi, out)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::{apply_pad, stage_pad, ExtensionMode};
    use crate::wavelet::Wavelet;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_haar_pairs() {
        let bank = Wavelet::from_name("haar").unwrap().filter_bank::<f64>();
        let x = Tensor::from_vec(&[1, 4], vec![1.0, 3.0, 4.0, 8.0]).unwrap();
        let (lo, hi) = analyze(&x, 1, &bank.dec_lo, &bank.dec_hi).unwrap();
        let s = core::f64::consts::FRAC_1_SQRT_2;
        let want_lo = [4.0 * s, 12.0 * s];
        let want_hi = [-2.0 * s, -4.0 * s];
        for k in 0..2 {
            assert!((lo.as_slice()[k] - want_lo[k]).abs() < 1e-12);
            assert!((hi.as_slice()[k] - want_hi[k]).abs() < 1e-12);
        }
        let back = synthesize(&lo, &hi, 1, &bank.rec_lo, &bank.rec_hi).unwrap();
        assert!(back.max_abs_diff(&x).unwrap() < 1e-12);
    }

    #[test]
    fn test_pad_analyze_synthesize_crop_recovers_lane() {
        let x: Vec<f64> = (0..23).map(|i| libm::sin(i as f64 * 0.7) + i as f64 * 0.1).collect();
        for name in ["db2", "db4", "sym6", "coif2"] {
            let bank = Wavelet::from_name(name).unwrap().filter_bank::<f64>();
            let t = Tensor::from_vec(&[2, 23], [x.clone(), x.clone()].concat()).unwrap();
            let pad = stage_pad(23, bank.len());
            let p = apply_pad(&t, 1, pad.left, pad.right, ExtensionMode::Symmetric).unwrap();
            let (lo, hi) = analyze(&p, 1, &bank.dec_lo, &bank.dec_hi).unwrap();
            assert_eq!(lo.shape()[1], (23 + bank.len() - 1) / 2);
            let y = synthesize(&lo, &hi, 1, &bank.rec_lo, &bank.rec_hi).unwrap();
            assert_eq!(y.shape(), p.shape());
            let y = y.narrow(1, pad.left, 23).unwrap();
            assert!(y.max_abs_diff(&t).unwrap() < 1e-10, "{}", name);
        }
    }

    #[test]
    fn test_errors() {
        let bank = Wavelet::from_name("db4").unwrap().filter_bank::<f64>();
        let short = Tensor::<f64>::zeros(&[1, 5]).unwrap();
        assert_eq!(
            analyze(&short, 1, &bank.dec_lo, &bank.dec_hi).unwrap_err(),
            WaveletError::InsufficientSignalLength { axis: 1, length: 5, required: 8 }
        );
        let a = Tensor::<f64>::zeros(&[1, 3]).unwrap();
        let b = Tensor::<f64>::zeros(&[1, 4]).unwrap();
        assert!(matches!(
            synthesize(&a, &b, 1, &bank.rec_lo, &bank.rec_hi),
            Err(WaveletError::ShapeMismatch { .. })
        ));
    }
}
