//! Fully separable multilevel decomposition and reconstruction.
//!
//! Each level splits every spatial axis once, in axis order, on every branch
//! produced so far. Branches live in a flat `Vec` whose index is the sub-band
//! mask: splitting branch `b` yields `2b` (low) and `2b + 1` (high), so after
//! `d` axes the first axis sits in the most significant bit and index 0 is the
//! approximation carried to the next level. Reconstruction walks the axes
//! backwards and merges pairs `(2m, 2m + 1)` into `m` until one tensor is left.
//!
//! Both directions size every stage from the same [`AxisPlan`]s, rebuilt from
//! the signal shape, so padding and cropping always agree.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::coeffs::{CoefficientTree, LevelDetails, SubbandLabel};
use crate::conv::{analyze, synthesize};
use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::padding::{
    apply_pad, check_levels, max_level, supported_levels, AxisPlan, ExtensionMode,
};
use crate::tensor::Tensor;
use crate::wavelet::{FilterBank, Wavelet};

/// A wavelet filter bank paired with a boundary mode, ready for repeated
/// transforms over tensors shaped `[batch, spatial...]`.
#[derive(Clone, Debug)]
pub struct FullySeparable<T: Float> {
    name: String,
    bank: FilterBank<T>,
    mode: ExtensionMode,
}

impl<T: Float> FullySeparable<T> {
    pub fn new(wavelet: &Wavelet, mode: ExtensionMode) -> Self {
        Self {
            name: wavelet.name().to_string(),
            bank: wavelet.filter_bank(),
            mode,
        }
    }

    /// Look up a built-in wavelet by name (`"haar"`, `"db3"`, `"sym5"`, ...).
    pub fn from_name(name: &str, mode: ExtensionMode) -> Result<Self> {
        Ok(Self::new(&Wavelet::from_name(name)?, mode))
    }

    pub fn wavelet_name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> ExtensionMode {
        self.mode
    }

    pub fn filter_len(&self) -> usize {
        self.bank.len()
    }

    /// Level count chosen when none is requested for a signal of `shape`.
    pub fn max_level(&self, shape: &[usize]) -> usize {
        if shape.len() < 2 {
            return 0;
        }
        shape[1..]
            .iter()
            .map(|&n| max_level(n, self.bank.len()))
            .min()
            .unwrap_or(0)
    }

    /// Decompose every spatial axis of `signal` (`[batch, spatial...]`).
    ///
    /// `levels = None` picks [`max_level`](Self::max_level), which may be 0.
    pub fn decompose(
        &self,
        signal: &Tensor<T>,
        levels: Option<usize>,
    ) -> Result<CoefficientTree<T>> {
        if signal.ndim() < 2 {
            return Err(WaveletError::RankMismatch {
                expected: 2,
                actual: signal.ndim(),
            });
        }
        let axes: Vec<usize> = (1..signal.ndim()).collect();
        let (approx, levels) = decompose_axes(&self.bank, self.mode, signal, &axes, levels)?;
        Ok(CoefficientTree::from_raw(approx, levels, signal.shape().to_vec()))
    }

    /// Invert [`decompose`](Self::decompose), cropping to the tree's signal shape.
    pub fn reconstruct(&self, tree: &CoefficientTree<T>) -> Result<Tensor<T>> {
        let axes: Vec<usize> = (1..tree.signal_shape().len()).collect();
        reconstruct_axes(&self.bank, tree.approx(), tree.levels(), tree.signal_shape(), &axes)
    }
}

/// Decompose `signal` with the named wavelet.
pub fn decompose<T: Float>(
    signal: &Tensor<T>,
    wavelet: &str,
    mode: ExtensionMode,
    levels: Option<usize>,
) -> Result<CoefficientTree<T>> {
    FullySeparable::from_name(wavelet, mode)?.decompose(signal, levels)
}

/// Reconstruct a signal from `tree` with the named wavelet.
///
/// The boundary mode is not needed: padded samples only ever land in the
/// cropped margins.
pub fn reconstruct<T: Float>(tree: &CoefficientTree<T>, wavelet: &str) -> Result<Tensor<T>> {
    FullySeparable::from_name(wavelet, ExtensionMode::default())?.reconstruct(tree)
}

/// Level count for `axes` of `shape`: validates an explicit request, or applies
/// the unspecified-level rule.
pub(crate) fn resolve_levels(
    shape: &[usize],
    axes: &[usize],
    filter_len: usize,
    levels: Option<usize>,
) -> Result<usize> {
    match levels {
        None => {
            let shortest = axes.iter().map(|&a| shape[a]).min().unwrap_or(0);
            let chosen = axes
                .iter()
                .map(|&a| max_level(shape[a], filter_len))
                .min()
                .unwrap_or(0);
            if chosen == 0 {
                trace_dwt!(
                    "shortest axis ({} samples) too short for {} taps; no levels",
                    shortest,
                    filter_len
                );
            } else {
                trace_dwt!("chose {} levels for shape {:?}", chosen, shape);
            }
            Ok(chosen)
        }
        Some(0) => Err(WaveletError::InvalidLevels {
            requested: 0,
            max: axes
                .iter()
                .filter_map(|&a| supported_levels(shape[a], filter_len))
                .min(),
        }),
        Some(requested) => {
            for &axis in axes {
                check_levels(axis, shape[axis], filter_len, requested)?;
            }
            let default = axes
                .iter()
                .map(|&a| max_level(shape[a], filter_len))
                .min()
                .unwrap_or(0);
            if requested > default {
                trace_dwt!(
                    "{} levels requested for {:?}, past the default depth {}",
                    requested,
                    shape,
                    default
                );
            }
            Ok(requested)
        }
    }
}

/// Shape of every band at `stage` (0 = finest).
fn stage_shape(
    signal_shape: &[usize],
    axes: &[usize],
    plans: &[AxisPlan],
    stage: usize,
) -> Vec<usize> {
    let mut shape = signal_shape.to_vec();
    for (&axis, plan) in axes.iter().zip(plans) {
        shape[axis] = plan.stages()[stage].output_len;
    }
    shape
}

/// Split `signal` along each of `axes` per level. Returns the coarsest
/// approximation and the detail levels, coarsest first.
pub(crate) fn decompose_axes<T: Float>(
    bank: &FilterBank<T>,
    mode: ExtensionMode,
    signal: &Tensor<T>,
    axes: &[usize],
    levels: Option<usize>,
) -> Result<(Tensor<T>, Vec<LevelDetails<T>>)> {
    for &axis in axes {
        signal.check_axis(axis)?;
    }
    let shape = signal.shape();
    let levels = resolve_levels(shape, axes, bank.len(), levels)?;
    let plans: Vec<AxisPlan> = axes
        .iter()
        .map(|&a| AxisPlan::new(shape[a], bank.len(), levels))
        .collect();
    for (&axis, plan) in axes.iter().zip(&plans) {
        trace_dwt!("axis {} plan: {:?}", axis, plan.stages());
    }

    let mut approx = signal.clone();
    let mut details = Vec::with_capacity(levels);
    for stage in 0..levels {
        let mut branches = vec![approx];
        for (&axis, plan) in axes.iter().zip(&plans) {
            let pad = plan.stages()[stage].pad;
            let mut split = Vec::with_capacity(branches.len() * 2);
            for branch in &branches {
                let padded = apply_pad(branch, axis, pad.left, pad.right, mode)?;
                let (lo, hi) = analyze(&padded, axis, &bank.dec_lo, &bank.dec_hi)?;
                split.push(lo);
                split.push(hi);
            }
            branches = split;
        }
        approx = branches.remove(0);
        trace_dwt!(
            "decomposed level {} of {}: bands {:?}",
            levels - stage,
            levels,
            approx.shape()
        );
        details.push(LevelDetails::from_bands(axes.len(), branches));
    }
    details.reverse();
    Ok((approx, details))
}

/// Merge `levels` (coarsest first) back onto `approx` along `axes` and crop to
/// `signal_shape`.
pub(crate) fn reconstruct_axes<T: Float>(
    bank: &FilterBank<T>,
    approx: &Tensor<T>,
    levels: &[LevelDetails<T>],
    signal_shape: &[usize],
    axes: &[usize],
) -> Result<Tensor<T>> {
    let dims = axes.len();
    let count = levels.len();
    let plans: Vec<AxisPlan> = axes
        .iter()
        .map(|&a| AxisPlan::new(signal_shape[a], bank.len(), count))
        .collect();

    let expected = if count == 0 {
        signal_shape.to_vec()
    } else {
        stage_shape(signal_shape, axes, &plans, count - 1)
    };
    if approx.shape() != expected.as_slice() {
        return Err(WaveletError::CoefficientShape {
            level: 0,
            label: SubbandLabel::approximation(dims).to_string(),
            expected,
            actual: approx.shape().to_vec(),
        });
    }

    let mut current = approx.clone();
    for (idx, level) in levels.iter().enumerate() {
        let stage = count - 1 - idx;
        let expected = stage_shape(signal_shape, axes, &plans, stage);
        if level.dims() != dims || level.len() != (1usize << dims) - 1 {
            let (label, actual) = level
                .iter()
                .next()
                .map(|(l, b)| (l.to_string(), b.shape().to_vec()))
                .unwrap_or_default();
            return Err(WaveletError::CoefficientShape {
                level: idx + 1,
                label,
                expected,
                actual,
            });
        }
        for (label, band) in level.iter() {
            if band.shape() != expected.as_slice() {
                return Err(WaveletError::CoefficientShape {
                    level: idx + 1,
                    label: label.to_string(),
                    expected,
                    actual: band.shape().to_vec(),
                });
            }
        }

        let mut branches = Vec::with_capacity(1 << dims);
        branches.push(current);
        branches.extend(level.bands().iter().cloned());
        for (&axis, plan) in axes.iter().zip(&plans).rev() {
            let s = plan.stages()[stage];
            let mut merged = Vec::with_capacity(branches.len() / 2);
            for pair in branches.chunks_exact(2) {
                let full = synthesize(&pair[0], &pair[1], axis, &bank.rec_lo, &bank.rec_hi)?;
                merged.push(full.narrow(axis, s.pad.left, s.input_len)?);
            }
            branches = merged;
        }
        current = branches.remove(0);
        trace_dwt!("reconstructed level {}: {:?}", count - idx, current.shape());
    }
    Ok(current)
}


#[cfg(all(feature = "internal-tests", test))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn perfect_reconstruction_random_shapes(
            rows in 2usize..24,
            cols in 2usize..24,
            seed in any::<u64>(),
            wavelet in prop::sample::select(vec!["haar", "db2", "db4", "sym4", "coif2"]),
        ) {
            use rand::{Rng, SeedableRng};
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let x = Tensor::from_fn(&[2, rows, cols], |_| rng.gen_range(-1.0..1.0)).unwrap();
            let fs = FullySeparable::<f64>::from_name(wavelet, ExtensionMode::Reflect).unwrap();
            let levels = supported_levels(rows.min(cols), fs.filter_len())
                .map_or(3, |max| max.min(3));
            let tree = fs.decompose(&x, Some(levels)).unwrap();
            let y = fs.reconstruct(&tree).unwrap();
            prop_assert!(y.max_abs_diff(&x).unwrap() < 1e-9);
        }
    }
}
