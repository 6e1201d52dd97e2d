//! Boundary extension and padding plans.
//!
//! One decomposition stage on an axis of length `n` with a filter of length `L`
//! pads `L - 2` samples on the left and `L - 2 + (n mod 2)` on the right. The
//! padded length is then even and at least `L`, no filter tap ever reads past
//! the padded buffer, and the stage produces `(n + L - 1) / 2` coefficients.
//! [`AxisPlan`] chains that rule over all levels; decomposition and
//! reconstruction both derive their sizes from it so the two directions agree.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::tensor::Tensor;

/// How samples beyond the signal boundary are synthesised.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ExtensionMode {
    /// Mirror about the edge sample without repeating it: `d c b | a b c d | c b a`.
    #[default]
    Reflect,
    /// Mirror including the edge sample: `c b a | a b c d | d c b`.
    Symmetric,
    /// Wrap around: `b c d | a b c d | a b c`.
    Periodic,
    Zero,
    /// Repeat the edge sample.
    Constant,
}

impl ExtensionMode {
    pub const ALL: [ExtensionMode; 5] = [
        ExtensionMode::Reflect,
        ExtensionMode::Symmetric,
        ExtensionMode::Periodic,
        ExtensionMode::Zero,
        ExtensionMode::Constant,
    ];

    /// Index into a lane of length `n` that supplies padded position `i`,
    /// or `None` when the position is zero-filled.
    fn source_index(self, i: isize, n: usize) -> Option<usize> {
        let len = n as isize;
        if (0..len).contains(&i) {
            return Some(i as usize);
        }
        match self {
            ExtensionMode::Reflect => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * (len - 1);
                let m = i.rem_euclid(period);
                Some(if m >= len { period - m } else { m } as usize)
            }
            ExtensionMode::Symmetric => {
                let period = 2 * len;
                let m = i.rem_euclid(period);
                Some(if m >= len { period - 1 - m } else { m } as usize)
            }
            ExtensionMode::Periodic => Some(i.rem_euclid(len) as usize),
            ExtensionMode::Zero => None,
            ExtensionMode::Constant => Some(if i < 0 { 0 } else { n - 1 }),
        }
    }

    /// Write `lane` extended by `left` and `right` samples into `out`.
    ///
    /// `out.len()` must equal `left + lane.len() + right`.
    pub fn pad_lane<T: Float>(self, lane: &[T], left: usize, right: usize, out: &mut [T]) {
        debug_assert_eq!(out.len(), left + lane.len() + right);
        let n = lane.len();
        out[left..left + n].copy_from_slice(lane);
        let edges = (0..left).chain(left + n..left + n + right);
        for pos in edges {
            let i = pos as isize - left as isize;
            out[pos] = match self.source_index(i, n) {
                Some(src) => lane[src],
                None => T::zero(),
            };
        }
    }
}

impl fmt::Display for ExtensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtensionMode::Reflect => "reflect",
            ExtensionMode::Symmetric => "symmetric",
            ExtensionMode::Periodic => "periodic",
            ExtensionMode::Zero => "zero",
            ExtensionMode::Constant => "constant",
        };
        f.write_str(name)
    }
}

impl FromStr for ExtensionMode {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflect" => Ok(ExtensionMode::Reflect),
            "symmetric" => Ok(ExtensionMode::Symmetric),
            "periodic" => Ok(ExtensionMode::Periodic),
            "zero" => Ok(ExtensionMode::Zero),
            "constant" => Ok(ExtensionMode::Constant),
            _ => Err(WaveletError::InvalidMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Left and right pad amounts for one stage on one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PadRecord {
    pub left: usize,
    pub right: usize,
}

impl PadRecord {
    pub fn total(&self) -> usize {
        self.left + self.right
    }
}

/// Padding for one stage on an axis of length `axis_length`.
pub fn stage_pad(axis_length: usize, filter_length: usize) -> PadRecord {
    let base = filter_length.saturating_sub(2);
    PadRecord {
        left: base,
        right: base + axis_length % 2,
    }
}

/// Coefficients one analysis stage produces from an axis of length `padded_length`.
pub fn analysis_len(padded_length: usize, filter_length: usize) -> usize {
    (padded_length - filter_length) / 2 + 1
}

/// Padding for the first of `levels` stages on an axis, after checking that the
/// axis supports that many levels.
pub fn compute_pad(axis_length: usize, filter_length: usize, levels: usize) -> Result<PadRecord> {
    check_levels(0, axis_length, filter_length, levels)?;
    Ok(stage_pad(axis_length, filter_length))
}

/// Deepest level count the unspecified-level rule picks: the largest `k` with
/// `(filter_length - 1) * 2^k <= axis_length`.
pub fn max_level(axis_length: usize, filter_length: usize) -> usize {
    let unit = filter_length.saturating_sub(1).max(1);
    let mut level = 0;
    while level < usize::BITS as usize - 1 && (unit << (level + 1)) <= axis_length {
        level += 1;
    }
    level
}

/// Most levels an explicit request may ask for on an axis of `axis_length`.
///
/// A stage needs at least two samples to split. Stage lengths follow
/// `n -> (n + L - 1) / 2`, which settles at `L - 2` or `L - 1`, so only filters
/// short enough to reach a single sample impose a limit. `None` means any depth
/// is accepted.
pub fn supported_levels(axis_length: usize, filter_length: usize) -> Option<usize> {
    let mut len = axis_length;
    let mut levels = 0;
    while len > 1 {
        let next = stage_output_len(len, filter_length);
        if next == len {
            return None;
        }
        len = next;
        levels += 1;
    }
    Some(levels)
}

fn stage_output_len(axis_length: usize, filter_length: usize) -> usize {
    analysis_len(axis_length + stage_pad(axis_length, filter_length).total(), filter_length)
}

/// Shortest axis that supports `levels` stages with a filter of `filter_length`.
fn required_length(filter_length: usize, levels: usize) -> usize {
    let supports = |n: usize| supported_levels(n, filter_length).map_or(true, |max| max >= levels);
    let mut hi = 2;
    while !supports(hi) {
        match hi.checked_mul(2) {
            Some(next) => hi = next,
            None => return usize::MAX,
        }
    }
    let mut lo = hi / 2;
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if supports(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}

/// Validate an explicit level count for the spatial axis `axis`: every stage
/// must start from at least two samples.
pub(crate) fn check_levels(
    axis: usize,
    axis_length: usize,
    filter_length: usize,
    levels: usize,
) -> Result<()> {
    let max = supported_levels(axis_length, filter_length);
    if levels == 0 {
        return Err(WaveletError::InvalidLevels { requested: 0, max });
    }
    if max.is_some_and(|max| levels > max) {
        return Err(WaveletError::InsufficientSignalLength {
            axis,
            length: axis_length,
            required: required_length(filter_length, levels),
        });
    }
    Ok(())
}

/// One stage of an [`AxisPlan`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisStage {
    /// Axis length entering the stage (before padding).
    pub input_len: usize,
    pub pad: PadRecord,
    /// Coefficients produced along the axis.
    pub output_len: usize,
}

/// Per-level sizes for one axis, finest stage first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisPlan {
    stages: Vec<AxisStage>,
}

impl AxisPlan {
    pub fn new(axis_length: usize, filter_length: usize, levels: usize) -> Self {
        let mut stages = Vec::with_capacity(levels);
        let mut len = axis_length;
        for _ in 0..levels {
            let pad = stage_pad(len, filter_length);
            let output_len = analysis_len(len + pad.total(), filter_length);
            stages.push(AxisStage {
                input_len: len,
                pad,
                output_len,
            });
            len = output_len;
        }
        Self { stages }
    }

    /// Stages ordered finest (first decomposition step) to coarsest.
    pub fn stages(&self) -> &[AxisStage] {
        &self.stages
    }

    pub fn levels(&self) -> usize {
        self.stages.len()
    }
}

/// Extend `axis` of `tensor` by `left` and `right` samples according to `mode`.
pub fn apply_pad<T: Float>(
    tensor: &Tensor<T>,
    axis: usize,
    left: usize,
    right: usize,
    mode: ExtensionMode,
) -> Result<Tensor<T>> {
    tensor.check_axis(axis)?;
    if left == 0 && right == 0 {
        return Ok(tensor.clone());
    }
    let n = tensor.shape()[axis];
    Ok(tensor.map_lanes(axis, n + left + right, |lane, out| {
        mode.pad_lane(lane, left, right, out)
    }))
}
