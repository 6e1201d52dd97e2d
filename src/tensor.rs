//! Row-major N-D tensor used as the transform's signal and coefficient container.
//!
//! Axis 0 is the batch axis; the transforms never touch it. Every axis-wise
//! operation in the crate goes through [`Tensor::map_lanes`] or
//! [`Tensor::zip_lanes`], which visit each 1-D lane along one axis. A lane is
//! contiguous when the axis is the last one and strided otherwise; strided lanes
//! are gathered into a scratch buffer before the kernel runs.
//!
//! With the `parallel` feature, outer blocks of lanes are split across a Rayon
//! pool once the tensor reaches [`parallel_threshold`] elements.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Result, WaveletError};
use crate::num::Float;

#[cfg(feature = "parallel")]
use core::sync::atomic::{AtomicUsize, Ordering};
#[cfg(feature = "parallel")]
use std::sync::OnceLock;

/// Override for the parallel lane threshold. `0` means use the heuristic.
#[cfg(feature = "parallel")]
static PARALLEL_THRESHOLD_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
#[cfg(feature = "parallel")]
static PARALLEL_THRESHOLD: OnceLock<usize> = OnceLock::new();

/// Set the minimum element count before lane kernels run on the Rayon pool.
///
/// Passing `0` restores the heuristic (`FSWT_PAR_THRESHOLD`, or
/// `FSWT_PAR_PER_CORE_WORK` times the number of cores).
#[cfg(feature = "parallel")]
pub fn set_parallel_threshold(elements: usize) {
    PARALLEL_THRESHOLD_OVERRIDE.store(elements, Ordering::Relaxed);
}

/// Current minimum element count for parallel lane processing.
#[cfg(feature = "parallel")]
pub fn parallel_threshold() -> usize {
    let o = PARALLEL_THRESHOLD_OVERRIDE.load(Ordering::Relaxed);
    if o != 0 {
        return o;
    }
    *PARALLEL_THRESHOLD.get_or_init(|| {
        let env_threshold = std::env::var("FSWT_PAR_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        if env_threshold != 0 {
            return env_threshold;
        }
        let per_core_work = std::env::var("FSWT_PAR_PER_CORE_WORK")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(16 * 1024);
        per_core_work * num_cpus::get().max(1)
    })
}

/// Owned row-major tensor. Shapes always have at least one axis and no axis
/// of length zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T: Float> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Float> Tensor<T> {
    /// Wrap `data` (row-major) in a tensor of the given shape.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        check_shape(shape)?;
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(WaveletError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![data.len()],
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn zeros(shape: &[usize]) -> Result<Self> {
        check_shape(shape)?;
        let n = shape.iter().product();
        Ok(Self {
            shape: shape.to_vec(),
            data: vec![T::zero(); n],
        })
    }

    /// Build a tensor by evaluating `f` at every multi-index, in row-major order.
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Result<Self>
    where
        F: FnMut(&[usize]) -> T,
    {
        check_shape(shape)?;
        let n: usize = shape.iter().product();
        let mut data = Vec::with_capacity(n);
        let mut index = vec![0usize; shape.len()];
        for _ in 0..n {
            data.push(f(&index));
            for ax in (0..shape.len()).rev() {
                index[ax] += 1;
                if index[ax] < shape[ax] {
                    break;
                }
                index[ax] = 0;
            }
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a full multi-index, or `None` when out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &n) in index.iter().zip(self.shape.iter()) {
            if i >= n {
                return None;
            }
            offset = offset * n + i;
        }
        self.data.get(offset).copied()
    }

    /// Copy of `len` samples starting at `start` along `axis`.
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<Self> {
        self.check_axis(axis)?;
        let n = self.shape[axis];
        if len == 0 || start + len > n {
            let mut wanted = self.shape.clone();
            wanted[axis] = start + len;
            return Err(WaveletError::ShapeMismatch {
                expected: wanted,
                actual: self.shape.clone(),
            });
        }
        Ok(self.map_lanes(axis, len, |lane, out| {
            out.copy_from_slice(&lane[start..start + len]);
        }))
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> Result<T> {
        if self.shape != other.shape {
            return Err(WaveletError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
            });
        }
        let mut max = T::zero();
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            let d = (a - b).abs();
            if d > max {
                max = d;
            }
        }
        Ok(max)
    }

    /// BLAKE3 digest over the shape and the exact bit pattern of every value.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        self.hash_into(&mut hasher);
        *hasher.finalize().as_bytes()
    }

    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&(self.shape.len() as u64).to_le_bytes());
        for &n in &self.shape {
            hasher.update(&(n as u64).to_le_bytes());
        }
        for &v in &self.data {
            hasher.update(&v.to_f64().to_bits().to_le_bytes());
        }
    }

    pub(crate) fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.shape.len() {
            return Err(WaveletError::AxisOutOfRange {
                axis,
                ndim: self.shape.len(),
            });
        }
        Ok(())
    }

    /// `(outer, len, inner)`: number of lane blocks, lane length, lane stride.
    fn lane_geometry(&self, axis: usize) -> (usize, usize, usize) {
        let outer = self.shape[..axis].iter().product();
        let inner = self.shape[axis + 1..].iter().product();
        (outer, self.shape[axis], inner)
    }

    /// Apply `f` to every lane along `axis`, producing lanes of `out_len`.
    ///
    /// `f` must overwrite every sample of its output lane. `axis` must be valid.
    pub(crate) fn map_lanes<F>(&self, axis: usize, out_len: usize, f: F) -> Tensor<T>
    where
        F: Fn(&[T], &mut [T]) + Sync,
    {
        let (outer, len, inner) = self.lane_geometry(axis);
        let mut shape = self.shape.clone();
        shape[axis] = out_len;
        let mut data = vec![T::zero(); outer * out_len * inner];
        let in_block = len * inner;
        let out_block = out_len * inner;

        let kernel = |src: &[T], dst: &mut [T]| {
            if inner == 1 {
                f(src, dst);
                return;
            }
            let mut lane = vec![T::zero(); len];
            let mut out = vec![T::zero(); out_len];
            for i in 0..inner {
                for (j, v) in lane.iter_mut().enumerate() {
                    *v = src[j * inner + i];
                }
                f(&lane, &mut out);
                for (j, &v) in out.iter().enumerate() {
                    dst[j * inner + i] = v;
                }
            }
        };

        #[cfg(feature = "parallel")]
        if outer > 1 && self.data.len() >= parallel_threshold() {
            use rayon::prelude::*;
            self.data
                .par_chunks(in_block)
                .zip(data.par_chunks_mut(out_block))
                .for_each(|(src, dst)| kernel(src, dst));
            return Tensor { shape, data };
        }

        self.data
            .chunks(in_block)
            .zip(data.chunks_mut(out_block))
            .for_each(|(src, dst)| kernel(src, dst));
        Tensor { shape, data }
    }

    /// Like [`map_lanes`](Self::map_lanes) over the lanes of two tensors of
    /// identical shape. The caller checks the shapes.
    pub(crate) fn zip_lanes<F>(&self, other: &Self, axis: usize, out_len: usize, f: F) -> Tensor<T>
    where
        F: Fn(&[T], &[T], &mut [T]) + Sync,
    {
        debug_assert_eq!(self.shape, other.shape);
        let (outer, len, inner) = self.lane_geometry(axis);
        let mut shape = self.shape.clone();
        shape[axis] = out_len;
        let mut data = vec![T::zero(); outer * out_len * inner];
        let in_block = len * inner;
        let out_block = out_len * inner;

        let kernel = |a: &[T], b: &[T], dst: &mut [T]| {
            if inner == 1 {
                f(a, b, dst);
                return;
            }
            let mut lane_a = vec![T::zero(); len];
            let mut lane_b = vec![T::zero(); len];
            let mut out = vec![T::zero(); out_len];
            for i in 0..inner {
                for j in 0..len {
                    lane_a[j] = a[j * inner + i];
                    lane_b[j] = b[j * inner + i];
                }
                f(&lane_a, &lane_b, &mut out);
                for (j, &v) in out.iter().enumerate() {
                    dst[j * inner + i] = v;
                }
            }
        };

        #[cfg(feature = "parallel")]
        if outer > 1 && self.data.len() >= parallel_threshold() {
            use rayon::prelude::*;
            self.data
                .par_chunks(in_block)
                .zip(other.data.par_chunks(in_block))
                .zip(data.par_chunks_mut(out_block))
                .for_each(|((a, b), dst)| kernel(a, b, dst));
            return Tensor { shape, data };
        }

        self.data
            .chunks(in_block)
            .zip(other.data.chunks(in_block))
            .zip(data.chunks_mut(out_block))
            .for_each(|((a, b), dst)| kernel(a, b, dst));
        Tensor { shape, data }
    }

    /// Like [`map_lanes`](Self::map_lanes) but each lane feeds two outputs of
    /// `out_len` samples, e.g. the low and high band of one analysis stage.
    pub(crate) fn split_lanes<F>(&self, axis: usize, out_len: usize, f: F) -> (Tensor<T>, Tensor<T>)
    where
        F: Fn(&[T], &mut [T], &mut [T]) + Sync,
    {
        let (outer, len, inner) = self.lane_geometry(axis);
        let mut shape = self.shape.clone();
        shape[axis] = out_len;
        let mut first = vec![T::zero(); outer * out_len * inner];
        let mut second = vec![T::zero(); outer * out_len * inner];
        let in_block = len * inner;
        let out_block = out_len * inner;

        let kernel = |src: &[T], a: &mut [T], b: &mut [T]| {
            if inner == 1 {
                f(src, a, b);
                return;
            }
            let mut lane = vec![T::zero(); len];
            let mut out_a = vec![T::zero(); out_len];
            let mut out_b = vec![T::zero(); out_len];
            for i in 0..inner {
                for (j, v) in lane.iter_mut().enumerate() {
                    *v = src[j * inner + i];
                }
                f(&lane, &mut out_a, &mut out_b);
                for j in 0..out_len {
                    a[j * inner + i] = out_a[j];
                    b[j * inner + i] = out_b[j];
                }
            }
        };

        #[cfg(feature = "parallel")]
        if outer > 1 && self.data.len() >= parallel_threshold() {
            use rayon::prelude::*;
            self.data
                .par_chunks(in_block)
                .zip(first.par_chunks_mut(out_block))
                .zip(second.par_chunks_mut(out_block))
                .for_each(|((src, a), b)| kernel(src, a, b));
            return (
                Tensor { shape: shape.clone(), data: first },
                Tensor { shape, data: second },
            );
        }

        self.data
            .chunks(in_block)
            .zip(first.chunks_mut(out_block))
            .zip(second.chunks_mut(out_block))
            .for_each(|((src, a), b)| kernel(src, a, b));
        (
            Tensor {
                shape: shape.clone(),
                data: first,
            },
            Tensor {
                shape,
                data: second,
            },
        )
    }
}

pub(crate) fn check_shape(shape: &[usize]) -> Result<()> {
    if shape.is_empty() || shape.contains(&0) {
        return Err(WaveletError::ShapeMismatch {
            expected: vec![1; shape.len().max(1)],
            actual: shape.to_vec(),
        });
    }
    Ok(())
}
