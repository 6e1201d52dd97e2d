#![allow(dead_code)]

use fswt::{Tensor, Wavelet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn random_tensor(shape: &[usize], seed: u64) -> Tensor<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Tensor::from_fn(shape, |_| rng.gen_range(-1.0..1.0)).unwrap()
}

pub fn assert_close(a: &Tensor<f64>, b: &Tensor<f64>, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    let diff = a.max_abs_diff(b).unwrap();
    assert!(diff <= tol, "max abs diff {} > {}", diff, tol);
}

/// Orthonormal single-level Haar matrix: rows `0..n/2` low-pass, rows
/// `n/2..n` high-pass.
fn haar_matrix(n: usize) -> Vec<Vec<f64>> {
    assert!(n % 2 == 0, "matrix reference needs even lengths, got {}", n);
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let mut m = vec![vec![0.0; n]; n];
    for r in 0..n / 2 {
        m[r][2 * r] = s;
        m[r][2 * r + 1] = s;
        m[n / 2 + r][2 * r] = s;
        m[n / 2 + r][2 * r + 1] = -s;
    }
    m
}

fn transpose(m: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = m.len();
    (0..n).map(|c| (0..n).map(|r| m[r][c]).collect()).collect()
}

/// `out[.., r, ..] = sum_c m[r][c] * x[.., c, ..]` along `axis`.
fn apply_along(x: &Tensor<f64>, axis: usize, m: &[Vec<f64>]) -> Tensor<f64> {
    let shape = x.shape().to_vec();
    let n = shape[axis];
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();
    let src = x.as_slice();
    let mut out = vec![0.0; src.len()];
    for o in 0..outer {
        for r in 0..n {
            for c in 0..n {
                let w = m[r][c];
                if w == 0.0 {
                    continue;
                }
                for i in 0..inner {
                    out[(o * n + r) * inner + i] += w * src[(o * n + c) * inner + i];
                }
            }
        }
    }
    Tensor::from_vec(&shape, out).unwrap()
}

/// Quadrant of `full` selected by `mask` (first spatial axis = most significant bit).
fn quadrant(full: &Tensor<f64>, mask: usize) -> Tensor<f64> {
    let d = full.ndim() - 1;
    let mut shape = full.shape().to_vec();
    for s in shape.iter_mut().skip(1) {
        *s /= 2;
    }
    Tensor::from_fn(&shape, |ix| {
        let mut src = ix.to_vec();
        for pos in 0..d {
            if (mask >> (d - 1 - pos)) & 1 == 1 {
                src[pos + 1] += shape[pos + 1];
            }
        }
        full.get(&src).unwrap()
    })
    .unwrap()
}

/// Place `band` into the `mask` quadrant of `full`.
fn place(full: &mut Vec<f64>, full_shape: &[usize], band: &Tensor<f64>, mask: usize) {
    let d = full_shape.len() - 1;
    let band_shape = band.shape();
    let mut idx = vec![0usize; band_shape.len()];
    for &v in band.as_slice() {
        let mut offset = 0;
        for ax in 0..full_shape.len() {
            let mut i = idx[ax];
            if ax > 0 && (mask >> (d - ax)) & 1 == 1 {
                i += band_shape[ax];
            }
            offset = offset * full_shape[ax] + i;
        }
        full[offset] = v;
        for ax in (0..band_shape.len()).rev() {
            idx[ax] += 1;
            if idx[ax] < band_shape[ax] {
                break;
            }
            idx[ax] = 0;
        }
    }
}

/// Haar coefficients computed with explicit transform matrices: the
/// approximation and, per level (coarsest first), the `2^d - 1` detail bands
/// in mask order.
pub struct MatrixCoefficients {
    pub approx: Tensor<f64>,
    pub levels: Vec<Vec<Tensor<f64>>>,
}

pub fn haar_matrix_decompose(x: &Tensor<f64>, levels: usize) -> MatrixCoefficients {
    let d = x.ndim() - 1;
    let mut approx = x.clone();
    let mut out = Vec::new();
    for _ in 0..levels {
        let mut full = approx.clone();
        for axis in 1..=d {
            full = apply_along(&full, axis, &haar_matrix(full.shape()[axis]));
        }
        approx = quadrant(&full, 0);
        out.push((1..1usize << d).map(|mask| quadrant(&full, mask)).collect());
    }
    out.reverse();
    MatrixCoefficients { approx, levels: out }
}

pub fn haar_matrix_reconstruct(coeffs: &MatrixCoefficients) -> Tensor<f64> {
    let mut approx = coeffs.approx.clone();
    let d = approx.ndim() - 1;
    for bands in &coeffs.levels {
        let mut shape = approx.shape().to_vec();
        for s in shape.iter_mut().skip(1) {
            *s *= 2;
        }
        let mut full = vec![0.0; shape.iter().product()];
        place(&mut full, &shape, &approx, 0);
        for (k, band) in bands.iter().enumerate() {
            place(&mut full, &shape, band, k + 1);
        }
        let mut t = Tensor::from_vec(&shape, full).unwrap();
        for axis in (1..=d).rev() {
            t = apply_along(&t, axis, &transpose(&haar_matrix(shape[axis])));
        }
        approx = t;
    }
    approx
}

fn reflect_index(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    if n == 1 {
        return 0;
    }
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        }
        if i >= n {
            i = 2 * (n - 1) - i;
        }
    }
    i as usize
}

/// Single-lane multilevel DWT written directly from its definition: reflect
/// padding, full convolution, keep every second sample starting at `L - 1`.
/// Returns the approximation and details ordered coarsest first.
pub fn textbook_wavedec(x: &[f64], wavelet: &Wavelet, levels: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
    let l = wavelet.filter_len();
    let mut approx = x.to_vec();
    let mut details = Vec::new();
    for _ in 0..levels {
        let n = approx.len();
        let left = l - 2;
        let right = l - 2 + n % 2;
        let padded: Vec<f64> = (0..n + left + right)
            .map(|p| approx[reflect_index(p as isize - left as isize, n)])
            .collect();
        let conv = |h: &[f64]| -> Vec<f64> {
            let full: Vec<f64> = (0..padded.len() + l - 1)
                .map(|t| {
                    (0..l)
                        .filter(|&k| t >= k && t - k < padded.len())
                        .map(|k| h[k] * padded[t - k])
                        .sum()
                })
                .collect();
            full[l - 1..padded.len()].iter().step_by(2).copied().collect()
        };
        let lo = conv(wavelet.dec_lo());
        let hi = conv(wavelet.dec_hi());
        details.push(hi);
        approx = lo;
    }
    details.reverse();
    (approx, details)
}
