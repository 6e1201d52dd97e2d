//! Denoise a synthetic image by soft-thresholding its detail sub-bands.
//!
//! Usage: `cargo run --example image_subbands -- [wavelet] [threshold]`

use fswt::{decompose, reconstruct, ExtensionMode, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn soft(v: f64, t: f64) -> f64 {
    if v > t {
        v - t
    } else if v < -t {
        v + t
    } else {
        0.0
    }
}

fn rms(a: &Tensor<f64>, b: &Tensor<f64>) -> f64 {
    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    (sum / a.len() as f64).sqrt()
}

fn main() {
    let mut args = std::env::args().skip(1);
    let wavelet = args.next().unwrap_or_else(|| "db4".to_string());
    let threshold: f64 = args.next().and_then(|t| t.parse().ok()).unwrap_or(0.3);

    // A 96 x 120 image: two smooth blobs on a gradient, plus noise.
    let clean = Tensor::<f64>::from_fn(&[1, 96, 120], |ix| {
        let (y, x) = (ix[1] as f64, ix[2] as f64);
        let blob = |cy: f64, cx: f64, r: f64| {
            (-((y - cy).powi(2) + (x - cx).powi(2)) / (r * r)).exp()
        };
        x / 120.0 + 2.0 * blob(30.0, 40.0, 12.0) + blob(70.0, 90.0, 20.0)
    })
    .unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let noisy = Tensor::from_fn(clean.shape(), |ix| {
        clean.get(ix).unwrap_or(0.0) + rng.gen_range(-0.25..0.25)
    })
    .unwrap();

    let mut tree = decompose(&noisy, &wavelet, ExtensionMode::Reflect, Some(3)).unwrap();
    for (k, level) in tree.levels_mut().iter_mut().enumerate() {
        for (label, band) in level.iter_mut() {
            let before: f64 = band.as_slice().iter().map(|v| v.abs()).sum();
            for v in band.as_mut_slice() {
                *v = soft(*v, threshold);
            }
            let after: f64 = band.as_slice().iter().map(|v| v.abs()).sum();
            println!(
                "level {} band {} {:?}: L1 {:.2} -> {:.2}",
                k + 1,
                label,
                band.shape(),
                before,
                after
            );
        }
    }
    let denoised = reconstruct(&tree, &wavelet).unwrap();
    println!("rms error noisy:    {:.4}", rms(&noisy, &clean));
    println!("rms error denoised: {:.4}", rms(&denoised, &clean));
}
