//! Basic usage example for fswt
//!
//! Decomposes batches of 1-D, 2-D and 3-D signals, inspects the coefficient
//! trees and reconstructs the input.

use fswt::ndwt::{
    decompose_1d, decompose_2d, decompose_3d, reconstruct_1d, reconstruct_2d, reconstruct_3d,
};
use fswt::single_axis::{wavedec, waverec};
use fswt::{ExtensionMode, FullySeparable, Tensor};

fn main() {
    println!("=== fswt Basic Usage Example ===\n");

    // 1. One spatial axis: a batch of three chirps of odd length
    println!("1. 1-D (batch 3, length 65), db3, 2 levels");
    let chirp = Tensor::<f64>::from_fn(&[3, 65], |ix| {
        let t = ix[1] as f64 / 65.0;
        ((ix[0] + 1) as f64 * 20.0 * t * t).sin()
    })
    .unwrap();
    let c = decompose_1d(&chirp, "db3", ExtensionMode::Reflect, Some(2)).unwrap();
    println!("   approx: {:?}", c.approx.shape());
    for (k, d) in c.details.iter().enumerate() {
        println!("   detail level {} (coarsest = 1): {:?}", k + 1, d.shape());
    }
    let back = reconstruct_1d(&c, "db3").unwrap();
    println!("   max reconstruction error: {:.2e}\n", back.max_abs_diff(&chirp).unwrap());

    // 2. Two spatial axes
    println!("2. 2-D (batch 2, 29 x 64), sym5, default depth");
    let image = Tensor::<f64>::from_fn(&[2, 29, 64], |ix| ((ix[1] * ix[2]) % 17) as f64).unwrap();
    let tree = decompose_2d(&image, "sym5", ExtensionMode::Symmetric, None).unwrap();
    println!("   levels: {}, labels: {:?}", tree.level_count(), tree.detail_keys());
    for (k, level) in tree.levels().iter().enumerate() {
        println!("   level {}: bands of {:?}", k + 1, level.bands()[0].shape());
    }
    let back = reconstruct_2d(&tree, "sym5").unwrap();
    println!("   max reconstruction error: {:.2e}\n", back.max_abs_diff(&image).unwrap());

    // 3. Three spatial axes with a reusable transform
    println!("3. 3-D (batch 1, 16 x 16 x 16), haar, 2 levels");
    let fs = FullySeparable::<f32>::from_name("haar", ExtensionMode::Reflect).unwrap();
    let volume =
        Tensor::<f32>::from_fn(&[1, 16, 16, 16], |ix| (ix[1] + ix[2] + ix[3]) as f32).unwrap();
    let tree = fs.decompose(&volume, Some(2)).unwrap();
    println!("   {} bands per level", tree.levels()[0].len());
    let back = decompose_3d(&volume, "haar", ExtensionMode::Reflect, Some(2))
        .and_then(|t| reconstruct_3d(&t, "haar"))
        .unwrap();
    println!("   max reconstruction error: {:.2e}", back.max_abs_diff(&volume).unwrap());
    println!("   fingerprint: {:02x?}\n", &tree.fingerprint()[..8]);

    // 4. One chosen axis only
    println!("4. Single axis (axis 2 of a 2 x 4 x 40 tensor), coif1");
    let x = Tensor::<f64>::from_fn(&[2, 4, 40], |ix| (ix[2] as f64 * 0.2).cos() + ix[1] as f64)
        .unwrap();
    let c = wavedec(&x, "coif1", ExtensionMode::Periodic, None, 2).unwrap();
    println!("   levels: {}, approx: {:?}", c.level_count(), c.approx.shape());
    let back = waverec(&c, "coif1").unwrap();
    println!("   max reconstruction error: {:.2e}", back.max_abs_diff(&x).unwrap());
}
