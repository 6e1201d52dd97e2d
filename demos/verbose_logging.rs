//! Demonstrates enabling verbose logging for fswt.
use fswt::{decompose, reconstruct, ExtensionMode, Tensor};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let signal = Tensor::<f64>::from_fn(&[2, 29, 65], |ix| (ix[1] + 2 * ix[2]) as f64).unwrap();
    let tree = decompose(&signal, "db3", ExtensionMode::Reflect, None).unwrap();
    reconstruct(&tree, "db3").unwrap();

    // Too short for a single sym5 level: logged and kept as the approximation.
    let short = Tensor::<f64>::zeros(&[1, 12]).unwrap();
    decompose(&short, "sym5", ExtensionMode::Reflect, None).unwrap();
}
