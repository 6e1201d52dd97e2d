//! # fswt - fully separable N-D discrete wavelet transforms
//!
//! Multilevel DWT and its inverse over batched tensors of any rank. Axis 0 of
//! every input is a batch axis that is never transformed; each remaining
//! (spatial) axis is split into a low and a high band per level, so a level of
//! a `d`-dimensional signal holds `2^d - 1` labelled detail bands next to the
//! approximation that feeds the next level.
//!
//! ## Features
//!
//! - **Any rank**: 1-D, 2-D, 3-D and general N-D entry points in [`ndwt`]
//! - **Any length**: odd and even axis lengths, padded by a shared plan so
//!   reconstruction crops back to the exact input shape
//! - **Built-in filters**: Haar, Daubechies, Symlets and Coiflets, plus
//!   caller-supplied orthogonal banks
//! - **`no_std` + `alloc`**
//! - **Parallel lanes** (optional, Rayon)
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` for [`WaveletError`] and core detection
//! - `parallel`: split lane work across a Rayon pool (`FSWT_PAR_THRESHOLD`,
//!   `FSWT_PAR_PER_CORE_WORK`)
//! - `verbose-logging`: debug-level `log` records of level choices and padding plans
//! - `internal-tests`: property tests inside the library
//!
//! ## Example
//!
//! ```
//! use fswt::{decompose, reconstruct, ExtensionMode, Tensor};
//!
//! // Five volumes of 29 x 64 x 65 samples.
//! let x = Tensor::<f64>::from_fn(&[5, 29, 64, 65], |ix| {
//!     (ix[1] * 3 + ix[2] * 5 + ix[3] * 7 % 13) as f64
//! })
//! .unwrap();
//! let tree = decompose(&x, "db3", ExtensionMode::Reflect, Some(2)).unwrap();
//! assert_eq!(tree.levels()[0].len(), 7);
//! let y = reconstruct(&tree, "db3").unwrap();
//! assert!(y.max_abs_diff(&x).unwrap() < 1e-8);
//! ```

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Debug-level trace of transform decisions, compiled out without
/// `verbose-logging`.
#[cfg(feature = "verbose-logging")]
macro_rules! trace_dwt {
    ($($arg:tt)*) => {
        log::debug!(target: "fswt", $($arg)*)
    };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! trace_dwt {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

pub mod error;
pub mod num;

/// Row-major tensors and lane iteration
pub mod tensor;

/// Wavelet names and filter banks
pub mod wavelet;

/// Boundary extension modes and per-level padding plans
pub mod padding;

/// Strided analysis and synthesis along one axis
pub mod conv;

/// Sub-band labels and coefficient trees
pub mod coeffs;

/// Fully separable multilevel decomposition and reconstruction
pub mod separable;

/// Rank-checked 1-D, 2-D, 3-D and N-D entry points
pub mod ndwt;

/// Multilevel transform along one chosen axis
pub mod single_axis;

pub use coeffs::{CoefficientTree, Coefficients1d, LevelDetails, SubbandLabel};
pub use error::{Result, WaveletError};
pub use num::Float;
pub use padding::{max_level, ExtensionMode};
pub use separable::{decompose, reconstruct, FullySeparable};
pub use tensor::Tensor;
pub use wavelet::{get_filters, FilterBank, Wavelet, WaveletFamily};

#[cfg(feature = "parallel")]
pub use tensor::{parallel_threshold, set_parallel_threshold};
