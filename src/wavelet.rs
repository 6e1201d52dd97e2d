//! Wavelet filter banks.
//!
//! Orthogonal wavelets are stored once, as their reconstruction low-pass taps
//! (pywt ordering). The remaining three filters follow from the quadrature-mirror
//! relations:
//!
//! * `dec_lo[k] = rec_lo[L - 1 - k]`
//! * `rec_hi[k] = (-1)^k * rec_lo[L - 1 - k]`
//! * `dec_hi[k] = rec_hi[L - 1 - k]`

#![allow(clippy::excessive_precision)]

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::{Result, WaveletError};
use crate::num::Float;

/// Built-in wavelet families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WaveletFamily {
    Haar,
    /// Daubechies with `n` vanishing moments (`db1` is Haar).
    Daubechies(u8),
    /// Symlets, the least-asymmetric Daubechies variant.
    Symlet(u8),
    Coiflet(u8),
}

impl WaveletFamily {
    /// Every name [`Wavelet::from_name`] accepts.
    pub const BUILTIN: [WaveletFamily; 16] = [
        WaveletFamily::Haar,
        WaveletFamily::Daubechies(1),
        WaveletFamily::Daubechies(2),
        WaveletFamily::Daubechies(3),
        WaveletFamily::Daubechies(4),
        WaveletFamily::Symlet(2),
        WaveletFamily::Symlet(3),
        WaveletFamily::Symlet(4),
        WaveletFamily::Symlet(5),
        WaveletFamily::Symlet(6),
        WaveletFamily::Symlet(7),
        WaveletFamily::Symlet(8),
        WaveletFamily::Symlet(9),
        WaveletFamily::Symlet(10),
        WaveletFamily::Coiflet(1),
        WaveletFamily::Coiflet(2),
    ];

    /// Reconstruction low-pass taps, or `None` for an order without a table.
    pub fn rec_lo(self) -> Option<&'static [f64]> {
        match self {
            WaveletFamily::Haar | WaveletFamily::Daubechies(1) => Some(&HAAR),
            WaveletFamily::Daubechies(2) | WaveletFamily::Symlet(2) => Some(&DB2),
            WaveletFamily::Daubechies(3) | WaveletFamily::Symlet(3) => Some(&DB3),
            WaveletFamily::Daubechies(4) => Some(&DB4),
            WaveletFamily::Symlet(4) => Some(&SYM4),
            WaveletFamily::Symlet(5) => Some(&SYM5),
            WaveletFamily::Symlet(6) => Some(&SYM6),
            WaveletFamily::Symlet(7) => Some(&SYM7),
            WaveletFamily::Symlet(8) => Some(&SYM8),
            WaveletFamily::Symlet(9) => Some(&SYM9),
            WaveletFamily::Symlet(10) => Some(&SYM10),
            WaveletFamily::Coiflet(1) => Some(&COIF1),
            WaveletFamily::Coiflet(2) => Some(&COIF2),
            _ => None,
        }
    }
}

impl fmt::Display for WaveletFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveletFamily::Haar => write!(f, "haar"),
            WaveletFamily::Daubechies(n) => write!(f, "db{}", n),
            WaveletFamily::Symlet(n) => write!(f, "sym{}", n),
            WaveletFamily::Coiflet(n) => write!(f, "coif{}", n),
        }
    }
}

impl FromStr for WaveletFamily {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let unknown = || WaveletError::UnknownWavelet {
            name: s.to_string(),
        };
        if lower == "haar" {
            return Ok(WaveletFamily::Haar);
        }
        let parse = |order: &str| order.parse::<u8>().map_err(|_| unknown());
        let fam = if let Some(rest) = lower.strip_prefix("coif") {
            WaveletFamily::Coiflet(parse(rest)?)
        } else if let Some(rest) = lower.strip_prefix("sym") {
            WaveletFamily::Symlet(parse(rest)?)
        } else if let Some(rest) = lower.strip_prefix("db") {
            WaveletFamily::Daubechies(parse(rest)?)
        } else {
            return Err(unknown());
        };
        if fam.rec_lo().is_none() {
            return Err(unknown());
        }
        Ok(fam)
    }
}

/// A named set of analysis and synthesis filters, stored in `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Wavelet {
    name: String,
    dec_lo: Vec<f64>,
    dec_hi: Vec<f64>,
    rec_lo: Vec<f64>,
    rec_hi: Vec<f64>,
}

/// Look up a built-in wavelet by name (`"haar"`, `"db3"`, `"sym5"`, ...).
pub fn get_filters(name: &str) -> Result<Wavelet> {
    Wavelet::from_name(name)
}

impl Wavelet {
    pub fn from_name(name: &str) -> Result<Self> {
        let family: WaveletFamily = name.parse()?;
        Wavelet::new(family).ok_or(WaveletError::UnknownWavelet {
            name: name.to_string(),
        })
    }

    /// Filter bank of a built-in family, `None` if the order has no table.
    pub fn new(family: WaveletFamily) -> Option<Self> {
        let rec_lo = family.rec_lo()?;
        let len = rec_lo.len();
        let dec_lo: Vec<f64> = rec_lo.iter().rev().copied().collect();
        let rec_hi: Vec<f64> = (0..len)
            .map(|k| {
                let v = rec_lo[len - 1 - k];
                if k % 2 == 0 {
                    v
                } else {
                    -v
                }
            })
            .collect();
        let dec_hi: Vec<f64> = rec_hi.iter().rev().copied().collect();
        Some(Self {
            name: family.to_string(),
            dec_lo,
            dec_hi,
            rec_lo: rec_lo.to_vec(),
            rec_hi,
        })
    }

    /// Custom filter bank. The perfect-reconstruction relations are not checked.
    pub fn from_filters(
        name: &str,
        dec_lo: Vec<f64>,
        dec_hi: Vec<f64>,
        rec_lo: Vec<f64>,
        rec_hi: Vec<f64>,
    ) -> Result<Self> {
        let len = dec_lo.len();
        if len < 2 {
            return Err(WaveletError::InvalidFilter {
                reason: "filters need at least two taps",
            });
        }
        if dec_hi.len() != len || rec_lo.len() != len || rec_hi.len() != len {
            return Err(WaveletError::InvalidFilter {
                reason: "all four filters must have the same length",
            });
        }
        if dec_lo
            .iter()
            .chain(&dec_hi)
            .chain(&rec_lo)
            .chain(&rec_hi)
            .any(|v| !v.is_finite())
        {
            return Err(WaveletError::InvalidFilter {
                reason: "filter taps must be finite",
            });
        }
        Ok(Self {
            name: name.to_string(),
            dec_lo,
            dec_hi,
            rec_lo,
            rec_hi,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter_len(&self) -> usize {
        self.dec_lo.len()
    }

    pub fn dec_lo(&self) -> &[f64] {
        &self.dec_lo
    }

    pub fn dec_hi(&self) -> &[f64] {
        &self.dec_hi
    }

    pub fn rec_lo(&self) -> &[f64] {
        &self.rec_lo
    }

    pub fn rec_hi(&self) -> &[f64] {
        &self.rec_hi
    }

    /// The four filters converted to the pipeline's element type.
    pub fn filter_bank<T: Float>(&self) -> FilterBank<T> {
        let cast = |v: &[f64]| -> Vec<T> { v.iter().map(|&x| T::from_f64(x)).collect() };
        FilterBank {
            dec_lo: cast(&self.dec_lo),
            dec_hi: cast(&self.dec_hi),
            rec_lo: cast(&self.rec_lo),
            rec_hi: cast(&self.rec_hi),
        }
    }
}

/// Filters in the element type of one transform call. Immutable and shared by
/// every axis and level.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterBank<T: Float> {
    pub dec_lo: Vec<T>,
    pub dec_hi: Vec<T>,
    pub rec_lo: Vec<T>,
    pub rec_hi: Vec<T>,
}

impl<T: Float> FilterBank<T> {
    pub fn len(&self) -> usize {
        self.dec_lo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dec_lo.is_empty()
    }
}

const HAAR: [f64; 2] = [core::f64::consts::FRAC_1_SQRT_2, core::f64::consts::FRAC_1_SQRT_2];

const DB2: [f64; 4] = [
    0.48296291314469025,
    0.83651630373746899,
    0.22414386804185735,
    -0.12940952255092145,
];

const DB3: [f64; 6] = [
    0.33267055295095688,
    0.80689150931333875,
    0.45987750211933132,
    -0.13501102001039084,
    -0.085441273882241486,
    0.035226291882100656,
];

const DB4: [f64; 8] = [
    0.23037781330885523,
    0.7148465705525415,
    0.6308807679295904,
    -0.02798376941698385,
    -0.18703481171888114,
    0.030841381835986965,
    0.032883011666982945,
    -0.010597401784997278,
];

const SYM4: [f64; 8] = [
    0.032223100604042702,
    -0.012603967262037833,
    -0.099219543576847216,
    0.29785779560527736,
    0.80373875180591614,
    0.49761866763201545,
    -0.02963552764599851,
    -0.075765714789273325,
];

const SYM5: [f64; 10] = [
    0.019538882735286728,
    -0.021101834024758855,
    -0.17532808990845047,
    0.016602105764522319,
    0.63397896345821192,
    0.72340769040242059,
    0.1993975339773936,
    -0.039134249302383094,
    0.029519490925774643,
    0.027333068345077982,
];

const SYM6: [f64; 12] = [
    -0.007800708325034148,
    0.0017677118642428036,
    0.044724901770665779,
    -0.021060292512300564,
    -0.072637522786462516,
    0.3379294217276218,
    0.787641141030194,
    0.49105594192674662,
    -0.048311742585632998,
    -0.11799011114819057,
    0.0034907120842174702,
    0.015404109327027373,
];

const SYM7: [f64; 14] = [
    0.010268176708511255,
    0.0040102448715336634,
    -0.10780823770381774,
    -0.14004724044296152,
    0.28862963175151463,
    0.76776431700316405,
    0.5361019170917628,
    0.017441255086855827,
    -0.049552834937127255,
    0.067892693501372697,
    0.03051551316596357,
    -0.01263630340325193,
    -0.0010473848886829163,
    0.0026818145682578781,
];

const SYM8: [f64; 16] = [
    0.0018899503327594609,
    -0.0003029205147213668,
    -0.014952258337048231,
    0.0038087520138906151,
    0.049137179673607506,
    -0.027219029917056003,
    -0.051945838107709037,
    0.3644418948353314,
    0.77718575170052351,
    0.48135965125837221,
    -0.061273359067658524,
    -0.14329423835080971,
    0.0076074873249176054,
    0.031695087811492981,
    -0.00054213233179114812,
    -0.0033824159510061256,
];

const SYM9: [f64; 18] = [
    0.0010694900329086053,
    -0.00047315449868008311,
    -0.010264064027633142,
    0.0088592674934004842,
    0.06207778930288603,
    -0.018233770779395985,
    -0.19155083129728512,
    0.035272488035271894,
    0.61733844914093583,
    0.717897082764412,
    0.238760914607303,
    -0.054568958430834071,
    0.00058346274612580684,
    0.03022487885827568,
    -0.01152821020767923,
    -0.013271967781817119,
    0.00061978088898558676,
    0.0014009155259146807,
];

const SYM10: [f64; 20] = [
    -0.00045932942100465878,
    5.7036083618494284e-005,
    0.0045931735853118284,
    -0.00080435893201654491,
    -0.02035493981231129,
    0.0057649120335819086,
    0.049994972077376687,
    -0.0319900568824278,
    -0.035536740473817552,
    0.38382676106708546,
    0.7695100370211071,
    0.47169066693843925,
    -0.070880535783243853,
    -0.15949427888491757,
    0.011609893903711381,
    0.045927239231092203,
    -0.0014653825813050513,
    -0.0086412992770224222,
    9.5632670722894754e-005,
    0.00077015980911449011,
];

const COIF1: [f64; 6] = [
    -0.0727326195128539,
    0.3378976624578092,
    0.8525720202122554,
    0.38486484686420286,
    -0.0727326195128539,
    -0.01565572813546454,
];

const COIF2: [f64; 12] = [
    0.016387336463522112,
    -0.04146493678175915,
    -0.06737255472196302,
    0.3861100668211622,
    0.8127236354455423,
    0.41700518442169254,
    -0.0764885990783064,
    -0.0594344186464569,
    0.023680171946334084,
    0.0056114348193944995,
    -0.0018232088707029932,
    -0.0007205494453645122,
];
