//! Coefficient containers produced by decomposition and consumed by reconstruction.
//!
//! A level of a `d`-dimensional transform holds `2^d - 1` detail sub-bands. Each
//! is identified by a [`SubbandLabel`]: one bit per spatial axis, set when the
//! axis took the high-pass branch. The first spatial axis owns the most
//! significant bit, so ordering bands by mask is the same as ordering their
//! `'a'`/`'d'` strings lexicographically.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use hashbrown::HashMap;

use crate::error::{Result, WaveletError};
use crate::num::Float;
use crate::tensor::{check_shape, Tensor};

/// Per-axis approximation/detail choice of one sub-band.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubbandLabel {
    mask: usize,
    dims: usize,
}

impl SubbandLabel {
    /// Label for `dims` spatial axes; `None` if `mask` has bits beyond `dims`.
    pub fn new(mask: usize, dims: usize) -> Option<Self> {
        if dims == 0 || dims >= usize::BITS as usize || mask >> dims != 0 {
            return None;
        }
        Some(Self { mask, dims })
    }

    /// The all-`'a'` label.
    pub fn approximation(dims: usize) -> Self {
        Self { mask: 0, dims }
    }

    pub fn mask(&self) -> usize {
        self.mask
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn is_approximation(&self) -> bool {
        self.mask == 0
    }

    /// Whether spatial axis `position` (0-based, first spatial axis = 0) took
    /// the detail branch.
    pub fn is_detail_along(&self, position: usize) -> bool {
        position < self.dims && (self.mask >> (self.dims - 1 - position)) & 1 == 1
    }

    /// Every detail label of a `dims`-axis level, in storage order.
    pub fn details(dims: usize) -> impl Iterator<Item = SubbandLabel> {
        (1..1usize << dims).map(move |mask| SubbandLabel { mask, dims })
    }
}

impl fmt::Display for SubbandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.dims {
            let c = if self.is_detail_along(pos) { 'd' } else { 'a' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl FromStr for SubbandLabel {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || WaveletError::InvalidLabel {
            label: s.to_string(),
        };
        if s.is_empty() || s.len() >= usize::BITS as usize {
            return Err(invalid());
        }
        let mut mask = 0usize;
        for c in s.chars() {
            mask = match c {
                'a' => mask << 1,
                'd' => (mask << 1) | 1,
                _ => return Err(invalid()),
            };
        }
        Ok(Self {
            mask,
            dims: s.len(),
        })
    }
}

/// The detail sub-bands of one decomposition level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDetails<T: Float> {
    dims: usize,
    // index = mask - 1
    bands: Vec<Tensor<T>>,
}

impl<T: Float> LevelDetails<T> {
    pub(crate) fn from_bands(dims: usize, bands: Vec<Tensor<T>>) -> Self {
        debug_assert_eq!(bands.len(), (1usize << dims) - 1);
        Self { dims, bands }
    }

    /// Build a level from string-keyed bands. Every detail label for `dims`
    /// axes must be present, and no other key may be.
    pub fn from_map(dims: usize, mut map: HashMap<String, Tensor<T>>) -> Result<Self> {
        if dims == 0 || dims >= usize::BITS as usize {
            return Err(WaveletError::InvalidLabel {
                label: String::new(),
            });
        }
        let mut bands = Vec::with_capacity((1usize << dims) - 1);
        for label in SubbandLabel::details(dims) {
            let key = label.to_string();
            match map.remove(&key) {
                Some(band) => bands.push(band),
                None => return Err(WaveletError::InvalidLabel { label: key }),
            }
        }
        if let Some(extra) = map.into_keys().next() {
            return Err(WaveletError::InvalidLabel { label: extra });
        }
        Ok(Self { dims, bands })
    }

    /// Number of spatial axes the labels cover.
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Band by its `'a'`/`'d'` string, e.g. `"ad"`.
    pub fn get(&self, label: &str) -> Option<&Tensor<T>> {
        let label = label.parse::<SubbandLabel>().ok()?;
        self.get_label(label)
    }

    pub fn get_label(&self, label: SubbandLabel) -> Option<&Tensor<T>> {
        if label.dims != self.dims || label.is_approximation() {
            return None;
        }
        self.bands.get(label.mask - 1)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Tensor<T>> {
        let label = label.parse::<SubbandLabel>().ok()?;
        if label.dims != self.dims || label.is_approximation() {
            return None;
        }
        self.bands.get_mut(label.mask - 1)
    }

    /// Bands in lexicographic label order.
    pub fn iter(&self) -> impl Iterator<Item = (SubbandLabel, &Tensor<T>)> {
        SubbandLabel::details(self.dims).zip(self.bands.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SubbandLabel, &mut Tensor<T>)> {
        SubbandLabel::details(self.dims).zip(self.bands.iter_mut())
    }

    pub fn bands(&self) -> &[Tensor<T>] {
        &self.bands
    }

    pub fn to_map(&self) -> HashMap<String, Tensor<T>> {
        self.iter()
            .map(|(label, band)| (label.to_string(), band.clone()))
            .collect()
    }

    pub fn into_bands(self) -> Vec<Tensor<T>> {
        self.bands
    }
}

/// Multilevel coefficients of a fully separable decomposition.
///
/// `levels` runs coarsest to finest. `signal_shape` is the shape the tree was
/// decomposed from; reconstruction crops back to it.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientTree<T: Float> {
    approx: Tensor<T>,
    levels: Vec<LevelDetails<T>>,
    signal_shape: Vec<usize>,
}

impl<T: Float> CoefficientTree<T> {
    pub(crate) fn from_raw(
        approx: Tensor<T>,
        levels: Vec<LevelDetails<T>>,
        signal_shape: Vec<usize>,
    ) -> Self {
        Self {
            approx,
            levels,
            signal_shape,
        }
    }

    /// Assemble a tree from caller-held parts.
    ///
    /// Checks the structure only: ranks, the batch axis, label counts and that
    /// each level's bands share one shape. Whether the shapes fit a given
    /// wavelet is checked by reconstruction.
    pub fn from_parts(
        approx: Tensor<T>,
        levels: Vec<LevelDetails<T>>,
        signal_shape: Vec<usize>,
    ) -> Result<Self> {
        check_shape(&signal_shape)?;
        let rank = signal_shape.len();
        if rank < 2 {
            return Err(WaveletError::RankMismatch {
                expected: 2,
                actual: rank,
            });
        }
        let dims = rank - 1;
        let approx_label = SubbandLabel::approximation(dims).to_string();
        if approx.ndim() != rank || approx.shape()[0] != signal_shape[0] {
            let mut expected = approx.shape().to_vec();
            expected.resize(rank, 1);
            expected[0] = signal_shape[0];
            return Err(WaveletError::CoefficientShape {
                level: 0,
                label: approx_label,
                expected,
                actual: approx.shape().to_vec(),
            });
        }
        for (idx, level) in levels.iter().enumerate() {
            if level.dims != dims || level.bands.len() != (1usize << dims) - 1 {
                let (label, actual) = level
                    .iter()
                    .next()
                    .map(|(l, b)| (l.to_string(), b.shape().to_vec()))
                    .unwrap_or_default();
                return Err(WaveletError::CoefficientShape {
                    level: idx + 1,
                    label,
                    expected: approx.shape().to_vec(),
                    actual,
                });
            }
            let first = level.bands[0].shape();
            for (label, band) in level.iter() {
                if band.shape() != first || first.len() != rank || first[0] != signal_shape[0] {
                    let mut expected = first.to_vec();
                    expected[0] = signal_shape[0];
                    return Err(WaveletError::CoefficientShape {
                        level: idx + 1,
                        label: label.to_string(),
                        expected,
                        actual: band.shape().to_vec(),
                    });
                }
            }
        }
        Ok(Self {
            approx,
            levels,
            signal_shape,
        })
    }

    pub fn into_parts(self) -> (Tensor<T>, Vec<LevelDetails<T>>, Vec<usize>) {
        (self.approx, self.levels, self.signal_shape)
    }

    /// Coarsest approximation.
    pub fn approx(&self) -> &Tensor<T> {
        &self.approx
    }

    pub fn approx_mut(&mut self) -> &mut Tensor<T> {
        &mut self.approx
    }

    /// Detail levels, coarsest first.
    pub fn levels(&self) -> &[LevelDetails<T>] {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut [LevelDetails<T>] {
        &mut self.levels
    }

    pub fn signal_shape(&self) -> &[usize] {
        &self.signal_shape
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn spatial_dims(&self) -> usize {
        self.signal_shape.len() - 1
    }

    /// Detail label strings of every level, in storage order.
    pub fn detail_keys(&self) -> Vec<String> {
        SubbandLabel::details(self.spatial_dims())
            .map(|l| l.to_string())
            .collect()
    }

    /// BLAKE3 digest of the signal shape and every coefficient bit.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.signal_shape.len() as u64).to_le_bytes());
        for &n in &self.signal_shape {
            hasher.update(&(n as u64).to_le_bytes());
        }
        self.approx.hash_into(&mut hasher);
        for level in &self.levels {
            for band in &level.bands {
                band.hash_into(&mut hasher);
            }
        }
        *hasher.finalize().as_bytes()
    }
}

/// One-spatial-axis coefficients: the single detail band per level is kept as
/// a plain tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients1d<T: Float> {
    pub approx: Tensor<T>,
    /// Coarsest first.
    pub details: Vec<Tensor<T>>,
    pub signal_shape: Vec<usize>,
}

impl<T: Float> Coefficients1d<T> {
    pub fn from_tree(tree: CoefficientTree<T>) -> Result<Self> {
        if tree.spatial_dims() != 1 {
            return Err(WaveletError::RankMismatch {
                expected: 2,
                actual: tree.signal_shape.len(),
            });
        }
        let (approx, levels, signal_shape) = tree.into_parts();
        let details = levels
            .into_iter()
            .flat_map(|level| level.into_bands())
            .collect();
        Ok(Self {
            approx,
            details,
            signal_shape,
        })
    }

    pub fn into_tree(self) -> Result<CoefficientTree<T>> {
        let levels = self
            .details
            .into_iter()
            .map(|band| LevelDetails::from_bands(1, alloc::vec![band]))
            .collect();
        CoefficientTree::from_parts(self.approx, levels, self.signal_shape)
    }

    pub fn level_count(&self) -> usize {
        self.details.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn filled(shape: &[usize], v: f64) -> Tensor<f64> {
        Tensor::from_fn(shape, |_| v).unwrap()
    }

    #[test]
    fn test_label_strings_follow_axis_order() {
        let labels: Vec<String> = SubbandLabel::details(2).map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["ad", "da", "dd"]);
        let l: SubbandLabel = "dad".parse().unwrap();
        assert_eq!(l.mask(), 0b101);
        assert!(l.is_detail_along(0));
        assert!(!l.is_detail_along(1));
        assert!(l.is_detail_along(2));
        assert_eq!(SubbandLabel::approximation(3).to_string(), "aaa");
        assert!("adx".parse::<SubbandLabel>().is_err());
        assert!("".parse::<SubbandLabel>().is_err());
        assert!(SubbandLabel::new(4, 2).is_none());
    }

    #[test]
    fn test_level_map_roundtrip_and_lookup() {
        let bands = (1..4).map(|k| filled(&[1, 2, 2], k as f64)).collect();
        let level = LevelDetails::from_bands(2, bands);
        assert_eq!(level.get("da").unwrap().as_slice()[0], 2.0);
        assert!(level.get("aa").is_none());
        assert!(level.get("add").is_none());
        let map = level.to_map();
        assert_eq!(map.len(), 3);
        assert_eq!(LevelDetails::from_map(2, map).unwrap(), level);
    }

    #[test]
    fn test_level_from_map_rejects_missing_and_extra_keys() {
        let mut map = HashMap::new();
        map.insert("ad".to_string(), filled(&[1, 2, 2], 0.0));
        map.insert("da".to_string(), filled(&[1, 2, 2], 0.0));
        match LevelDetails::from_map(2, map.clone()) {
            Err(WaveletError::InvalidLabel { label }) => assert_eq!(label, "dd"),
            other => panic!("unexpected result: {:?}", other),
        }
        map.insert("dd".to_string(), filled(&[1, 2, 2], 0.0));
        map.insert("aa".to_string(), filled(&[1, 2, 2], 0.0));
        match LevelDetails::from_map(2, map) {
            Err(WaveletError::InvalidLabel { label }) => assert_eq!(label, "aa"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_parts_checks_structure() {
        let level = LevelDetails::from_bands(2, vec![filled(&[3, 4, 4], 1.0); 3]);
        let tree =
            CoefficientTree::from_parts(filled(&[3, 4, 4], 0.0), vec![level.clone()], vec![3, 8, 8])
                .unwrap();
        assert_eq!(tree.level_count(), 1);
        assert_eq!(tree.spatial_dims(), 2);
        assert_eq!(tree.detail_keys(), vec!["ad", "da", "dd"]);

        let mut ragged = level.clone();
        *ragged.get_mut("dd").unwrap() = filled(&[3, 4, 5], 1.0);
        match CoefficientTree::from_parts(filled(&[3, 4, 4], 0.0), vec![ragged], vec![3, 8, 8]) {
            Err(WaveletError::CoefficientShape { level, label, .. }) => {
                assert_eq!((level, label.as_str()), (1, "dd"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            CoefficientTree::from_parts(
                filled(&[2, 4, 4], 0.0),
                vec![level.clone()],
                vec![3, 8, 8]
            ),
            Err(WaveletError::CoefficientShape { level: 0, .. })
        ));

        // A level labelled for one axis inside a 2-D tree.
        let narrow = LevelDetails::from_bands(1, vec![filled(&[3, 4, 4], 1.0)]);
        let approx = filled(&[3, 4, 4], 0.0);
        match CoefficientTree::from_parts(approx, vec![level, narrow], vec![3, 8, 8]) {
            Err(WaveletError::CoefficientShape { level, label, .. }) => {
                assert_eq!((level, label.as_str()), (2, "d"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fingerprint_changes_with_any_band() {
        let level = LevelDetails::from_bands(1, vec![filled(&[2, 3], 1.0)]);
        let mut tree =
            CoefficientTree::from_parts(filled(&[2, 3], 0.0), vec![level], vec![2, 6]).unwrap();
        let before = tree.fingerprint();
        tree.levels_mut()[0].get_mut("d").unwrap().as_mut_slice()[4] = 1.5;
        assert_ne!(before, tree.fingerprint());
    }

    #[test]
    fn test_coefficients1d_conversion() {
        let level = LevelDetails::from_bands(1, vec![filled(&[2, 3], 1.0)]);
        let tree =
            CoefficientTree::from_parts(filled(&[2, 3], 0.0), vec![level], vec![2, 6]).unwrap();
        let c = Coefficients1d::from_tree(tree.clone()).unwrap();
        assert_eq!(c.level_count(), 1);
        assert_eq!(c.details[0].shape(), &[2, 3]);
        assert_eq!(c.into_tree().unwrap(), tree);
    }
}
