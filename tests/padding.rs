use fswt::padding::{apply_pad, compute_pad, max_level, AxisPlan, ExtensionMode, PadRecord};
use fswt::{decompose, Tensor, WaveletError};

#[test]
/// The plan predicts every band shape the decomposition actually produces.
fn plan_predicts_decomposition_shapes() {
    for (name, taps) in [("haar", 2), ("db3", 6), ("sym5", 10), ("coif2", 12)] {
        for n in [29usize, 64, 65] {
            let x = Tensor::<f64>::zeros(&[1, n]).unwrap();
            let tree = decompose(&x, name, ExtensionMode::Zero, Some(2)).unwrap();
            let plan = AxisPlan::new(n, taps, 2);
            assert_eq!(plan.levels(), 2);
            assert_eq!(tree.levels()[1].bands()[0].shape()[1], plan.stages()[0].output_len);
            assert_eq!(tree.approx().shape()[1], plan.stages()[1].output_len);
            assert_eq!(plan.stages()[1].input_len, plan.stages()[0].output_len);
        }
    }
}

#[test]
/// The first stage pads `L - 2` on the left and one more on the right for odd lengths.
fn first_stage_padding() {
    assert_eq!(compute_pad(64, 6, 2).unwrap(), PadRecord { left: 4, right: 4 });
    assert_eq!(compute_pad(65, 6, 2).unwrap(), PadRecord { left: 4, right: 5 });
    assert_eq!(compute_pad(29, 2, 1).unwrap(), PadRecord { left: 0, right: 1 });
    // Haar on 5 samples: 5 -> 3 -> 2 -> 1, so a fourth stage has nothing to split.
    assert!(compute_pad(5, 2, 3).is_ok());
    match compute_pad(5, 2, 4) {
        Err(WaveletError::InsufficientSignalLength { length, required, .. }) => {
            assert_eq!((length, required), (5, 9));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
/// Unspecified depth follows `(L - 1) * 2^k <= n`.
fn unspecified_level_rule() {
    assert_eq!(max_level(64, 2), 6);
    assert_eq!(max_level(63, 2), 5);
    assert_eq!(max_level(64, 6), 3);
    assert_eq!(max_level(65, 10), 2);
    assert_eq!(max_level(17, 10), 0);
}

#[test]
/// Padding the last axis of a 2-D tensor extends each row independently.
fn apply_pad_rows() {
    let t = Tensor::<f64>::from_fn(&[2, 3], |ix| (ix[0] * 10 + ix[1]) as f64).unwrap();
    let p = apply_pad(&t, 1, 2, 2, ExtensionMode::Periodic).unwrap();
    assert_eq!(
        p.as_slice(),
        &[1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 11.0, 12.0, 10.0, 11.0, 12.0, 10.0, 11.0]
    );
    let p = apply_pad(&t, 1, 1, 0, ExtensionMode::Constant).unwrap();
    assert_eq!(p.as_slice(), &[0.0, 0.0, 1.0, 2.0, 10.0, 10.0, 11.0, 12.0]);
    assert!("wrap".parse::<ExtensionMode>().is_err());
    assert_eq!("Symmetric".parse::<ExtensionMode>().unwrap(), ExtensionMode::Symmetric);
}
