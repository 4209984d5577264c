use evcurve::data::blob::BudgetRefs;
use evcurve::normalize;
use evcurve::processing::fallback::{apply_fallbacks, linear_ramp, pv_is_degenerate};
use proptest::prelude::*;

fn raw_sample() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e9..1e9f64,
        Just(0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #[test]
    fn prop_output_is_monotonic(raw in proptest::collection::vec(raw_sample(), 0..64)) {
        let out = normalize(&raw);
        for w in out.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn prop_output_is_finite_and_non_negative(raw in proptest::collection::vec(raw_sample(), 0..64)) {
        for v in normalize(&raw) {
            prop_assert!(v.is_finite());
            prop_assert!(v >= 0.0);
        }
    }

    #[test]
    fn prop_length_is_preserved(raw in proptest::collection::vec(raw_sample(), 0..64)) {
        prop_assert_eq!(normalize(&raw).len(), raw.len());
    }

    #[test]
    fn prop_idempotent(raw in proptest::collection::vec(raw_sample(), 0..64)) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_ramp_ends_at_target(target in 0.0..1e7f64, n in 1usize..48) {
        let ramp = linear_ramp(target, n);
        prop_assert_eq!(ramp.len(), n);
        let last = ramp[n - 1];
        prop_assert!((last - target).abs() <= 0.005 + target * 1e-12);
        prop_assert_eq!(normalize(&ramp), ramp);
    }

    #[test]
    fn prop_healthy_pv_is_left_alone(
        steps in proptest::collection::vec(0.0..1e6f64, 1..24),
        bac in 0.0..1e6f64,
    ) {
        let mut acc = 1.0;
        let mut pv: Vec<f64> = steps.iter().map(|s| { acc += s; acc }).collect();
        prop_assume!(!pv_is_degenerate(&pv));
        let before = pv.clone();
        let mut ev = before.clone();
        let refs = BudgetRefs { bac_planned: bac, ..BudgetRefs::default() };
        let n = pv.len();
        let done = apply_fallbacks(&mut pv, &mut ev, &[], &refs, n);
        prop_assert!(!done.pv);
        prop_assert_eq!(pv, before);
    }
}

#[test]
fn documented_cases() {
    assert!(normalize::<f64>(&[]).is_empty());
    assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    assert_eq!(normalize(&[5.0, 3.0, 10.0]), vec![5.0, 5.0, 10.0]);
    assert_eq!(normalize(&[2.0, -1.0, f64::NAN, 4.0]), vec![2.0, 2.0, 2.0, 4.0]);
    assert_eq!(normalize(&[10.0, 40.0, 90.0]), vec![10.0, 40.0, 90.0]);
}

#[test]
fn planned_value_ramp_to_budget() {
    let mut pv = normalize(&[0.0, 0.0, 0.0, 0.0]);
    let mut ev = vec![1.0, 2.0, 3.0, 4.0];
    let refs = BudgetRefs { bac_planned: 100.0, ..BudgetRefs::default() };
    apply_fallbacks(&mut pv, &mut ev, &[], &refs, 4);
    assert_eq!(normalize(&pv), vec![25.0, 50.0, 75.0, 100.0]);
}

#[test]
fn earned_value_ramp_to_actual_cost() {
    let ac = normalize(&[20.0, 90.0, 45.0]);
    let mut pv = vec![10.0, 40.0, 90.0];
    let mut ev = normalize(&[0.0, 0.0, 0.0]);
    let done = apply_fallbacks(&mut pv, &mut ev, &ac, &BudgetRefs::default(), 3);
    assert!(done.ev);
    assert!(!done.pv);
    assert_eq!(ev, vec![30.0, 60.0, 90.0]);
    assert_eq!(pv, vec![10.0, 40.0, 90.0]);
}
