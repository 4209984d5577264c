//! Linear ramps that stand in for degenerate planned/earned value curves.
//!
//! A flat or all-zero PV/EV line tells the reader nothing, so when the
//! backend sends one the dashboard draws a straight ramp up to a plausible
//! target instead. The ramp is a display aid only; it is not an earned-value
//! calculation. Actual cost and verified payments are never synthesized.

use std::collections::HashSet;

use crate::data::blob::BudgetRefs;

/// Magnitude under which a sample counts as zero, and under which a
/// candidate target is treated as unusable.
pub const ZERO_EPSILON: f64 = 1e-6;

/// A planned-value series whose maximum stays below this is degenerate.
pub const PV_MAGNITUDE_FLOOR: f64 = 1e-3;

/// Decimal places EV samples are rounded to before counting distinct values.
pub const EV_DISTINCT_DECIMALS: i32 = 2;

/// Round half away from zero to `decimals` places.
///
/// Values too large to scale carry no fraction at this precision and are
/// returned unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn all_zero(series: &[f64]) -> bool {
    series.iter().all(|v| v.abs() < ZERO_EPSILON)
}

fn max_of(series: &[f64]) -> f64 {
    series.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn pv_is_degenerate(pv: &[f64]) -> bool {
    pv.is_empty() || all_zero(pv) || max_of(pv) < PV_MAGNITUDE_FLOOR
}

pub fn ev_is_degenerate(ev: &[f64]) -> bool {
    if ev.is_empty() || all_zero(ev) {
        return true;
    }
    // f64 isn't Hash; compare the rounded values by bit pattern
    let distinct: HashSet<u64> = ev
        .iter()
        // + 0.0 folds -0.0 into 0.0
        .map(|v| round_to(*v, EV_DISTINCT_DECIMALS) + 0.0)
        .map(f64::to_bits)
        .collect();
    distinct.len() <= 1
}

/// Largest actual cost, or 0 when there is none.
fn ac_ceiling(ac: &[f64]) -> f64 {
    if ac.is_empty() { 0.0 } else { max_of(ac) }
}

/// Target for a PV ramp: the first usable budget reference, then the AC peak.
pub fn pv_target(refs: &BudgetRefs, ac: &[f64]) -> f64 {
    [refs.bac_planned, refs.bac_real, refs.bac]
        .into_iter()
        .find(|v| *v >= ZERO_EPSILON)
        .unwrap_or_else(|| ac_ceiling(ac))
}

/// Target for an EV ramp: the last observed EV, then the AC peak.
pub fn ev_target(ev: &[f64], ac: &[f64]) -> f64 {
    match ev.last() {
        Some(&last) if last >= ZERO_EPSILON => last,
        _ => ac_ceiling(ac),
    }
}

/// `n` evenly spaced points from `target / n` up to exactly `target`,
/// each rounded to cents.
pub fn linear_ramp(target: f64, n: usize) -> Vec<f64> {
    let step = target / n as f64;
    (1..=n).map(|i| round_to(step * i as f64, 2)).collect()
}

/// Which of the two primary curves were replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synthesized {
    pub pv: bool,
    pub ev: bool,
}

/// Replace degenerate PV/EV curves with ramps over `n` periods.
///
/// `ac` must already be normalized; its peak is the last-resort target.
pub fn apply_fallbacks(
    pv: &mut Vec<f64>,
    ev: &mut Vec<f64>,
    ac: &[f64],
    refs: &BudgetRefs,
    n: usize,
) -> Synthesized {
    let mut done = Synthesized::default();

    if pv_is_degenerate(pv) {
        let target = pv_target(refs, ac);
        *pv = linear_ramp(target, n);
        done.pv = true;
        tracing::info!("PV replaced with a linear ramp up to {target}");
    }

    if ev_is_degenerate(ev) {
        let target = ev_target(ev, ac);
        *ev = linear_ramp(target, n);
        done.ev = true;
        tracing::info!("EV replaced with a linear ramp up to {target}");
    }

    done
}
