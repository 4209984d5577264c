use crate::data::blob::Sample;

/// Clean a raw cumulative series for charting.
///
/// Each entry is coerced to a number; negative or non-finite values and any
/// value below the running maximum are replaced by that maximum (which
/// starts at 0). The result has the input's length and never decreases.
pub fn normalize<S: Sample>(raw: &[S]) -> Vec<f64> {
    let mut out = Vec::with_capacity(raw.len());
    let mut last = 0.0f64;
    for sample in raw {
        let mut v = sample.coerce();
        if !v.is_finite() || v < last {
            v = last;
        }
        // -0.0 slips past the clamp; + 0.0 turns it into 0.0
        v += 0.0;
        out.push(v);
        last = v;
    }
    out
}

/// Whether a series already satisfies the cumulative-curve invariant.
pub fn is_cumulative(series: &[f64]) -> bool {
    series.iter().all(|v| v.is_finite() && *v >= 0.0)
        && series.windows(2).all(|w| w[0] <= w[1])
}
