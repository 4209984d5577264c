use serde::Serialize;
use serde_json::Value;

use crate::data::blob::{DashboardBlob, Sample};

/// Labels used for trend charts when the blob carries no periods at all.
pub const DEFAULT_TREND_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// `part / whole * 100`, or 0 when `whole` isn't positive.
pub fn ratio_pct(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Share of the budget already spent.
pub fn percent_complete(ac_to_date: f64, budget: f64) -> f64 {
    ratio_pct(ac_to_date, budget)
}

/// Invoiced over cost. With nothing spent, anything invoiced counts as 100%.
pub fn efficiency(invoiced: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        invoiced / cost * 100.0
    } else if invoiced > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Share of the contract already invoiced to the client.
pub fn billing_advance(invoiced: f64, contract: f64) -> f64 {
    ratio_pct(invoiced, contract)
}

/// Labels plus one value per label, ready for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Expand a CPI/SPI style field into a per-period series.
///
/// An array is taken as-is; a scalar (or nothing, read as 1.0) is repeated
/// once per label.
pub fn trend_series(value: &Value, labels: &[String]) -> TrendSeries {
    let labels: Vec<String> = if labels.is_empty() {
        DEFAULT_TREND_LABELS.iter().map(|s| s.to_string()).collect()
    } else {
        labels.to_vec()
    };
    let values = match value {
        Value::Array(items) => items.iter().map(Sample::coerce).collect(),
        Value::Null => vec![1.0; labels.len()],
        scalar => {
            let v = scalar.coerce();
            let v = if v == 0.0 || !v.is_finite() { 1.0 } else { v };
            vec![v; labels.len()]
        }
    };
    TrendSeries { labels, values }
}

/// Cost-performance and schedule-performance trends for one blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceTrends {
    pub cpi: TrendSeries,
    pub spi: TrendSeries,
}

impl PerformanceTrends {
    pub fn compute(blob: &DashboardBlob) -> Self {
        let labels = blob.month_labels();
        Self {
            cpi: trend_series(&blob.cpi, &labels),
            spi: trend_series(&blob.spi, &labels),
        }
    }
}
