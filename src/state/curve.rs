use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Colours of the four S-curve datasets: PV, EV, AC, verified payments.
pub const CURVE_COLORS: [[u8; 4]; 4] = [
    [13, 110, 253, 255], // blue
    [25, 135, 84, 255],  // green
    [220, 53, 69, 255],  // red
    [111, 66, 193, 255], // purple
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Months,
    Weeks,
    Days,
}

impl Granularity {
    /// Title of the chart's x axis.
    pub fn axis_title(&self) -> &'static str {
        match self {
            Granularity::Months => "Months",
            Granularity::Weeks => "Weeks",
            Granularity::Days => "Days",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.axis_title())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "months" | "month" | "meses" => Ok(Granularity::Months),
            "weeks" | "week" | "semanas" => Ok(Granularity::Weeks),
            "days" | "day" | "dias" | "días" => Ok(Granularity::Days),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// The cleaned curves of one granularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurveSet {
    pub labels: Vec<String>,
    pub pv: Vec<f64>,
    pub ev: Vec<f64>,
    pub ac: Vec<f64>,
    /// Verified payments; only tracked monthly.
    pub ac_paid: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub color: [u8; 4],
    pub values: Vec<f64>,
    pub visible: bool,
}

impl Dataset {
    pub fn new(label: &str, color: [u8; 4], values: Vec<f64>) -> Self {
        Self {
            label: label.to_string(),
            color,
            values,
            visible: true,
        }
    }

    pub fn point_count(&self) -> usize {
        self.values.len()
    }
}

/// The single S-curve chart, updated in place on granularity changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveChart {
    pub labels: Vec<String>,
    pub x_title: String,
    pub granularity: Granularity,
    /// PV, EV, AC, verified payments, in that order.
    pub datasets: Vec<Dataset>,
}

pub const PV_DATASET: usize = 0;
pub const EV_DATASET: usize = 1;
pub const AC_DATASET: usize = 2;
pub const PAID_DATASET: usize = 3;

impl CurveChart {
    pub fn new(curves: &CurveSet) -> Self {
        let datasets = vec![
            Dataset::new("Planned value (PV)", CURVE_COLORS[0], curves.pv.clone()),
            Dataset::new("Earned value (EV)", CURVE_COLORS[1], curves.ev.clone()),
            Dataset::new("Actual cost (AC)", CURVE_COLORS[2], curves.ac.clone()),
            Dataset::new("Verified payments", CURVE_COLORS[3], curves.ac_paid.clone()),
        ];
        Self {
            labels: curves.labels.clone(),
            x_title: Granularity::Months.axis_title().to_string(),
            granularity: Granularity::Months,
            datasets,
        }
    }

    /// Swap in the curves of another granularity. Verified payments only
    /// exist monthly and are hidden otherwise.
    pub fn update(&mut self, granularity: Granularity, curves: &CurveSet) {
        self.labels = curves.labels.clone();
        self.datasets[PV_DATASET].values = curves.pv.clone();
        self.datasets[EV_DATASET].values = curves.ev.clone();
        self.datasets[AC_DATASET].values = curves.ac.clone();

        let paid = &mut self.datasets[PAID_DATASET];
        if granularity == Granularity::Months {
            paid.visible = true;
            paid.values = curves.ac_paid.clone();
        } else {
            paid.visible = false;
        }

        self.granularity = granularity;
        self.x_title = granularity.axis_title().to_string();
    }

    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index)
    }
}
