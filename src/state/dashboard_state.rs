use serde_json::Value;

use crate::data::blob::{labels_to_strings, BudgetRefs, DashboardBlob};
use crate::processing::fallback::{apply_fallbacks, Synthesized};
use crate::processing::normalize::{is_cumulative, normalize};
use crate::state::curve::{CurveChart, CurveSet, Granularity};

/// Everything the dashboard handlers read and update.
///
/// Holds the loaded blob, the cleaned monthly curves and the one S-curve
/// chart. Handlers get a `&mut DashboardState` instead of reaching for
/// shared globals.
#[derive(Debug, Clone)]
pub struct DashboardState {
    blob: DashboardBlob,
    refs: BudgetRefs,
    monthly: CurveSet,
    synthesized: Synthesized,
    chart: Option<CurveChart>,
}

impl DashboardState {
    pub fn new(blob: DashboardBlob) -> Self {
        let refs = blob.refs();
        Self {
            blob,
            refs,
            monthly: CurveSet::default(),
            synthesized: Synthesized::default(),
            chart: None,
        }
    }

    /// Clean the monthly curves and build the chart.
    ///
    /// The curves are always cleaned. Without month labels there is no period
    /// count for the fallback ramps, so no chart is built and this returns
    /// `false`.
    pub fn init_curve_chart(&mut self) -> bool {
        let labels = self.blob.month_labels();

        let mut pv = normalize(&self.blob.pv);
        let mut ev = normalize(&self.blob.ev);
        let ac = normalize(&self.blob.ac);
        let ac_paid = normalize(&self.blob.ac_paid);

        if labels.is_empty() {
            tracing::error!("No periods to chart; S-curve not initialized");
            self.monthly = CurveSet { labels, pv, ev, ac, ac_paid };
            return false;
        }

        self.synthesized = apply_fallbacks(&mut pv, &mut ev, &ac, &self.refs, labels.len());

        self.monthly = CurveSet {
            pv: normalize(&pv),
            ev: normalize(&ev),
            ac,
            ac_paid,
            labels,
        };
        debug_assert!(is_cumulative(&self.monthly.pv) && is_cumulative(&self.monthly.ev));
        self.chart = Some(CurveChart::new(&self.monthly));
        tracing::debug!("S-curve initialized with {} periods", self.monthly.labels.len());
        true
    }

    /// Curves for a granularity, falling back to months when the blob has
    /// no labels for it. Weekly and daily curves are only normalized.
    pub fn curves_for(&self, requested: Granularity) -> (Granularity, CurveSet) {
        let (labels, pv, ev, ac) = match requested {
            Granularity::Weeks => (
                &self.blob.semanas_labels,
                &self.blob.semanas_pv,
                &self.blob.semanas_ev,
                &self.blob.semanas_ac,
            ),
            Granularity::Days => (
                &self.blob.dias_labels,
                &self.blob.dias_pv,
                &self.blob.dias_ev,
                &self.blob.dias_ac,
            ),
            Granularity::Months => return (Granularity::Months, self.monthly.clone()),
        };
        if labels.is_empty() {
            return (Granularity::Months, self.monthly.clone());
        }
        (requested, Self::finer_curves(labels, pv, ev, ac))
    }

    fn finer_curves(labels: &[Value], pv: &[Value], ev: &[Value], ac: &[Value]) -> CurveSet {
        CurveSet {
            labels: labels_to_strings(labels),
            pv: normalize(pv),
            ev: normalize(ev),
            ac: normalize(ac),
            ac_paid: Vec::new(),
        }
    }

    /// Switch the chart to another granularity in place.
    /// Does nothing until the chart has been initialized.
    pub fn set_granularity(&mut self, requested: Granularity) -> Option<Granularity> {
        self.chart.as_ref()?;
        let (applied, curves) = self.curves_for(requested);
        if applied != requested {
            tracing::warn!("No {requested} data; showing {applied}");
        }
        if let Some(chart) = self.chart.as_mut() {
            chart.update(applied, &curves);
        }
        tracing::info!("S-curve switched to {applied}");
        Some(applied)
    }

    pub fn chart(&self) -> Option<&CurveChart> {
        self.chart.as_ref()
    }

    pub fn curves(&self) -> &CurveSet {
        &self.monthly
    }

    pub fn synthesized(&self) -> Synthesized {
        self.synthesized
    }

    pub fn blob(&self) -> &DashboardBlob {
        &self.blob
    }

    pub fn refs(&self) -> &BudgetRefs {
        &self.refs
    }
}
