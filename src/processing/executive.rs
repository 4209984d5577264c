//! Billing-versus-cost views for the executive panel.
//!
//! Actual cost arrives cumulative; billing arrives per month. Everything here
//! works on the monthly deltas of AC, aligned to the billing rows.

use serde::Serialize;

use crate::data::blob::{BudgetRefs, CostBreakdown, DashboardBlob, MonthlyBilling, Sample};
use crate::processing::fallback::round_to;
use crate::processing::metrics::{billing_advance, efficiency, percent_complete, ratio_pct, TrendSeries};

/// Component totals may differ from the declared total by this much.
pub const COMPONENT_TOLERANCE: f64 = 0.5;

/// Per-period cost out of a cumulative AC series.
pub fn monthly_deltas(ac: &[f64]) -> Vec<f64> {
    let mut prev = 0.0;
    ac.iter()
        .map(|&v| {
            let d = v - prev;
            prev = v;
            d
        })
        .collect()
}

fn billing_label(row: &MonthlyBilling, index: usize) -> String {
    match row.mes.as_deref() {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("Mes {}", index + 1),
    }
}

/// Labels for the billing charts when there are no billing rows.
fn fallback_labels(month_labels: &[String]) -> Vec<String> {
    if month_labels.is_empty() {
        (1..=3).map(|m| format!("Mes {m}")).collect()
    } else {
        month_labels.iter().map(|m| format!("Mes {m}")).collect()
    }
}

/// Cumulative billing against cumulative cost, with advance percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingProgress {
    pub labels: Vec<String>,
    pub billed_cumulative: Vec<f64>,
    pub ac_cumulative: Vec<f64>,
    pub advance_pct: Vec<f64>,
}

pub fn billing_progress(
    billing: &[MonthlyBilling],
    ac: &[f64],
    bac_real: f64,
    month_labels: &[String],
) -> BillingProgress {
    if billing.is_empty() {
        let labels = fallback_labels(month_labels);
        let n = labels.len();
        return BillingProgress {
            billed_cumulative: vec![0.0; n],
            ac_cumulative: ac.iter().copied().take(n).collect(),
            advance_pct: vec![0.0; n],
            labels,
        };
    }

    let labels: Vec<String> = billing.iter().enumerate().map(|(i, r)| billing_label(r, i)).collect();
    let mut acc = 0.0;
    let billed_cumulative: Vec<f64> = billing
        .iter()
        .map(|r| {
            acc += r.total();
            round_to(acc, 2)
        })
        .collect();
    let ac_cumulative: Vec<f64> = ac.iter().copied().take(labels.len()).collect();

    let advance_pct = billed_cumulative
        .iter()
        .enumerate()
        .map(|(i, &billed)| {
            let pct = if bac_real > 0.0 {
                billed / bac_real * 100.0
            } else {
                match ac_cumulative.get(i) {
                    Some(&cost) if cost != 0.0 => billed / cost * 100.0,
                    _ => 0.0,
                }
            };
            round_to(pct, 1)
        })
        .collect();

    BillingProgress { labels, billed_cumulative, ac_cumulative, advance_pct }
}

/// Monthly billing next to monthly cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingVsCost {
    pub labels: Vec<String>,
    pub billed: Vec<f64>,
    pub cost: Vec<f64>,
}

pub fn billing_vs_cost(billing: &[MonthlyBilling], ac: &[f64], month_labels: &[String]) -> BillingVsCost {
    let deltas = monthly_deltas(ac);
    if billing.is_empty() {
        let labels = fallback_labels(month_labels);
        return BillingVsCost {
            billed: vec![0.0; labels.len()],
            cost: deltas.into_iter().take(labels.len()).collect(),
            labels,
        };
    }
    BillingVsCost {
        labels: billing.iter().enumerate().map(|(i, r)| billing_label(r, i)).collect(),
        billed: billing.iter().map(MonthlyBilling::total).collect(),
        cost: (0..billing.len()).map(|i| deltas.get(i).copied().unwrap_or(0.0)).collect(),
    }
}

/// Monthly billing/cost efficiency. A month without cost reads as 100%.
pub fn efficiency_trend(billing: &[MonthlyBilling], ac: &[f64], month_labels: &[String]) -> TrendSeries {
    if billing.is_empty() {
        let labels = fallback_labels(month_labels);
        let values = vec![100.0; labels.len()];
        return TrendSeries { labels, values };
    }
    let view = billing_vs_cost(billing, ac, month_labels);
    let values = view
        .billed
        .iter()
        .zip(&view.cost)
        .map(|(&fact, &cost)| {
            let eff = if cost > 0.0 { fact / cost * 100.0 } else { 100.0 };
            round_to(eff, 1)
        })
        .collect();
    TrendSeries { labels: view.labels, values }
}

/// One month of the executive grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub label: String,
    pub billed: f64,
    pub cost: f64,
    pub advance_pct: f64,
    pub efficiency_pct: f64,
    /// Running billed + cost since the start of the quarter.
    pub quarter_sum: f64,
}

pub fn executive_grid(billing: &[MonthlyBilling], ac: &[f64], bac_real: f64, quarter_len: usize) -> Vec<GridRow> {
    let deltas = monthly_deltas(ac);
    let quarter_len = quarter_len.max(1);
    let mut quarter_sum = 0.0;
    let mut billed_acc = 0.0;
    let mut rows = Vec::with_capacity(billing.len());

    for (r, row) in billing.iter().enumerate() {
        let billed = row.total();
        let cost = deltas.get(r).copied().unwrap_or(0.0);
        quarter_sum += billed + cost;
        billed_acc += billed;

        rows.push(GridRow {
            label: billing_label(row, r),
            billed,
            cost,
            advance_pct: ratio_pct(billed_acc, bac_real),
            efficiency_pct: efficiency(billed, cost),
            quarter_sum,
        });

        if (r + 1) % quarter_len == 0 {
            quarter_sum = 0.0;
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComponentStatus {
    Ok,
    Verify,
}

impl ComponentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentStatus::Ok => "OK",
            ComponentStatus::Verify => "VERIFY",
        }
    }
}

/// Values behind the "formula summary" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaSummary {
    pub contract_amount: f64,
    pub bac_planned: f64,
    pub ac_jtd: f64,
    pub invoiced: f64,
    pub pct_complete: f64,
    pub pct_billing_advance: f64,
    pub global_efficiency: f64,
    pub total_hours: f64,
    pub materials: f64,
    pub services: f64,
    pub subcontracted: f64,
    pub expenses: f64,
    pub components_total: f64,
    pub declared_total: f64,
    pub difference: f64,
    pub status: ComponentStatus,
}

fn nonzero_or(value: f64, fallback: f64) -> f64 {
    if value != 0.0 && value.is_finite() { value } else { fallback }
}

fn invoiced_total(refs: &BudgetRefs, billing: &[MonthlyBilling]) -> f64 {
    if refs.invoiced_total != 0.0 {
        refs.invoiced_total
    } else {
        billing.iter().map(MonthlyBilling::amount).sum()
    }
}

fn declared_total(costs: &CostBreakdown, refs: &BudgetRefs) -> f64 {
    nonzero_or(costs.total.coerce(), refs.bac_planned)
}

impl FormulaSummary {
    /// `ac` is the normalized cumulative actual cost.
    pub fn compute(blob: &DashboardBlob, ac: &[f64]) -> Self {
        let refs = blob.refs();
        let ac_jtd = ac.last().copied().unwrap_or(0.0);
        let invoiced = invoiced_total(&refs, &blob.facturacion_mensual);
        let costs = &blob.cost_data;

        let materials = costs.materiales.coerce();
        let services = costs.servicios.coerce();
        let subcontracted = costs.subcontratado.coerce();
        let expenses = costs.gastos.coerce();
        let components_total = materials + services + subcontracted + expenses;
        let declared_total = declared_total(costs, &refs);
        let difference = components_total - declared_total;
        let status = if difference.abs() < COMPONENT_TOLERANCE {
            ComponentStatus::Ok
        } else {
            ComponentStatus::Verify
        };

        Self {
            contract_amount: refs.contract_amount,
            bac_planned: refs.bac_planned,
            ac_jtd,
            invoiced,
            pct_complete: percent_complete(ac_jtd, refs.bac_planned),
            pct_billing_advance: billing_advance(invoiced, refs.contract_amount),
            global_efficiency: efficiency(invoiced, ac_jtd),
            total_hours: blob.horas_data.iter().map(|h| h.hours.coerce()).sum(),
            materials,
            services,
            subcontracted,
            expenses,
            components_total,
            declared_total,
            difference,
            status,
        }
    }
}

/// Contract, cost and margin figures of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub contract_amount: f64,
    pub cost_total: f64,
    pub margin: f64,
    pub invoiced: f64,
    pub cost_pct: f64,
    pub margin_pct: f64,
    pub invoiced_pct: f64,
}

impl SummaryTable {
    pub fn compute(blob: &DashboardBlob) -> Self {
        let refs = blob.refs();
        let cost_total = declared_total(&blob.cost_data, &refs);
        let margin = refs.contract_amount - cost_total;
        Self {
            contract_amount: refs.contract_amount,
            cost_total,
            margin,
            invoiced: refs.invoiced_total,
            cost_pct: ratio_pct(cost_total, refs.contract_amount),
            margin_pct: ratio_pct(margin, refs.contract_amount),
            invoiced_pct: ratio_pct(refs.invoiced_total, refs.contract_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bill(mes: &str, total: f64) -> MonthlyBilling {
        MonthlyBilling { mes: Some(mes.to_string()), total: json!(total), amount: json!(total) }
    }

    #[test]
    fn deltas_from_cumulative() {
        assert_eq!(monthly_deltas(&[10.0, 25.0, 25.0, 40.0]), vec![10.0, 15.0, 0.0, 15.0]);
        assert!(monthly_deltas(&[]).is_empty());
    }

    #[test]
    fn grid_resets_quarter_sum() {
        let billing: Vec<_> = (1..=4).map(|m| bill(&format!("2024-0{m}"), 10.0)).collect();
        let ac = [5.0, 10.0, 20.0, 20.0];
        let rows = executive_grid(&billing, &ac, 200.0, 3);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].cost, 5.0);
        assert_eq!(rows[0].quarter_sum, 15.0);
        assert_eq!(rows[1].quarter_sum, 30.0);
        assert_eq!(rows[2].quarter_sum, 50.0);
        // new quarter
        assert_eq!(rows[3].quarter_sum, 10.0);
        assert_eq!(rows[3].cost, 0.0);
        assert_eq!(rows[3].efficiency_pct, 100.0);
        assert_eq!(rows[1].efficiency_pct, 200.0);
        assert_eq!(rows[3].advance_pct, 20.0);
    }

    #[test]
    fn grid_labels_unnamed_months() {
        let billing = vec![MonthlyBilling { mes: None, total: json!(0), amount: json!(0) }];
        let rows = executive_grid(&billing, &[], 0.0, 3);
        assert_eq!(rows[0].label, "Mes 1");
        assert_eq!(rows[0].advance_pct, 0.0);
        assert_eq!(rows[0].efficiency_pct, 0.0);
    }

    #[test]
    fn progress_prefers_bac_then_cost() {
        let billing = vec![bill("a", 25.0), bill("b", 25.0)];
        let p = billing_progress(&billing, &[50.0, 100.0, 150.0], 200.0, &[]);
        assert_eq!(p.billed_cumulative, vec![25.0, 50.0]);
        assert_eq!(p.ac_cumulative, vec![50.0, 100.0]);
        assert_eq!(p.advance_pct, vec![12.5, 25.0]);

        let p = billing_progress(&billing, &[50.0, 0.0], 0.0, &[]);
        assert_eq!(p.advance_pct, vec![50.0, 0.0]);
    }

    #[test]
    fn progress_without_billing_falls_back_to_months() {
        let months = vec!["1".to_string(), "2".to_string()];
        let p = billing_progress(&[], &[7.0, 9.0, 11.0], 100.0, &months);
        assert_eq!(p.labels, vec!["Mes 1", "Mes 2"]);
        assert_eq!(p.ac_cumulative, vec![7.0, 9.0]);
        assert_eq!(p.advance_pct, vec![0.0, 0.0]);

        let p = billing_progress(&[], &[], 0.0, &[]);
        assert_eq!(p.labels, vec!["Mes 1", "Mes 2", "Mes 3"]);
    }

    #[test]
    fn efficiency_trend_defaults_to_full() {
        let billing = vec![bill("a", 30.0), bill("b", 10.0)];
        let trend = efficiency_trend(&billing, &[20.0, 20.0], &[]);
        assert_eq!(trend.labels, vec!["a", "b"]);
        assert_eq!(trend.values, vec![150.0, 100.0]);

        let trend = efficiency_trend(&[], &[], &["x".to_string()]);
        assert_eq!(trend.labels, vec!["Mes x"]);
        assert_eq!(trend.values, vec![100.0]);
    }

    #[test]
    fn billing_vs_cost_aligns_to_billing_rows() {
        let billing = vec![bill("a", 30.0), bill("b", 10.0), bill("c", 5.0)];
        let view = billing_vs_cost(&billing, &[20.0, 35.0], &[]);
        assert_eq!(view.billed, vec![30.0, 10.0, 5.0]);
        assert_eq!(view.cost, vec![20.0, 15.0, 0.0]);
    }

    #[test]
    fn formula_summary() {
        let blob: DashboardBlob = serde_json::from_value(json!({
            "bacPlaneado": 1000,
            "contractAmount": 1500,
            "facturacionMensual": [{"mes": "a", "total": 100, "amount": 300}, {"mes": "b", "amount": 150}],
            "costData": {"materiales": 400, "servicios": 300, "subcontratado": 200, "gastos": 100.2},
            "horasData": [{"hours": 8}, {"hours": 7.5}]
        }))
        .unwrap();
        let s = FormulaSummary::compute(&blob, &[100.0, 250.0]);

        assert_eq!(s.ac_jtd, 250.0);
        assert_eq!(s.invoiced, 450.0);
        assert_eq!(s.pct_complete, 25.0);
        assert_eq!(s.pct_billing_advance, 30.0);
        assert_eq!(s.global_efficiency, 180.0);
        assert_eq!(s.total_hours, 15.5);
        assert_eq!(s.declared_total, 1000.0);
        assert_eq!(s.status, ComponentStatus::Ok);

        let mut off = blob.clone();
        off.cost_data.total = json!(900);
        assert_eq!(FormulaSummary::compute(&off, &[]).status, ComponentStatus::Verify);
    }

    #[test]
    fn summary_table_margin() {
        let blob: DashboardBlob = serde_json::from_value(json!({
            "contractAmount": 2000,
            "facturadoClienteTotal": 500,
            "costData": {"total": 1500}
        }))
        .unwrap();
        let t = SummaryTable::compute(&blob);
        assert_eq!(t.margin, 500.0);
        assert_eq!(t.cost_pct, 75.0);
        assert_eq!(t.margin_pct, 25.0);
        assert_eq!(t.invoiced_pct, 25.0);

        let empty = SummaryTable::compute(&DashboardBlob::default());
        assert_eq!(empty.cost_pct, 0.0);
    }
}
