use crate::config::Settings;
use crate::processing::executive::{FormulaSummary, GridRow, SummaryTable};
use crate::report::format::{format_currency, format_percent};

const GRID_HEADER: [&str; 6] = ["Month", "Billed", "Cost", "Advance", "Efficiency", "Quarter"];

/// Render the executive grid as a right-aligned text table.
pub fn render_grid(rows: &[GridRow], settings: &Settings) -> String {
    let money = |v: f64| format_currency(v, &settings.currency_prefix);
    let pct = |v: f64| format_percent(v, settings.percent_decimals);

    let mut cells: Vec<[String; 6]> = vec![GRID_HEADER.map(str::to_string)];
    for row in rows {
        cells.push([
            row.label.clone(),
            money(row.billed),
            money(row.cost),
            pct(row.advance_pct),
            pct(row.efficiency_pct),
            money(row.quarter_sum),
        ]);
    }

    let mut widths = [0usize; 6];
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in &cells {
        let mut parts = Vec::with_capacity(6);
        for (i, cell) in line.iter().enumerate() {
            if i == 0 {
                parts.push(format!("{cell:<width$}", width = widths[i]));
            } else {
                parts.push(format!("{cell:>width$}", width = widths[i]));
            }
        }
        out.push_str(parts.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn push_line(out: &mut String, name: &str, value: String) {
    out.push_str(&format!("{name:<24}{value}\n"));
}

pub fn render_summary(summary: &FormulaSummary, table: &SummaryTable, settings: &Settings) -> String {
    let money = |v: f64| format_currency(v, &settings.currency_prefix);
    let pct = |v: f64| format_percent(v, settings.percent_decimals);

    let mut out = String::new();
    out.push_str("Formula summary\n");
    push_line(&mut out, "Contract amount", money(summary.contract_amount));
    push_line(&mut out, "Planned BAC", money(summary.bac_planned));
    push_line(&mut out, "AC to date", money(summary.ac_jtd));
    push_line(&mut out, "Client invoiced", money(summary.invoiced));
    push_line(&mut out, "% complete", pct(summary.pct_complete));
    push_line(&mut out, "% billing advance", pct(summary.pct_billing_advance));
    push_line(&mut out, "Global efficiency", pct(summary.global_efficiency));
    push_line(&mut out, "Total hours", format!("{:.2}", summary.total_hours));
    push_line(&mut out, "Materials", money(summary.materials));
    push_line(&mut out, "Services", money(summary.services));
    push_line(&mut out, "Subcontracted", money(summary.subcontracted));
    push_line(&mut out, "Expenses", money(summary.expenses));
    push_line(
        &mut out,
        "Components",
        format!("{} (diff: {})", summary.status.label(), money(summary.difference)),
    );

    out.push_str("\nSummary table\n");
    push_line(&mut out, "Contract amount", money(table.contract_amount));
    push_line(&mut out, "Total cost", format!("{} ({})", money(table.cost_total), pct(table.cost_pct)));
    push_line(&mut out, "Margin", format!("{} ({})", money(table.margin), pct(table.margin_pct)));
    push_line(&mut out, "Invoiced", format!("{} ({})", money(table.invoiced), pct(table.invoiced_pct)));
    out
}
