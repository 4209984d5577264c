use std::path::Path;

use serde_json::Value;

use crate::data::blob::DashboardBlob;
use crate::data::datetime;
use crate::error::LoadError;

/// Header names recognized in tabular exports, lower-cased.
const LABEL_COLUMNS: &[&str] = &["mes", "label", "period", "periodo"];

/// Load a dashboard blob from a JSON, CSV or Excel file.
pub fn load_file(path: &Path) -> Result<DashboardBlob, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let blob = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        "xls" | "xlsx" => load_excel(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };
    tracing::debug!(
        "Loaded {:?}: {} periods, {} billing rows",
        path,
        blob.meses.len(),
        blob.facturacion_mensual.len()
    );
    Ok(blob)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_json(path: &Path) -> Result<DashboardBlob, LoadError> {
    let content = read_bytes(path)?;
    Ok(serde_json::from_slice(&content)?)
}

fn load_csv(path: &Path) -> Result<DashboardBlob, LoadError> {
    let content = read_bytes(path)?;
    // Fallback: treat as latin1 (each byte maps to the same code point)
    let text = String::from_utf8(content.clone())
        .unwrap_or_else(|_| content.iter().map(|&b| b as char).collect());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| Cell::Text(s.to_string())).collect());
    }
    rows_to_blob(rows)
}

fn load_excel(path: &Path) -> Result<DashboardBlob, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Spreadsheet("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => Cell::Empty,
                    Data::String(s) => Cell::Text(s.clone()),
                    Data::Float(f) => Cell::Number(*f),
                    Data::Int(i) => Cell::Number(*i as f64),
                    Data::Bool(b) => Cell::Text(b.to_string()),
                    Data::DateTime(dt) => Cell::Date(dt.as_f64()),
                    Data::DateTimeIso(s) => Cell::Text(s.clone()),
                    Data::DurationIso(s) => Cell::Text(s.clone()),
                    Data::Error(e) => Cell::Text(format!("{e:?}")),
                })
                .collect()
        })
        .collect();
    rows_to_blob(rows)
}

/// A cell as read from a tabular source, before mapping into the blob.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Spreadsheet serial date.
    Date(f64),
}

impl Cell {
    fn to_sample(&self) -> Value {
        match self {
            Cell::Empty => Value::Null,
            Cell::Text(s) if s.trim().is_empty() => Value::Null,
            Cell::Text(s) => Value::String(s.trim().to_string()),
            Cell::Number(f) | Cell::Date(f) => {
                serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
            }
        }
    }

    fn to_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => datetime::format_period_label(s),
            Cell::Number(f) => f.to_string(),
            Cell::Date(serial) => {
                datetime::excel_serial_to_label(*serial).unwrap_or_else(|| serial.to_string())
            }
        }
    }

    fn header_name(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_lowercase(),
            _ => String::new(),
        }
    }
}

/// Map header + row-major cells into the monthly series of a blob.
/// The first row is the header; unknown columns are ignored.
fn rows_to_blob(rows: Vec<Vec<Cell>>) -> Result<DashboardBlob, LoadError> {
    let mut iter = rows.into_iter();
    let header = iter.next().ok_or(LoadError::Empty)?;
    let data_rows: Vec<Vec<Cell>> = iter
        .filter(|row| row.iter().any(|c| c.to_sample() != Value::Null))
        .collect();
    if data_rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let names: Vec<String> = header.iter().map(Cell::header_name).collect();
    let find = |wanted: &[&str]| names.iter().position(|n| wanted.contains(&n.as_str()));

    let label_idx = find(LABEL_COLUMNS);
    let pv_idx = find(&["pv"]);
    let ev_idx = find(&["ev"]);
    let ac_idx = find(&["ac"]);
    let paid_idx = find(&["ac_paid"]);

    let column = |idx: Option<usize>| -> Vec<Value> {
        match idx {
            Some(i) => data_rows
                .iter()
                .map(|row| row.get(i).map_or(Value::Null, Cell::to_sample))
                .collect(),
            None => Vec::new(),
        }
    };

    let meses = match label_idx {
        Some(i) => data_rows
            .iter()
            .map(|row| Value::String(row.get(i).map(Cell::to_label).unwrap_or_default()))
            .collect(),
        None => (1..=data_rows.len())
            .map(|m| Value::String(format!("Mes {m}")))
            .collect(),
    };

    Ok(DashboardBlob {
        meses,
        pv: column(pv_idx),
        ev: column(ev_idx),
        ac: column(ac_idx),
        ac_paid: column(paid_idx),
        ..DashboardBlob::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::blob::Sample;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn rows_map_onto_monthly_series() {
        let rows = vec![
            vec![text("Mes"), text("PV"), text("EV"), text("AC"), text("notes")],
            vec![text("2024-01-31"), text("10"), text(""), text("5"), text("x")],
            vec![Cell::Date(45366.0), Cell::Number(20.0), Cell::Empty, text("9")],
        ];
        let blob = rows_to_blob(rows).unwrap();
        assert_eq!(blob.month_labels(), vec!["2024-01", "2024-03"]);
        assert_eq!(blob.pv.iter().map(Sample::coerce).collect::<Vec<_>>(), vec![10.0, 20.0]);
        assert_eq!(blob.ev, vec![Value::Null, Value::Null]);
        assert_eq!(blob.ac.len(), 2);
        assert!(blob.ac_paid.is_empty());
    }

    #[test]
    fn missing_label_column_numbers_months() {
        let rows = vec![vec![text("pv")], vec![text("1")], vec![text("2")]];
        let blob = rows_to_blob(rows).unwrap();
        assert_eq!(blob.month_labels(), vec!["Mes 1", "Mes 2"]);
    }

    #[test]
    fn header_only_is_empty() {
        let rows = vec![vec![text("pv")], vec![text(""), Cell::Empty]];
        assert!(matches!(rows_to_blob(rows), Err(LoadError::Empty)));
        assert!(matches!(rows_to_blob(Vec::new()), Err(LoadError::Empty)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("dashboard.parquet")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "parquet"));
    }
}
