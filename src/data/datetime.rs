use chrono::{NaiveDate, NaiveDateTime};

/// Date layouts a period label may arrive in from a spreadsheet export.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
];

/// Month-only layouts, tried after the full-date ones.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%m/%Y", "%Y/%m"];

/// Turn a raw period label into the `YYYY-MM` form used for month labels.
/// Labels that don't look like dates are returned trimmed but otherwise
/// untouched ("Mes 1", "Ene").
pub fn format_period_label(raw: &str) -> String {
    let trimmed = raw.trim();
    match parse_period(trimmed) {
        Some(date) => date.format("%Y-%m").to_string(),
        None => trimmed.to_string(),
    }
}

fn parse_period(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // chrono needs a day to build a NaiveDate
    let padded = format!("{s}-01");
    for fmt in MONTH_FORMATS {
        let fmt_padded = format!("{fmt}-%d");
        if let Ok(d) = NaiveDate::parse_from_str(&padded, &fmt_padded) {
            return Some(d);
        }
    }
    None
}

/// Month label for a spreadsheet serial date (days since 1899-12-30).
pub fn excel_serial_to_label(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(chrono::Days::new(serial.floor() as u64))?;
    Some(date.format("%Y-%m").to_string())
}
