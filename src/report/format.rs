/// Format an amount as `S/ 1,234.56` (prefix configurable).
/// Negative amounts carry the sign before the prefix; non-finite ones print
/// as zero.
pub fn format_currency(value: f64, prefix: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{prefix}{whole}.{:02}", cents % 100)
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.decimals$}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency() {
        assert_eq!(format_currency(1234.5, "S/ "), "S/ 1,234.50");
        assert_eq!(format_currency(0.0, "S/ "), "S/ 0.00");
        assert_eq!(format_currency(1_000_000.0, "$"), "$1,000,000.00");
        assert_eq!(format_currency(-12.0, "S/ "), "-S/ 12.00");
        assert_eq!(format_currency(999.999, "S/ "), "S/ 1,000.00");
        assert_eq!(format_currency(f64::NAN, "S/ "), "S/ 0.00");
        assert_eq!(format_currency(-0.001, "S/ "), "S/ 0.00");
    }

    #[test]
    fn percent() {
        assert_eq!(format_percent(12.345, 1), "12.3%");
        assert_eq!(format_percent(100.0, 0), "100%");
        assert_eq!(format_percent(f64::INFINITY, 1), "0.0%");
    }
}
