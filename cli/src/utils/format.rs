/// Rendered in place of a missing numeric value.
pub const NO_DATA: &str = "no data";

/// `$12.3M` style amount.
pub fn format_millions(value: f64) -> String {
    format!("${:.1}M", value / 1_000_000.0)
}

pub fn format_optional_currency(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", format_number_with_separator(v)),
        None => NO_DATA.to_string(),
    }
}

/// Percent rounded half-up to a whole number.
pub fn format_rounded_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

/// Format with thousands separators, no decimals.
pub fn format_number_with_separator(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Shorten long owner names for fixed-width output.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        assert_eq!(format_number_with_separator(0.0), "0");
        assert_eq!(format_number_with_separator(999.0), "999");
        assert_eq!(format_number_with_separator(1234567.4), "1,234,567");
        assert_eq!(format_number_with_separator(-45000.0), "-45,000");
    }

    #[test]
    fn money_and_percent() {
        assert_eq!(format_millions(450_000.0), "$0.5M");
        assert_eq!(format_optional_currency(None), NO_DATA);
        assert_eq!(format_optional_currency(Some(125000.0)), "$125,000");
        assert_eq!(format_rounded_percent(66.666), "67%");
        assert_eq!(format_rounded_percent(32.5), "33%");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_label("ACME LLC", 30), "ACME LLC");
        assert_eq!(truncate_label("ABCDEFGHIJ", 4), "ABCD...");
    }
}
