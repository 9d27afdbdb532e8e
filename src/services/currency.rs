/// Whole US dollars, en-US grouping: `-1234.6` => `"-$1,235"`.
///
/// - halves round away from zero
/// - NaN and infinities are treated like a missing value
/// - anything that rounds to zero is plain `"$0"`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return ZERO_CURRENCY.to_string();
    }
    let rounded = value.round();
    if rounded == 0.0 {
        return ZERO_CURRENCY.to_string();
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}${}", group_thousands(&digits))
}

pub const ZERO_CURRENCY: &str = "$0";

pub fn format_optional_currency(value: Option<f64>) -> String {
    value.map_or_else(|| ZERO_CURRENCY.to_string(), format_currency)
}

/// Fraction in [0, 1] as a percentage with one decimal: `0.237` => `"23.7%"`.
pub fn format_percentage(fraction: f64) -> String {
    let tenths = (fraction * 1000.0).round();
    // -0.0 would print as "-0.0%".
    let tenths = if tenths == 0.0 { 0.0 } else { tenths };
    format!("{:.1}%", tenths / 10.0)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_dollars_with_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(1234.6), "$1,235");
        assert_eq!(format_currency(61250.4), "$61,250");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn negative_values_lead_with_the_sign() {
        assert_eq!(format_currency(-35000.0), "-$35,000");
        assert_eq!(format_currency(-0.4), "$0");
        assert_eq!(format_currency(-2.5), "-$3");
    }

    #[test]
    fn missing_values_format_as_zero() {
        assert_eq!(format_optional_currency(None), "$0");
        assert_eq!(format_optional_currency(Some(12.0)), "$12");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn percentage_keeps_one_decimal() {
        assert_eq!(format_percentage(0.237), "23.7%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(1.0), "100.0%");
        assert_eq!(format_percentage(0.00025), "0.0%");
        assert_eq!(format_percentage(0.0125), "1.3%");
        assert_eq!(format_percentage(-0.0), "0.0%");
        assert_eq!(format_percentage(-0.00004), "0.0%");
    }
}
