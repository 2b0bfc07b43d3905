//! Number formatting for labels and tooltips.

/// `1234567` to `"1.2M"`, `3400` to `"3.4K"`; smaller numbers are grouped
/// with thousands separators.
#[must_use]
pub fn format_compact(value: f64, precision: usize) -> String {
    if value >= 1_000_000.0 {
        format!("{:.precision$}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.precision$}K", value / 1_000.0)
    } else if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.precision$}")
    }
}

/// `10039107` to `"10,039,107"`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Whole dollars with thousands separators, e.g. `"$65,000"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_currency(value: f64) -> String {
    format!("${}", group_thousands(value.max(0.0).round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_suffixes() {
        assert_eq!(format_compact(10_039_107.0, 1), "10.0M");
        assert_eq!(format_compact(1_234_567.0, 1), "1.2M");
        assert_eq!(format_compact(3_400.0, 1), "3.4K");
        assert_eq!(format_compact(999.0, 1), "999");
        assert_eq!(format_compact(12.5, 1), "12.5");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(10_039_107), "10,039,107");
    }

    #[test]
    fn currency() {
        assert_eq!(format_currency(65_000.4), "$65,000");
    }
}
