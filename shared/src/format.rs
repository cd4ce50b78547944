//! Display formatting for headline values.
//!
//! Mirrors locale-style output: thousands separators, at most two
//! fraction digits, trailing zeros trimmed.

use rust_decimal::Decimal;

/// Plain number with up to two decimals, trailing zeros trimmed.
pub fn number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract().abs() < 1e-9 {
        format!("{}", rounded as i64)
    } else {
        let fixed = format!("{:.2}", rounded);
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Grouped number, e.g. `1,234.5`.
pub fn thousands(value: f64) -> String {
    group_plain(&number(value))
}

/// Grouped decimal with the same two-digit display rounding.
pub fn thousands_dec(value: Decimal) -> String {
    group_plain(&value.round_dp(2).normalize().to_string())
}

/// `$`-prefixed grouped amount, e.g. `$4,000`.
pub fn currency(value: f64) -> String {
    format!("${}", thousands(value))
}

pub fn currency_dec(value: Decimal) -> String {
    format!("${}", thousands_dec(value))
}

pub fn percent(value: f64) -> String {
    format!("{}%", number(value))
}

pub fn days(value: f64) -> String {
    format!("{} days", number(value))
}

pub fn multiplier(value: f64) -> String {
    format!("{}x", number(value))
}

fn group_plain(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let mut parts = unsigned.splitn(2, '.');
    let integer = parts.next().unwrap_or("0");
    let grouped = group_digits(integer);
    match parts.next() {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

fn group_digits(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_number_trims_trailing_zeros() {
        assert_eq!(number(12.5), "12.5");
        assert_eq!(number(12.0), "12");
        assert_eq!(number(12.34), "12.34");
        assert_eq!(number(0.0), "0");
        assert_eq!(number(-3.5), "-3.5");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(thousands(4000.0), "4,000");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1234567.89), "1,234,567.89");
        assert_eq!(thousands(-4000.5), "-4,000.5");
    }

    #[test]
    fn test_currency_and_units() {
        assert_eq!(currency(4000.0), "$4,000");
        assert_eq!(percent(12.5), "12.5%");
        assert_eq!(days(45.0), "45 days");
        assert_eq!(multiplier(8.2), "8.2x");
    }

    #[test]
    fn test_decimal_variants() {
        let d = Decimal::from_str("1234500.00").unwrap();
        assert_eq!(thousands_dec(d), "1,234,500");
        assert_eq!(currency_dec(Decimal::from_str("99.50").unwrap()), "$99.5");
    }

    proptest! {
        /// Stripping separators recovers the ungrouped rendering.
        #[test]
        fn prop_grouping_preserves_digits(value in 0u64..10_000_000_000) {
            let grouped = thousands(value as f64);
            let stripped: String = grouped.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, value.to_string());
        }
    }
}
