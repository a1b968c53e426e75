use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a land value has more digits than fit in a `u64`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("land value '{input}' is too large")]
pub struct LandValueParseError {
    input: String,
}

/// Keeps only the ASCII digits of a free-text currency field.
fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Parses a free-text land value into whole currency units.
///
/// Every character that is not a digit is dropped first, so thousands
/// separators, currency symbols and unit suffixes are all tolerated
/// (`"₩500,000,000"` and `"500,000,000 won"` both read as 500,000,000).
/// Input without any digit is treated as absent.
pub fn parse_land_value(s: &str) -> Result<Option<u64>, LandValueParseError> {
    let digits = digits_only(s);
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|e| {
        tracing::warn!(input = %s, "invalid land value: {}", e);
        LandValueParseError {
            input: s.to_string(),
        }
    })
}

/// Formats a whole amount with comma thousands separators.
///
/// Any fractional part is dropped.
pub fn format_amount(amount: Decimal) -> String {
    let whole = amount.trunc().abs().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount.trunc().is_sign_negative() && !amount.trunc().is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Parses a yes/no style flag as written in CSV files.
///
/// Empty input counts as `false`.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Some(false),
        "true" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_land_value_accepts_comma_thousands_separator() {
        assert_eq!(parse_land_value("500,000,000").unwrap(), Some(500_000_000));
        assert_eq!(parse_land_value("1,234").unwrap(), Some(1234));
    }

    #[test]
    fn parse_land_value_drops_symbols_and_units() {
        assert_eq!(parse_land_value("₩ 200,000,000 won").unwrap(), Some(200_000_000));
    }

    #[test]
    fn parse_land_value_empty_is_absent() {
        assert_eq!(parse_land_value("").unwrap(), None);
        assert_eq!(parse_land_value("   ").unwrap(), None);
        assert_eq!(parse_land_value("n/a").unwrap(), None);
    }

    #[test]
    fn parse_land_value_zero_is_present() {
        assert_eq!(parse_land_value("0").unwrap(), Some(0));
    }

    #[test]
    fn parse_land_value_too_large_returns_error() {
        assert!(parse_land_value("99,999,999,999,999,999,999").is_err());
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(3000000)), "3,000,000");
        assert_eq!(format_amount(dec!(610000)), "610,000");
        assert_eq!(format_amount(dec!(450000000)), "450,000,000");
    }

    #[test]
    fn format_amount_small_values() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1,000");
    }

    #[test]
    fn format_amount_drops_fraction() {
        assert_eq!(format_amount(dec!(2549999.99)), "2,549,999");
    }

    #[test]
    fn format_amount_keeps_sign() {
        assert_eq!(format_amount(dec!(-1234567)), "-1,234,567");
    }

    #[test]
    fn parse_flag_variants() {
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
