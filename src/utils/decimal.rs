use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Parses an optional decimal filter value. Malformed or empty input is
/// treated the same as an absent filter rather than an error.
pub fn parse_decimal_filter(raw: Option<&str>) -> Option<BigDecimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    BigDecimal::from_str(raw).ok()
}

/// Same fail-open policy for integer filter values (bedrooms, page).
pub fn parse_int_filter(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_fractional_values() {
        assert_eq!(
            parse_decimal_filter(Some("1500")),
            Some(BigDecimal::from(1500))
        );
        assert_eq!(
            parse_decimal_filter(Some(" 99.50 ")),
            BigDecimal::from_str("99.50").ok()
        );
    }

    #[test]
    fn malformed_input_is_ignored() {
        assert_eq!(parse_decimal_filter(Some("cheap")), None);
        assert_eq!(parse_decimal_filter(Some("")), None);
        assert_eq!(parse_decimal_filter(None), None);
        assert_eq!(parse_int_filter(Some("two")), None);
        assert_eq!(parse_int_filter(Some("2.5")), None);
    }

    #[test]
    fn negative_bounds_still_parse() {
        assert_eq!(parse_int_filter(Some("-1")), Some(-1));
    }
}
