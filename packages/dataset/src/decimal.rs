//! Locale-formatted decimal parsing.
//!
//! The POI table is exported with a comma as the decimal separator
//! (`"51,05"`). Values are normalized by replacing every `,` with `.`
//! before parsing, so `"51.05"` is accepted as well.

use std::num::ParseFloatError;

/// Parses a decimal that may use `,` as its separator.
///
/// Surrounding whitespace is not trimmed, so `" 51,05"` fails just like any
/// other non-numeric value.
///
/// # Errors
///
/// Returns [`ParseFloatError`] if the normalized text is not a valid `f64`.
pub fn parse_locale_decimal(raw: &str) -> Result<f64, ParseFloatError> {
    raw.replace(',', ".").parse::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_comma() {
        let value = parse_locale_decimal("51,05").unwrap();
        assert!((value - 51.05).abs() < 1e-12);
    }

    #[test]
    fn parses_decimal_point() {
        let value = parse_locale_decimal("3.7250").unwrap();
        assert!((value - 3.725).abs() < 1e-12);
    }

    #[test]
    fn parses_negative_and_integral() {
        assert!((parse_locale_decimal("-0,5").unwrap() + 0.5).abs() < 1e-12);
        assert!((parse_locale_decimal("4").unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(parse_locale_decimal("").is_err());
        assert!(parse_locale_decimal("n/a").is_err());
        assert!(parse_locale_decimal("1,2,3").is_err());
        assert!(parse_locale_decimal(" 51,05").is_err());
    }
}
