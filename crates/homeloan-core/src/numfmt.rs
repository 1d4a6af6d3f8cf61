//! Locale-tolerant numeric parsing and display formatting.
//!
//! Accepts "1 234 567,89" and "1234567.89" alike on the way in; renders
//! monetary amounts as "1 234 567.89" on the way out. Kept separate from the
//! engine so the parse/format round trip can be tested on its own.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::HomeLoanError;
use crate::HomeLoanResult;

/// Round to whole cents, ties away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a human-entered number. Spaces (including non-breaking spaces)
/// group thousands; comma or dot marks the decimal.
pub fn parse_decimal(field: &str, raw: &str) -> HomeLoanResult<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(HomeLoanError::InvalidInput {
            field: field.to_string(),
            reason: "Value is empty".into(),
        });
    }

    Decimal::from_str_exact(&cleaned).map_err(|_| HomeLoanError::InvalidInput {
        field: field.to_string(),
        reason: format!("'{}' is not a number", raw.trim()),
    })
}

/// Fixed two-decimal rendering without grouping ("8333.73").
pub fn format_cents(value: Decimal) -> String {
    let rounded = round_cents(value);
    let mut digits = rounded.abs().to_string();

    match digits.find('.') {
        None => digits.push_str(".00"),
        Some(pos) => {
            for _ in (digits.len() - pos - 1)..2 {
                digits.push('0');
            }
        }
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Thousands-grouped two-decimal rendering ("1 234 567.89").
pub fn format_grouped(value: Decimal) -> String {
    let plain = format_cents(value);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_grouped_comma_decimal() {
        let parsed = parse_decimal("home_price", "1 234 567,89").unwrap();
        assert_eq!(parsed, dec!(1234567.89));
    }

    #[test]
    fn test_parse_nbsp_and_dot_decimal() {
        let parsed = parse_decimal("down_payment", "1\u{a0}000.50").unwrap();
        assert_eq!(parsed, dec!(1000.50));
    }

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(parse_decimal("home_price", " 5000000 ").unwrap(), dec!(5000000));
    }

    #[test]
    fn test_parse_empty_rejected() {
        match parse_decimal("term_years", "   ") {
            Err(HomeLoanError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(parse_decimal("annual_rate_percent", "12x3").is_err());
        assert!(parse_decimal("annual_rate_percent", "1.2.3").is_err());
    }

    #[test]
    fn test_format_cents_pads_fraction() {
        assert_eq!(format_cents(dec!(5.5)), "5.50");
        assert_eq!(format_cents(dec!(100)), "100.00");
        assert_eq!(format_cents(dec!(0)), "0.00");
    }

    #[test]
    fn test_format_cents_negative_zero_collapses() {
        assert_eq!(format_cents(dec!(-0.004)), "0.00");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(dec!(1234567.89)), "1 234 567.89");
        assert_eq!(format_grouped(dec!(333.5)), "333.50");
        assert_eq!(format_grouped(dec!(-45000)), "-45 000.00");
        assert_eq!(format_grouped(dec!(1000)), "1 000.00");
        assert_eq!(format_grouped(dec!(100)), "100.00");
    }

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(dec!(2.005)), dec!(2.01));
        assert_eq!(round_cents(dec!(2.004)), dec!(2.00));
        assert_eq!(round_cents(dec!(-2.005)), dec!(-2.01));
    }

    #[test]
    fn test_parse_format_round_trip() {
        for raw in ["0.01", "999.99", "8333.73", "1234567.89", "-0.40", "1000000.00"] {
            let value = parse_decimal("value", raw).unwrap();
            let reparsed = parse_decimal("value", &format_grouped(value)).unwrap();
            assert_eq!(reparsed, value, "round trip failed for {raw}");
        }
    }
}
