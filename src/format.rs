//! Rendering of evaluation results.
//!
//! Results are rounded half-to-even on the shortest decimal representation of
//! the value, so `0.125` at two digits prints as `0.12` and `2.675` as `2.68`.

use crate::eval::evaluate;
use crate::settings::{Settings, MAX_PRECISION};
use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Formats `value` with exactly `precision` fractional digits and a `.`
/// separator. Precision is capped at [`MAX_PRECISION`].
pub fn format_result(value: f64, precision: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.min(MAX_PRECISION);
    // `Display` for f64 never uses exponent notation, so this always parses
    let Ok(decimal) = BigDecimal::from_str(&value.to_string()) else {
        return format!("{:.*}", precision as usize, value);
    };
    let rounded = decimal.with_scale_round(i64::from(precision), RoundingMode::HalfEven);
    fixed_point(rounded, precision as usize)
}

/// Writes out the unscaled digits of `rounded` with a decimal point inserted
/// `scale` places from the right. Unlike `BigDecimal`'s `Display`, this never
/// switches to exponent notation.
fn fixed_point(rounded: BigDecimal, scale: usize) -> String {
    let (unscaled, _) = rounded.into_bigint_and_exponent();
    let unscaled = unscaled.to_string();
    let (sign, digits) = match unscaled.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", unscaled.as_str()),
    };
    let digits = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    if scale == 0 {
        format!("{}{}", sign, int_part)
    } else {
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

/// Evaluates `input` and renders either the formatted result or an
/// `Error: ` line.
pub fn render(input: &str, settings: &Settings) -> String {
    match evaluate(input, settings) {
        Ok(value) => format_result(value, settings.precision),
        Err(err) => format!("Error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AllowedOperations;

    #[test]
    fn pads_to_precision() {
        assert_eq!("4.00", format_result(4.0, 2));
        assert_eq!("5", format_result(5.0, 0));
        assert_eq!("0.1000", format_result(0.1, 4));
        assert_eq!("-3.50", format_result(-3.5, 2));
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!("0.12", format_result(0.125, 2));
        assert_eq!("0.38", format_result(0.375, 2));
        assert_eq!("2.68", format_result(2.675, 2));
        assert_eq!("2", format_result(2.5, 0));
        assert_eq!("4", format_result(3.5, 0));
        assert_eq!("-2", format_result(-2.5, 0));
        assert_eq!("0.333", format_result(1.0 / 3.0, 3));
    }

    #[test]
    fn never_prints_negative_zero() {
        assert_eq!("0.00", format_result(-0.001, 2));
        assert_eq!("0", format_result(-0.0, 0));
    }

    #[test]
    fn large_and_small_values() {
        assert_eq!("1000000000000000000000.0", format_result(1e21, 1));
        assert_eq!("0.00", format_result(1e-9, 2));
        assert_eq!("0.0000000010", format_result(1e-9, 10));
    }

    #[test]
    fn high_precision_keeps_decimal_rounding() {
        assert_eq!("2.675000000000000", format_result(2.675, 15));
        assert_eq!("0.100000000000000", format_result(0.1, 15));
        assert_eq!("12345.678000000000000", format_result(12345.678, 15));
        assert_eq!("-0.000000000000001", format_result(-1e-15, 15));
    }

    #[test]
    fn precision_above_maximum_is_capped() {
        assert_eq!("2.675000000000000", format_result(2.675, 20));
        assert_eq!("0.333333333333333", format_result(1.0 / 3.0, 70000));
        assert_eq!("1.000000000000000", format_result(1.0, u32::MAX));
    }

    #[test]
    fn non_finite_values() {
        assert_eq!("inf", format_result(f64::INFINITY, 2));
        assert_eq!("-inf", format_result(f64::NEG_INFINITY, 2));
        assert_eq!("NaN", format_result(f64::NAN, 2));
    }

    #[test]
    fn formatted_value_parses_back_within_half_unit() {
        let values = [1.0 / 3.0, 2.0_f64.sqrt(), -123.456789, 0.5, 9.995, 1e-4];
        for precision in 0..6 {
            let tolerance = 0.5 * 10f64.powi(-(precision as i32)) + 1e-12;
            for value in values {
                let formatted = format_result(value, precision);
                let parsed: f64 = formatted.parse().unwrap();
                assert!(
                    (parsed - value).abs() <= tolerance,
                    "{} at precision {} gave {}",
                    value,
                    precision,
                    formatted
                );
            }
        }
    }

    #[test]
    fn render_scenarios() {
        let settings = Settings::default();
        assert_eq!("4.00", render("2 + 2", &settings));
        assert_eq!("3.00", render("sqrt 9", &settings));
        assert_eq!("8.00", render("2 ^ 3", &settings));
        assert_eq!("5.00", render("5", &settings));
        assert_eq!("Error: Attempted to divide by zero", render("5 / 0", &settings));
        assert_eq!(
            "Error: Operation '%' not allowed by settings",
            render("7 % 2", &settings)
        );
    }

    #[test]
    fn render_uses_settings_precision() {
        let settings = Settings {
            precision: 4,
            allowed_operations: AllowedOperations::parse_list("/"),
            ..Settings::default()
        };
        assert_eq!("0.6667", render("2 / 3", &settings));
    }

    #[test]
    fn render_with_oversized_precision() {
        let settings = Settings {
            precision: 70000,
            ..Settings::default()
        };
        assert_eq!("0.333333333333333", render("1 / 3", &settings));
    }
}
