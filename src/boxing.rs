//! Conversions between raw XML text and scalar values
//!
//! Boxing never fails: text that does not look like a number, boolean or null
//! stays a string. The conversion is lossy for numeric text that has more than
//! one spelling, e.g. `"007"` boxes to `7` and unboxes to `"7"`.

use crate::value::Scalar;

/// Type cast raw text into a scalar
pub fn box_value(raw: &str) -> Scalar {
    match NumericShape::of(raw) {
        Some(NumericShape::Decimal) => raw
            .parse::<f64>()
            .map_or_else(|_| Scalar::String(raw.to_string()), Scalar::Float),
        Some(NumericShape::Integer) => box_integer(raw),
        None => match raw {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            "null" => Scalar::Null,
            _ => Scalar::String(raw.to_string()),
        },
    }
}

/// Render a scalar as the text stored in XML
pub fn unbox(value: &Scalar) -> String {
    match value {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(true) => "true".to_string(),
        Scalar::Bool(false) => "false".to_string(),
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::String(s) => s.clone(),
    }
}

fn box_integer(raw: &str) -> Scalar {
    if let Ok(i) = raw.parse::<i64>() {
        return Scalar::Integer(i);
    }

    // Exponent form or out of i64 range: truncate and saturate
    raw.parse::<f64>().map_or_else(
        |_| Scalar::String(raw.to_string()),
        |f| {
            #[allow(clippy::as_conversions)]
            let i = f as i64;
            Scalar::Integer(i)
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericShape {
    Integer,
    Decimal,
}

impl NumericShape {
    /// Matches `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least
    /// one mantissa digit
    fn of(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        let mut pos = 0;

        if matches!(bytes.first(), Some(b'+' | b'-')) {
            pos += 1;
        }

        let int_digits = count_digits(bytes, pos);
        pos += int_digits;

        let mut is_decimal = false;
        let mut frac_digits = 0;
        if bytes.get(pos) == Some(&b'.') {
            is_decimal = true;
            pos += 1;
            frac_digits = count_digits(bytes, pos);
            pos += frac_digits;
        }

        if int_digits + frac_digits == 0 {
            return None;
        }

        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            pos += 1;
            if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            let exp_digits = count_digits(bytes, pos);
            if exp_digits == 0 {
                return None;
            }
            pos += exp_digits;
        }

        if pos != bytes.len() {
            return None;
        }

        Some(if is_decimal {
            Self::Decimal
        } else {
            Self::Integer
        })
    }
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .iter()
        .skip(start)
        .take_while(|b| b.is_ascii_digit())
        .count()
}
