//! parser.rs
//! Unit expressions (`kg*m/s2`, `mL/mol/K`) and quantity strings (`18.3 kN`, `7,500 g`).
//!
//! Expressions are read left to right with no precedence or grouping: each segment is a simple
//! unit symbol with an optional decimal exponent, and a segment following `/` has its exponent
//! negated.

use super::UnitIndex;
use crate::dimension::SmallFraction;
use crate::error::{QudtError, Result};
use crate::quantity::QuantityValue;
use crate::unit::symbols::to_keyboard_chars;
use crate::unit::{AggregateUnit, Unit};

/// Largest exponent magnitude accepted in an expression. Keeps merged exponents far from `i32`
/// overflow.
const MAX_EXPONENT: f64 = 100.0;

impl UnitIndex {
    pub fn parse_as_aggregate_unit(&self, expression: &str) -> Result<AggregateUnit> {
        let keyboard = to_keyboard_chars(expression);
        if keyboard.trim().is_empty() {
            return Ok(AggregateUnit::empty());
        }

        let mut aggregate = AggregateUnit::empty();
        let mut negative = false;
        let mut start = 0;

        for (i, c) in keyboard.char_indices() {
            if c == '*' || c == '/' {
                let segment = &keyboard[start..i];
                // A leading '/' is a bare reciprocal (`/s`); any other empty segment is an error.
                if !(start == 0 && c == '/' && segment.trim().is_empty()) {
                    aggregate = self.apply_segment(aggregate, segment, negative, expression)?;
                }
                negative = c == '/';
                start = i + 1;
            }
        }
        self.apply_segment(aggregate, &keyboard[start..], negative, expression)
    }

    fn apply_segment(
        &self,
        aggregate: AggregateUnit,
        segment: &str,
        negative: bool,
        expression: &str,
    ) -> Result<AggregateUnit> {
        let segment = segment.trim();
        let (name, exponent) = split_segment(segment);
        if name.is_empty() {
            return Err(QudtError::MalformedSegment {
                segment: segment.to_string(),
                expression: expression.to_string(),
            });
        }

        let mut exp = if exponent.is_empty() {
            SmallFraction::ONE
        } else {
            let malformed = || QudtError::MalformedExponent {
                exponent: exponent.to_string(),
                expression: expression.to_string(),
            };
            let value: f64 = exponent.parse().map_err(|_| malformed())?;
            if !value.is_finite() || value.abs() > MAX_EXPONENT {
                return Err(malformed());
            }
            SmallFraction::approximate(value)
        };
        if negative {
            exp = exp * -1;
        }

        let unit = self.simple_symbol_map().get(name).ok_or_else(|| QudtError::UnknownSymbol {
            name: name.to_string(),
            expression: expression.to_string(),
        })?;
        Ok(aggregate.times(&Unit::Literal(unit.clone()), exp))
    }

    /// Parses `<number><optional space><unit expression>`. The number may carry a sign, a
    /// fraction, an exponent and comma thousands separators. An empty unit is the plain number
    /// unit; anything else is resolved through [`exact_match_symbol`](Self::exact_match_symbol).
    pub fn parse_quantity(&self, text: &str) -> Result<QuantityValue> {
        let text = text.trim();
        let split = leading_number_len(text);
        if split == 0 {
            return Err(QudtError::MalformedQuantity(text.to_string()));
        }

        let number = text[..split].replace(',', "");
        let value: f64 = number
            .parse()
            .map_err(|_| QudtError::MalformedQuantity(text.to_string()))?;

        let unit_text = text[split..].trim();
        let unit = if unit_text.is_empty() {
            self.unitless()
        } else {
            self.exact_match_symbol(unit_text)?
        };
        Ok(QuantityValue::of_scaled(value, unit))
    }
}

/// Splits at the first character that can start an exponent (`-`, `+`, `.` or a digit).
fn split_segment(segment: &str) -> (&str, &str) {
    let end = segment
        .find(|c: char| c == '-' || c == '+' || c == '.' || c.is_ascii_digit())
        .unwrap_or(segment.len());
    (segment[..end].trim(), segment[end..].trim())
}

/// Byte length of the numeric prefix, or zero when the text does not start with a number.
fn leading_number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let mut digits = 0;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b',') {
        digits += bytes[i].is_ascii_digit() as usize;
        i += 1;
    }
    if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            digits += 1;
            i += 1;
        }
    }
    if digits == 0 {
        return 0;
    }

    // Only consume an exponent marker that is actually followed by exponent digits, so `10 eV`
    // and `10eV` keep their unit.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}
