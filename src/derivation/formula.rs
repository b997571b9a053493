//! Flat formula evaluation
//!
//! A formula is not an expression language. After placeholder substitution
//! the text is split on a single operator and the parts are folded left to
//! right. Operators are checked in the order `+`, `-`, `*`, `/` and the first
//! one present wins, so `2+3*4` is a sum of `2` and `3*4` (read as `3`).
//! A leading minus on an operand is read as a subtraction operator.

use std::fmt;

use crate::schema::format_number;

/// The operator a formula is reduced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Detection order. Earlier operators shadow later ones.
    pub const DETECTION_ORDER: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// First operator, in detection order, that occurs anywhere in `text`.
    pub fn detect(text: &str) -> Option<Operator> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|op| text.contains(op.symbol()))
    }

    /// Folds operands left to right.
    ///
    /// Sums start from 0 and products from 1. Subtraction and division start
    /// from the first operand; division skips any divisor equal to zero.
    /// Returns `None` when there is no operand to start from.
    pub fn reduce<I>(&self, operands: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut operands = operands.into_iter();
        match self {
            Operator::Add => Some(operands.fold(0.0, |acc, n| acc + n)),
            Operator::Multiply => Some(operands.fold(1.0, |acc, n| acc * n)),
            Operator::Subtract => {
                let first = operands.next()?;
                Some(operands.fold(first, |acc, n| acc - n))
            }
            Operator::Divide => {
                let first = operands.next()?;
                Some(operands.fold(first, |acc, n| if n != 0.0 { acc / n } else { acc }))
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Why a formula could not produce a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Splitting left nothing to fold
    NoOperands,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NoOperands => write!(f, "no operands"),
        }
    }
}

/// Evaluates already-substituted formula text.
///
/// Text without an operator is returned verbatim. Overflow is not an
/// anomaly: it renders as `Infinity`, `-Infinity` or `NaN`.
pub fn evaluate(text: &str) -> Result<String, Anomaly> {
    let op = match Operator::detect(text) {
        Some(op) => op,
        None => return Ok(text.to_string()),
    };

    let operands = text.split(op.symbol()).map(operand_value);
    let result = op.reduce(operands).ok_or(Anomaly::NoOperands)?;

    Ok(format_number(result))
}

/// Numeric value of one operand; anything unparseable counts as zero.
pub fn operand_value(part: &str) -> f64 {
    parse_leading_number(part.trim()).unwrap_or(0.0)
}

/// Parses the longest numeric prefix of `s`.
///
/// `"3px"` reads as 3, `".5"` as 0.5, `"1e3x"` as 1000 and `"abc"` as nothing.
/// An optional sign and `Infinity` are recognised.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        let infinity = if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(infinity);
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
