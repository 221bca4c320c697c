//! Single binary-operation calculator.
//!
//! # Responsibility
//! - Split `<number> <operator> <number>` input and evaluate it.
//! - Report domain failures as a `NaN` sentinel plus a readable message.
//!
//! # Invariants
//! - Operators are recognized in the order `**`, `^`, `*`, `/`, `+`, `-`.
//!   The first operator present wins and splits the input at its first
//!   occurrence, so `2**3` is exponentiation and `2+-3` is addition.
//! - Operands are trimmed after the split; inner spaces make them invalid.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `**`
    Power,
    /// `^`, same meaning as `**`
    Caret,
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl Operator {
    /// Recognition priority, longest token first.
    pub const RECOGNITION_ORDER: [Operator; 6] = [
        Operator::Power,
        Operator::Caret,
        Operator::Multiply,
        Operator::Divide,
        Operator::Add,
        Operator::Subtract,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Power => "**",
            Self::Caret => "^",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Add => "+",
            Self::Subtract => "-",
        }
    }

    /// IEEE-754 result of `a <op> b`.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Power | Self::Caret => a.powf(b),
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Add => a + b,
            Self::Subtract => a - b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    DivisionByZero,
    /// No supported operator in the input.
    Unrecognized,
    /// One side of the operator is not a number.
    InvalidOperand(String),
    /// The result overflowed or is undefined.
    NonFinite,
}

impl Display for CalcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Unrecognized => write!(f, "could not recognize the expression"),
            Self::InvalidOperand(value) => write!(f, "not a number: `{value}`"),
            Self::NonFinite => write!(f, "result is out of range"),
        }
    }
}

impl Error for CalcError {}

/// Splits input into `(lhs, operator, rhs)`.
pub fn parse_expression(text: &str) -> Result<(f64, Operator, f64), CalcError> {
    for op in Operator::RECOGNITION_ORDER {
        if let Some((lhs, rhs)) = text.split_once(op.symbol()) {
            return Ok((parse_operand(lhs)?, op, parse_operand(rhs)?));
        }
    }
    Err(CalcError::Unrecognized)
}

/// Evaluates one binary expression.
pub fn evaluate(text: &str) -> Result<f64, CalcError> {
    let (a, op, b) = parse_expression(text)?;
    if op == Operator::Divide && b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }

    let result = op.apply(a, b);
    if !result.is_finite() && a.is_finite() && b.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(result)
}

fn parse_operand(value: &str) -> Result<f64, CalcError> {
    let value = value.trim();
    value
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidOperand(value.to_string()))
}

/// Stateful front end: `NaN` on failure, message kept until the next call.
#[derive(Debug, Default)]
pub struct Calculator {
    last_error: Option<CalcError>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the result, or `NaN` with `error_message()` set.
    pub fn calculate(&mut self, expression: &str) -> f64 {
        match evaluate(expression) {
            Ok(value) => {
                self.last_error = None;
                value
            }
            Err(err) => {
                self.last_error = Some(err);
                f64::NAN
            }
        }
    }

    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, parse_expression, CalcError, Calculator, Operator};

    #[test]
    fn basic_operations() {
        assert_eq!(evaluate("2 + 3").unwrap(), 5.0);
        assert_eq!(evaluate("5 - 2").unwrap(), 3.0);
        assert_eq!(evaluate("4 * 2").unwrap(), 8.0);
        assert_eq!(evaluate("10 / 2").unwrap(), 5.0);
    }

    #[test]
    fn both_exponent_spellings() {
        assert_eq!(evaluate("2 ^ 3").unwrap(), 8.0);
        assert_eq!(evaluate("2 ** 3").unwrap(), 8.0);
    }

    #[test]
    fn double_star_is_recognized_before_single_star() {
        let (_, op, _) = parse_expression("2**3").unwrap();
        assert_eq!(op, Operator::Power);
        let (_, op, _) = parse_expression("2*3").unwrap();
        assert_eq!(op, Operator::Multiply);
    }

    #[test]
    fn addition_is_recognized_before_subtraction() {
        assert_eq!(evaluate("-2 + 3").unwrap(), 1.0);
        assert_eq!(evaluate("2 + -3").unwrap(), -1.0);
    }

    #[test]
    fn spaces_and_fractions() {
        assert_eq!(evaluate(" 2   +   3 ").unwrap(), 5.0);
        assert_eq!(evaluate("2.5 * 2").unwrap(), 5.0);
        assert!((evaluate("10 / 3").unwrap() - 3.333_333_333_333_333_5).abs() < 1e-10);
    }

    #[test]
    fn division_by_zero_sets_sentinel_and_message() {
        let mut calc = Calculator::new();
        let result = calc.calculate("10 / 0");
        assert!(result.is_nan());
        assert_eq!(calc.last_error(), Some(&CalcError::DivisionByZero));
        assert_eq!(calc.error_message().as_deref(), Some("division by zero"));

        assert_eq!(calc.calculate("1 + 1"), 2.0);
        assert!(calc.error_message().is_none());
    }

    #[test]
    fn malformed_input_is_a_domain_error() {
        assert_eq!(evaluate("12"), Err(CalcError::Unrecognized));
        assert_eq!(
            evaluate("a + 1"),
            Err(CalcError::InvalidOperand("a".to_string()))
        );
        assert_eq!(evaluate("1e308 * 10"), Err(CalcError::NonFinite));
    }

    #[test]
    fn spaces_inside_an_operand_are_not_joined() {
        assert_eq!(
            evaluate("1 2 + 3"),
            Err(CalcError::InvalidOperand("1 2".to_string()))
        );
        assert_eq!(
            evaluate("4 * 1 0"),
            Err(CalcError::InvalidOperand("1 0".to_string()))
        );
    }
}
