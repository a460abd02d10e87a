use crate::value::NumericType;
use thiserror::Error;

/// Errors raised while evaluating a run-time expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("DIVISION_BY_ZERO")]
    DivisionByZero,

    #[error("\"{name}\" expects {expected} arguments, got {found}.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Operator \"{symbol}\" does not support operands of type {operands}.")]
    UnsupportedOperands {
        symbol: &'static str,
        operands: String,
    },
}

impl EvalError {
    pub(crate) fn unsupported(symbol: &'static str, types: &[NumericType]) -> Self {
        EvalError::UnsupportedOperands {
            symbol,
            operands: NumericType::join(types),
        }
    }
}

/// Errors raised while populating or querying a [`Registry`](crate::Registry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    #[error("\"{0}\" is already registered.")]
    Duplicate(String),

    #[error("\"{0}\" is not a valid identifier.")]
    InvalidName(String),
}

/// Reasons a numeric literal is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),

    #[error("Missing number.")]
    MissingNumber,

    #[error("Repeated decimal point in floating-point literal.")]
    RepeatedDecimalPoint,

    #[error("Decimal point has no digits after it.")]
    MissingFractionDigits,

    #[error("Exponent has no digits.")]
    MissingExponentDigits,

    #[error("Repeated exponent in floating-point literal.")]
    RepeatedExponent,

    #[error("Invalid suffix \"{0}\".")]
    InvalidSuffix(String),

    #[error("Integer literal does not fit in any {0} type.")]
    IntegerOutOfRange(&'static str),

    #[error("Exponent is out of range for {0}.")]
    ExponentOutOfRange(NumericType),
}
