use arfunctors::LexicalError;
use thiserror::Error;

/// Errors raised while turning text into an expression. Every variant
/// carries the byte offset in the source text where the problem was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{reason} (at {position})")]
    Lexical { position: usize, reason: LexicalError },

    #[error("Unknown identifier \"{name}\" (at {position})")]
    UnknownIdentifier { name: String, position: usize },

    #[error("\"{name}\" expects {expected} arguments, got {found} (at {position})")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        position: usize,
    },

    #[error("Mismatched parentheses (at {position})")]
    MismatchedParentheses { position: usize },

    #[error("Malformed expression: {reason} (at {position})")]
    MalformedExpression { position: usize, reason: &'static str },

    #[error("Operator \"{symbol}\" does not support operands of type {operands} (at {position})")]
    InvalidOperands {
        symbol: &'static str,
        operands: String,
        position: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> usize {
        match *self {
            ParseError::Lexical { position, .. }
            | ParseError::UnknownIdentifier { position, .. }
            | ParseError::ArityMismatch { position, .. }
            | ParseError::MismatchedParentheses { position }
            | ParseError::MalformedExpression { position, .. }
            | ParseError::InvalidOperands { position, .. } => position,
        }
    }

    pub(crate) fn malformed(position: usize, reason: &'static str) -> Self {
        ParseError::MalformedExpression { position, reason }
    }
}
