use arfunctors::{BinaryDefinition, Dynamic, Function, UnaryOperator, Value};
use std::fmt;

/// A token with its payload already resolved: literals are typed, names are
/// looked up in the registry and operators in the operator table.
pub enum TokenKind<R> {
    Number(Value),
    Functor { name: String, node: Dynamic<R> },
    Function { name: String, function: Function },
    Unary(UnaryOperator),
    Binary(BinaryDefinition),
    Comma,
    LeftParen,
    RightParen,
}

impl<R> TokenKind<R> {
    /// Whether the token completes an operand, after which an operator is
    /// expected.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_) | TokenKind::Functor { .. } | TokenKind::RightParen
        )
    }
}

impl<R> fmt::Display for TokenKind<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(value) => write!(f, "{value}"),
            TokenKind::Functor { name, .. } | TokenKind::Function { name, .. } => f.write_str(name),
            TokenKind::Unary(op) => write!(f, "{op}"),
            TokenKind::Binary(def) => write!(f, "{}", def.operator),
            TokenKind::Comma => f.write_str(","),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
        }
    }
}

impl<R> fmt::Debug for TokenKind<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(value) => f.debug_tuple("Number").field(value).finish(),
            TokenKind::Functor { name, .. } => f.debug_tuple("Functor").field(name).finish(),
            TokenKind::Function { name, function } => f
                .debug_struct("Function")
                .field("name", name)
                .field("arity", &function.arity())
                .finish(),
            TokenKind::Unary(op) => f.debug_tuple("Unary").field(op).finish(),
            TokenKind::Binary(def) => f.debug_tuple("Binary").field(def).finish(),
            TokenKind::Comma => f.write_str("Comma"),
            TokenKind::LeftParen => f.write_str("LeftParen"),
            TokenKind::RightParen => f.write_str("RightParen"),
        }
    }
}

/// A token and the byte offset it starts at.
pub struct Token<R> {
    pub kind: TokenKind<R>,
    pub position: usize,
}

impl<R> fmt::Debug for Token<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind, self.position)
    }
}
