//! Operator catalogue.
//!
//! Every operator carries its symbol, its evaluation rule over [`Value`]s, the
//! type rule used for parse-time checking and its default precedence. The
//! parser does not read these defaults directly: it consults an
//! [`OperatorTable`], which starts from them and can be reshaped per parser.

use crate::error::EvalError;
use crate::value::{NumericType, Value};
use indexmap::IndexMap;
use std::fmt;

/// Runs `$func::<T>($args)` with `T` the primitive behind a numeric type.
macro_rules! dispatch_numeric {
    ($ty:expr, $func:ident($($arg:expr),*)) => {
        match $ty {
            NumericType::Bool | NumericType::I32 => $func::<i32>($($arg),*),
            NumericType::U32 => $func::<u32>($($arg),*),
            NumericType::I64 => $func::<i64>($($arg),*),
            NumericType::U64 => $func::<u64>($($arg),*),
            NumericType::I128 => $func::<i128>($($arg),*),
            NumericType::U128 => $func::<u128>($($arg),*),
            NumericType::F32 => $func::<f32>($($arg),*),
            NumericType::F64 => $func::<f64>($($arg),*),
        }
    };
}

/// Like `dispatch_numeric!`, floats yield `$otherwise`.
macro_rules! dispatch_integer {
    ($ty:expr, $func:ident($($arg:expr),*), $otherwise:expr) => {
        match $ty {
            NumericType::Bool | NumericType::I32 => $func::<i32>($($arg),*),
            NumericType::U32 => $func::<u32>($($arg),*),
            NumericType::I64 => $func::<i64>($($arg),*),
            NumericType::U64 => $func::<u64>($($arg),*),
            NumericType::I128 => $func::<i128>($($arg),*),
            NumericType::U128 => $func::<u128>($($arg),*),
            NumericType::F32 | NumericType::F64 => $otherwise,
        }
    };
}

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod logical;

/// Precedence of prefix operators.
pub const UNARY_PRECEDENCE: u8 = 13;
/// Precedence of leaves: never parenthesised.
pub const ATOM_PRECEDENCE: u8 = u8::MAX;

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    Complement,
}

impl UnaryOperator {
    pub const ALL: [UnaryOperator; 4] = [
        UnaryOperator::Plus,
        UnaryOperator::Minus,
        UnaryOperator::Not,
        UnaryOperator::Complement,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
            UnaryOperator::Complement => "~",
        }
    }

    pub fn precedence(self) -> u8 {
        UNARY_PRECEDENCE
    }

    /// Type of the result, `None` when the operand type is not supported.
    pub fn result_type(self, operand: NumericType) -> Option<NumericType> {
        match self {
            UnaryOperator::Plus | UnaryOperator::Minus => Some(operand.promoted()),
            UnaryOperator::Not => Some(NumericType::Bool),
            UnaryOperator::Complement => operand.is_integer().then(|| operand.promoted()),
        }
    }

    pub fn apply(self, operand: Value) -> Result<Value, EvalError> {
        match self {
            UnaryOperator::Plus => Ok(arithmetic::plus(operand)),
            UnaryOperator::Minus => Ok(arithmetic::negate(operand)),
            UnaryOperator::Not => Ok(logical::not(operand)),
            UnaryOperator::Complement => bitwise::complement(operand),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Infix operators. All of them associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 18] = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Rem,
        BinaryOperator::Lt,
        BinaryOperator::Le,
        BinaryOperator::Gt,
        BinaryOperator::Ge,
        BinaryOperator::Eq,
        BinaryOperator::Ne,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::Shl,
        BinaryOperator::Shr,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
        }
    }

    /// Default precedence; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 12,
            BinaryOperator::Add | BinaryOperator::Sub => 11,
            BinaryOperator::Shl | BinaryOperator::Shr => 10,
            BinaryOperator::Lt | BinaryOperator::Le | BinaryOperator::Gt | BinaryOperator::Ge => 9,
            BinaryOperator::Eq | BinaryOperator::Ne => 8,
            BinaryOperator::BitAnd => 7,
            BinaryOperator::BitXor => 6,
            BinaryOperator::BitOr => 5,
            BinaryOperator::And => 4,
            BinaryOperator::Or => 3,
        }
    }

    /// Type of the result, `None` when the operand types are not supported.
    pub fn result_type(self, left: NumericType, right: NumericType) -> Option<NumericType> {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Rem => Some(left.common(right)),
            BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::And
            | BinaryOperator::Or => Some(NumericType::Bool),
            BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor => {
                let integral = left.is_integer() && right.is_integer();
                integral.then(|| left.common(right))
            }
            BinaryOperator::Shl | BinaryOperator::Shr => {
                let integral = left.is_integer() && right.is_integer();
                integral.then(|| left.promoted())
            }
        }
    }

    pub fn apply(self, left: Value, right: Value) -> Result<Value, EvalError> {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Rem => arithmetic::apply(self, left, right),
            BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge
            | BinaryOperator::Eq
            | BinaryOperator::Ne => Ok(comparison::apply(self, left, right)),
            BinaryOperator::And | BinaryOperator::Or => Ok(logical::apply(self, left, right)),
            BinaryOperator::BitAnd
            | BinaryOperator::BitOr
            | BinaryOperator::BitXor
            | BinaryOperator::Shl
            | BinaryOperator::Shr => bitwise::apply(self, left, right),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Either kind of operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Unary(op) => op.symbol(),
            Operator::Binary(op) => op.symbol(),
        }
    }
}

/// A binary operator as the parser sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryDefinition {
    pub operator: BinaryOperator,
    pub precedence: u8,
}

/// Symbols, word aliases and precedences the tokenizer and parser work with.
///
/// The same spelling may name a unary and a binary operator (`-`); which one
/// applies depends on where the token appears.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTable {
    unary: IndexMap<String, UnaryOperator>,
    binary: IndexMap<String, BinaryDefinition>,
    unary_precedence: u8,
}

impl Default for OperatorTable {
    /// The full C-like catalogue.
    fn default() -> Self {
        let mut table = OperatorTable::empty();
        for op in UnaryOperator::ALL {
            table = table.with_unary(op.symbol(), op);
        }
        for op in BinaryOperator::ALL {
            table = table.with_binary(op.symbol(), op, op.precedence());
        }
        table
    }
}

impl OperatorTable {
    pub fn empty() -> Self {
        OperatorTable {
            unary: IndexMap::new(),
            binary: IndexMap::new(),
            unary_precedence: UNARY_PRECEDENCE,
        }
    }

    /// Adds a prefix spelling, either symbolic (`-`) or a word (`not`).
    pub fn with_unary(mut self, spelling: impl Into<String>, op: UnaryOperator) -> Self {
        self.unary.insert(spelling.into(), op);
        self
    }

    /// Adds an infix spelling with its precedence.
    pub fn with_binary(
        mut self,
        spelling: impl Into<String>,
        op: BinaryOperator,
        precedence: u8,
    ) -> Self {
        self.binary.insert(
            spelling.into(),
            BinaryDefinition {
                operator: op,
                precedence,
            },
        );
        self
    }

    /// Adds a word alias sharing the precedence of an existing spelling.
    pub fn with_alias(mut self, alias: impl Into<String>, op: BinaryOperator) -> Self {
        let precedence = self.precedence_of(op).unwrap_or_else(|| op.precedence());
        self.binary.insert(
            alias.into(),
            BinaryDefinition {
                operator: op,
                precedence,
            },
        );
        self
    }

    /// Changes the precedence of every spelling of `op`.
    pub fn with_precedence(mut self, op: BinaryOperator, precedence: u8) -> Self {
        for def in self.binary.values_mut().filter(|def| def.operator == op) {
            def.precedence = precedence;
        }
        self
    }

    pub fn with_unary_precedence(mut self, precedence: u8) -> Self {
        self.unary_precedence = precedence;
        self
    }

    /// Removes every spelling, unary or binary, equal to `spelling`.
    pub fn without(mut self, spelling: &str) -> Self {
        self.unary.shift_remove(spelling);
        self.binary.shift_remove(spelling);
        self
    }

    pub fn unary(&self, spelling: &str) -> Option<UnaryOperator> {
        self.unary.get(spelling).copied()
    }

    pub fn binary(&self, spelling: &str) -> Option<BinaryDefinition> {
        self.binary.get(spelling).copied()
    }

    pub fn unary_precedence(&self) -> u8 {
        self.unary_precedence
    }

    pub fn precedence_of(&self, op: BinaryOperator) -> Option<u8> {
        self.binary
            .values()
            .find(|def| def.operator == op)
            .map(|def| def.precedence)
    }

    /// Longest symbolic prefix of `input` naming a unary operator.
    pub fn match_unary(&self, input: &str) -> Option<(UnaryOperator, usize)> {
        longest_symbol(self.unary.iter().map(|(s, op)| (s.as_str(), *op)), input)
    }

    /// Longest symbolic prefix of `input` naming a binary operator.
    pub fn match_binary(&self, input: &str) -> Option<(BinaryDefinition, usize)> {
        longest_symbol(self.binary.iter().map(|(s, def)| (s.as_str(), *def)), input)
    }
}

/// Word spellings are excluded: they are matched as whole identifiers.
fn longest_symbol<'a, T>(
    entries: impl Iterator<Item = (&'a str, T)>,
    input: &str,
) -> Option<(T, usize)> {
    entries
        .filter(|(spelling, _)| {
            !is_word(spelling) && input.starts_with(spelling)
        })
        .max_by_key(|(spelling, _)| spelling.len())
        .map(|(spelling, op)| (op, spelling.len()))
}

pub(crate) fn is_word(spelling: &str) -> bool {
    spelling
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Writes an operand of an operator of precedence `parent`, adding
/// parentheses when leaving them out would regroup the expression.
pub(crate) fn write_operand(
    f: &mut fmt::Formatter<'_>,
    child: u8,
    parent: u8,
    right_side: bool,
    write: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    let parenthesize = if right_side {
        child <= parent
    } else {
        child < parent
    };
    if parenthesize {
        f.write_str("(")?;
        write(f)?;
        f.write_str(")")
    } else {
        write(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_longest_match() {
        let table = OperatorTable::default();
        let binary = |input: &str| table.match_binary(input).map(|(d, n)| (d.operator, n));
        assert_eq!(binary("<<= 3"), Some((BinaryOperator::Shl, 2)));
        assert_eq!(binary("<= 3"), Some((BinaryOperator::Le, 2)));
        assert_eq!(binary("< 3"), Some((BinaryOperator::Lt, 1)));
        assert_eq!(binary("&&x"), Some((BinaryOperator::And, 2)));
        assert_eq!(table.match_unary("!="), Some((UnaryOperator::Not, 1)));
        assert_eq!(table.match_binary("@"), None);
    }

    #[test]
    fn aliases_share_precedence() {
        let table = OperatorTable::default()
            .with_alias("and", BinaryOperator::And)
            .with_unary("not", UnaryOperator::Not)
            .with_precedence(BinaryOperator::And, 2);
        assert_eq!(table.binary("and").map(|d| d.precedence), Some(2));
        assert_eq!(table.binary("&&").map(|d| d.precedence), Some(2));
        assert_eq!(table.unary("not"), Some(UnaryOperator::Not));
        // words are never matched as symbols
        assert_eq!(table.match_binary("and x"), None);
    }

    #[test]
    fn removal() {
        let table = OperatorTable::default().without("-");
        assert_eq!(table.unary("-"), None);
        assert_eq!(table.binary("-"), None);
        assert!(table.binary("+").is_some());
    }

    #[test]
    fn type_rules() {
        use NumericType::*;
        assert_eq!(BinaryOperator::Add.result_type(F32, I32), Some(F32));
        assert_eq!(BinaryOperator::Lt.result_type(F32, I32), Some(Bool));
        assert_eq!(BinaryOperator::BitAnd.result_type(F32, I32), None);
        assert_eq!(BinaryOperator::Shl.result_type(U32, I64), Some(U32));
        assert_eq!(UnaryOperator::Complement.result_type(Bool), Some(I32));
        assert_eq!(UnaryOperator::Complement.result_type(F64), None);
    }
}
