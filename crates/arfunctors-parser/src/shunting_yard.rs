//! Infix to postfix reordering.
//!
//! Tokens are fed one at a time. Operands go straight to the output queue,
//! operators wait on a stack until an operator binding less tightly, a
//! closing parenthesis or the end of input releases them. The yard also
//! checks that operands and operators alternate, so the tree builder only
//! has arity left to verify.

use crate::error::ParseError;
use crate::token::{Token, TokenKind};
use arfunctors::{BinaryDefinition, BinaryOperator, Dynamic, Function, UnaryOperator};

/// An entry of the output queue.
pub(crate) enum Postfix<R> {
    Operand(Dynamic<R>),
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Call {
        name: String,
        function: Function,
        args: usize,
    },
}

impl<R> Postfix<R> {
    pub fn describe(&self) -> String {
        match self {
            Postfix::Operand(node) => node.to_string(),
            Postfix::Unary(op) => format!("prefix {op}"),
            Postfix::Binary(op) => op.to_string(),
            Postfix::Call { name, args, .. } => format!("{name}/{args}"),
        }
    }
}

pub(crate) struct Item<R> {
    pub postfix: Postfix<R>,
    pub position: usize,
}

enum Pending {
    Unary(UnaryOperator),
    Binary(BinaryDefinition),
    Function { name: String, function: Function },
    /// An open parenthesis and the number of commas seen inside it.
    Paren { args: usize },
}

struct Entry {
    pending: Pending,
    position: usize,
}

/// What the previous token was, as far as empty groups and arguments care.
#[derive(Clone, Copy, PartialEq, Eq)]
enum After {
    Paren,
    Comma,
    Other,
}

pub(crate) struct ShuntingYard<R> {
    output: Vec<Item<R>>,
    stack: Vec<Entry>,
    unary_precedence: u8,
    expect_operand: bool,
    after: After,
}

impl<R: 'static> ShuntingYard<R> {
    pub fn new(unary_precedence: u8) -> Self {
        ShuntingYard {
            output: Vec::new(),
            stack: Vec::new(),
            unary_precedence,
            expect_operand: true,
            after: After::Other,
        }
    }

    pub fn push(&mut self, token: Token<R>) -> Result<(), ParseError> {
        let Token { kind, position } = token;
        if self.top_is_function() && !matches!(kind, TokenKind::LeftParen) {
            return Err(ParseError::malformed(
                position,
                "expected '(' after function name",
            ));
        }
        let after = std::mem::replace(&mut self.after, After::Other);
        if self.expect_operand {
            self.operand(kind, position, after)
        } else {
            self.operator(kind, position)
        }
    }

    /// Drains the stack and returns the queue in postfix order.
    pub fn finish(mut self, end: usize) -> Result<Vec<Item<R>>, ParseError> {
        if self.top_is_function() {
            return Err(ParseError::malformed(
                end,
                "expected '(' after function name",
            ));
        }
        if let Some(open) = self
            .stack
            .iter()
            .rev()
            .find(|e| matches!(e.pending, Pending::Paren { .. }))
        {
            return Err(ParseError::MismatchedParentheses {
                position: open.position,
            });
        }
        if self.expect_operand {
            let reason = if self.output.is_empty() && self.stack.is_empty() {
                "empty expression"
            } else {
                "expected an operand"
            };
            return Err(ParseError::malformed(end, reason));
        }
        while !self.stack.is_empty() {
            self.pop_operator();
        }
        Ok(self.output)
    }

    fn operand(
        &mut self,
        kind: TokenKind<R>,
        position: usize,
        after: After,
    ) -> Result<(), ParseError> {
        match kind {
            TokenKind::Number(value) => {
                self.emit(Postfix::Operand(Dynamic::literal(value)), position);
                self.expect_operand = false;
            }
            TokenKind::Functor { node, .. } => {
                self.emit(Postfix::Operand(node), position);
                self.expect_operand = false;
            }
            TokenKind::Function { name, function } => self.stack.push(Entry {
                pending: Pending::Function { name, function },
                position,
            }),
            TokenKind::Unary(op) => self.stack.push(Entry {
                pending: Pending::Unary(op),
                position,
            }),
            TokenKind::LeftParen => {
                self.stack.push(Entry {
                    pending: Pending::Paren { args: 0 },
                    position,
                });
                self.after = After::Paren;
            }
            TokenKind::RightParen => match after {
                After::Paren if self.below_top_is_function() => self.close(0),
                _ if !self.stack.iter().any(|e| matches!(e.pending, Pending::Paren { .. })) => {
                    return Err(ParseError::MismatchedParentheses { position })
                }
                After::Paren => return Err(ParseError::malformed(position, "empty parentheses")),
                After::Comma => return Err(ParseError::malformed(position, "empty argument")),
                After::Other => return Err(ParseError::malformed(position, "expected an operand")),
            },
            TokenKind::Comma if after != After::Other && self.below_top_is_function() => {
                return Err(ParseError::malformed(position, "empty argument"))
            }
            TokenKind::Comma | TokenKind::Binary(_) => {
                return Err(ParseError::malformed(position, "expected an operand"))
            }
        }
        Ok(())
    }

    fn operator(&mut self, kind: TokenKind<R>, position: usize) -> Result<(), ParseError> {
        match kind {
            TokenKind::Binary(def) => {
                while self
                    .stack
                    .last()
                    .is_some_and(|top| self.binds_tighter(top, def.precedence))
                {
                    self.pop_operator();
                }
                self.stack.push(Entry {
                    pending: Pending::Binary(def),
                    position,
                });
                self.expect_operand = true;
            }
            TokenKind::Comma => {
                let outside = || ParseError::malformed(position, "',' outside of a function call");
                self.pop_to_paren().ok_or_else(outside)?;
                if !self.below_top_is_function() {
                    return Err(outside());
                }
                if let Some(Entry {
                    pending: Pending::Paren { args },
                    ..
                }) = self.stack.last_mut()
                {
                    *args += 1;
                }
                self.expect_operand = true;
                self.after = After::Comma;
            }
            TokenKind::RightParen => {
                let commas = self
                    .pop_to_paren()
                    .ok_or(ParseError::MismatchedParentheses { position })?;
                self.close(commas + 1);
            }
            TokenKind::Unary(_) => {
                return Err(ParseError::malformed(
                    position,
                    "expected a binary operator",
                ))
            }
            _ => return Err(ParseError::malformed(position, "expected an operator")),
        }
        Ok(())
    }

    fn emit(&mut self, postfix: Postfix<R>, position: usize) {
        log::trace!("postfix {} at {position}", postfix.describe());
        self.output.push(Item { postfix, position });
    }

    /// Whether a pending operator must be applied before an incoming binary
    /// operator of precedence `incoming`. Equal precedence groups left.
    fn binds_tighter(&self, top: &Entry, incoming: u8) -> bool {
        match top.pending {
            Pending::Unary(_) => self.unary_precedence >= incoming,
            Pending::Binary(def) => def.precedence >= incoming,
            Pending::Function { .. } | Pending::Paren { .. } => false,
        }
    }

    fn top_is_function(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Entry {
                pending: Pending::Function { .. },
                ..
            })
        )
    }

    /// Whether the open parenthesis on top holds a call's arguments.
    fn below_top_is_function(&self) -> bool {
        let n = self.stack.len();
        n >= 2 && matches!(self.stack[n - 2].pending, Pending::Function { .. })
    }

    /// Moves operators to the output until an open parenthesis is on top and
    /// returns its comma count.
    fn pop_to_paren(&mut self) -> Option<usize> {
        while let Some(top) = self.stack.last() {
            match top.pending {
                Pending::Paren { args } => return Some(args),
                Pending::Function { .. } => return None,
                Pending::Unary(_) | Pending::Binary(_) => self.pop_operator(),
            }
        }
        None
    }

    fn pop_operator(&mut self) {
        if let Some(Entry { pending, position }) = self.stack.pop() {
            match pending {
                Pending::Unary(op) => self.emit(Postfix::Unary(op), position),
                Pending::Binary(def) => self.emit(Postfix::Binary(def.operator), position),
                Pending::Function { .. } | Pending::Paren { .. } => {}
            }
        }
    }

    /// Discards the open parenthesis on top. When it held a function's
    /// arguments, the call goes to the output.
    fn close(&mut self, args: usize) {
        self.stack.pop();
        match self.stack.pop() {
            Some(Entry {
                pending: Pending::Function { name, function },
                position,
            }) => self.emit(Postfix::Call { name, function, args }, position),
            Some(entry) => self.stack.push(entry),
            None => {}
        }
        self.expect_operand = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::options::ParserOptions;
    use arfunctors::Registry;

    fn registry() -> Registry<()> {
        let mut registry = Registry::new();
        registry
            .register_functor("x", |_: &()| 1)
            .unwrap()
            .register_function("f", |a: i32, b: i32| a + b)
            .unwrap()
            .register_function("g", || 0)
            .unwrap();
        registry
    }

    fn postfix(input: &str) -> Result<String, ParseError> {
        let registry = registry();
        let options = ParserOptions::default();
        let mut yard = ShuntingYard::new(options.operators.unary_precedence());
        for token in Lexer::new(input, &registry, &options) {
            yard.push(token?)?;
        }
        let items = yard.finish(input.len())?;
        Ok(items
            .iter()
            .map(|item| item.postfix.describe())
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn malformed(input: &str) -> &'static str {
        match postfix(input) {
            Err(ParseError::MalformedExpression { reason, .. }) => reason,
            other => panic!("{input}: expected a malformed expression, got {other:?}"),
        }
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(postfix("2 + 3 * 4").unwrap(), "2 3 4 * +");
        assert_eq!(postfix("(2 + 3) * 4").unwrap(), "2 3 + 4 *");
        assert_eq!(postfix("x - x - x").unwrap(), "x x - x -");
        assert_eq!(
            postfix("x < 1 || x > 2 && x").unwrap(),
            "x 1 < x 2 > x && ||"
        );
    }

    #[test]
    fn prefix_operators() {
        assert_eq!(postfix("-x * 2").unwrap(), "x prefix - 2 *");
        assert_eq!(postfix("2 * -x").unwrap(), "2 x prefix - *");
        assert_eq!(postfix("!-x").unwrap(), "x prefix - prefix !");
    }

    #[test]
    fn calls() {
        assert_eq!(postfix("f(1, x + 2)").unwrap(), "1 x 2 + f/2");
        assert_eq!(postfix("f(f(1, 2), 3) * 2").unwrap(), "1 2 f/2 3 f/2 2 *");
        assert_eq!(postfix("g() + 1").unwrap(), "g/0 1 +");
        assert_eq!(postfix("f(1)").unwrap(), "1 f/1");
    }

    #[test]
    fn parentheses_must_match() {
        assert_eq!(
            postfix("(2 + 3"),
            Err(ParseError::MismatchedParentheses { position: 0 })
        );
        assert_eq!(
            postfix("2 + 3)"),
            Err(ParseError::MismatchedParentheses { position: 5 })
        );
        assert_eq!(
            postfix(")"),
            Err(ParseError::MismatchedParentheses { position: 0 })
        );
        assert_eq!(
            postfix("f(1, 2"),
            Err(ParseError::MismatchedParentheses { position: 1 })
        );
    }

    #[test]
    fn malformed_sequences() {
        assert_eq!(malformed(""), "empty expression");
        assert_eq!(malformed("2 +"), "expected an operand");
        assert_eq!(malformed("2 3"), "expected an operator");
        assert_eq!(malformed("* 2"), "expected an operand");
        assert_eq!(malformed("()"), "empty parentheses");
        assert_eq!(malformed("f(1,)"), "empty argument");
        assert_eq!(malformed("f(,1)"), "empty argument");
        assert_eq!(malformed("f(1,,2)"), "empty argument");
        assert_eq!(malformed("1, 2"), "',' outside of a function call");
        assert_eq!(malformed("(1, 2)"), "',' outside of a function call");
        assert_eq!(malformed("f + 1"), "expected '(' after function name");
        assert_eq!(malformed("f"), "expected '(' after function name");
        assert_eq!(malformed("x (1)"), "expected an operator");
    }
}
