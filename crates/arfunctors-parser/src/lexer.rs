//! Tokenizer.
//!
//! The lexer walks the source with a single cursor and produces one token per
//! call. Whether `+`, `-` or a word spelling is read as a prefix or an infix
//! operator depends on position: right after an operand (a literal, a name or
//! a closing parenthesis) an infix operator is expected, anywhere else a
//! prefix one.

use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::token::{Token, TokenKind};
use arfunctors::{scan_number, Entry, LexicalError, Registry, Value};

pub struct Lexer<'a, R> {
    input: &'a str,
    pos: usize,
    registry: &'a Registry<R>,
    options: &'a ParserOptions,
    expect_operand: bool,
    peeked: Option<Token<R>>,
}

impl<'a, R> Lexer<'a, R> {
    pub fn new(input: &'a str, registry: &'a Registry<R>, options: &'a ParserOptions) -> Self {
        Lexer {
            input,
            pos: 0,
            registry,
            options,
            expect_operand: true,
            peeked: None,
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.peeked
            .as_ref()
            .map_or(self.pos, |token| token.position)
    }

    /// Looks at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token<R>>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Consumes the next token; `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token<R>>, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.advance(),
        }
    }

    /// A failed scan exhausts the lexer.
    fn advance(&mut self) -> Result<Option<Token<R>>, ParseError> {
        let token = self.scan();
        if token.is_err() {
            self.pos = self.input.len();
        }
        token
    }

    fn scan(&mut self) -> Result<Option<Token<R>>, ParseError> {
        let rest = self.input[self.pos..].trim_start();
        self.pos = self.input.len() - rest.len();
        let position = self.pos;
        let Some(c) = rest.chars().next() else {
            return Ok(None);
        };

        let (kind, len) = if c.is_ascii_digit() {
            let (value, len) = scan_number(rest, self.options.literals)
                .map_err(|reason| ParseError::Lexical { position, reason })?;
            (TokenKind::Number(value), len)
        } else if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            (self.word(&rest[..len], position)?, len)
        } else {
            match c {
                ',' => (TokenKind::Comma, 1),
                '(' => (TokenKind::LeftParen, 1),
                ')' => (TokenKind::RightParen, 1),
                _ => self.symbol(rest).ok_or(ParseError::Lexical {
                    position,
                    reason: LexicalError::UnexpectedCharacter(c),
                })?,
            }
        };

        self.pos += len;
        self.expect_operand = !kind.ends_operand();
        log::trace!("token {kind:?} at {position}");
        Ok(Some(Token { kind, position }))
    }

    /// Operator words come first, then the boolean keywords, then the registry.
    fn word(&self, word: &str, position: usize) -> Result<TokenKind<R>, ParseError> {
        let operators = &self.options.operators;
        match (self.expect_operand, operators.unary(word), operators.binary(word)) {
            (true, Some(op), _) | (false, Some(op), None) => return Ok(TokenKind::Unary(op)),
            (_, _, Some(def)) => return Ok(TokenKind::Binary(def)),
            _ => {}
        }
        match word {
            "true" => return Ok(TokenKind::Number(Value::Bool(true))),
            "false" => return Ok(TokenKind::Number(Value::Bool(false))),
            _ => {}
        }
        match self.registry.get(word) {
            Some(Entry::Functor(node)) => Ok(TokenKind::Functor {
                name: word.to_string(),
                node: node.clone(),
            }),
            Some(Entry::Function(function)) => Ok(TokenKind::Function {
                name: word.to_string(),
                function: function.clone(),
            }),
            None => Err(ParseError::UnknownIdentifier {
                name: word.to_string(),
                position,
            }),
        }
    }

    /// Longest symbolic operator at the cursor, preferring the kind the
    /// position calls for.
    fn symbol(&self, rest: &str) -> Option<(TokenKind<R>, usize)> {
        let operators = &self.options.operators;
        let unary = || {
            operators
                .match_unary(rest)
                .map(|(op, len)| (TokenKind::Unary(op), len))
        };
        let binary = || {
            operators
                .match_binary(rest)
                .map(|(def, len)| (TokenKind::Binary(def), len))
        };
        if self.expect_operand {
            unary().or_else(binary)
        } else {
            binary().or_else(unary)
        }
    }
}

impl<R> Iterator for Lexer<'_, R> {
    type Item = Result<Token<R>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
