//! Text front end for `arfunctors`.
//!
//! Turns strings such as `hypot(x, y) < 2 && z > 0` into run-time
//! expressions. Identifiers are resolved against a [`Registry`] of functors
//! and functions; literals are typed by their suffix; operators and their
//! precedences come from the [`OperatorTable`] in [`ParserOptions`].
//!
//! The text goes through three stages: the [`Lexer`] produces typed tokens,
//! a shunting-yard pass reorders them into postfix order, and the postfix
//! queue is folded into a [`Dynamic`] tree, checking operand types and
//! function arities on the way.
//!
//! # Example
//!
//! ```
//! use arfunctors::{Registry, Value};
//! use arfunctors_parser::parse;
//!
//! struct Point { x: f64, y: f64, z: f64 }
//!
//! let mut registry = Registry::<Point>::new();
//! registry
//!     .register_functor("x", |p: &Point| p.x)?
//!     .register_functor("y", |p: &Point| p.y)?
//!     .register_functor("z", |p: &Point| p.z)?
//!     .register_function("hypot", |a: f64, b: f64| a.hypot(b))?;
//!
//! let selection = parse(&registry, "hypot(x, y) < 2 && z > 0").unwrap();
//! let p = Point { x: 1.0, y: 1.0, z: 0.5 };
//! assert_eq!(selection.evaluate(&p), Ok(Value::Bool(true)));
//! # Ok::<(), arfunctors::RegistryError>(())
//! ```
//!
//! [`Registry`]: arfunctors::Registry
//! [`OperatorTable`]: arfunctors::OperatorTable
//! [`Dynamic`]: arfunctors::Dynamic

mod builder;
mod error;
mod lexer;
mod options;
mod parser;
mod shunting_yard;
mod token;

pub use error::ParseError;
pub use lexer::Lexer;
pub use options::ParserOptions;
pub use parser::{parse, Parser};
pub use token::{Token, TokenKind};
