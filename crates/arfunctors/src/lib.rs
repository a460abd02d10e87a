//! Arithmetic and relational functors over record types.
//!
//! # Overview
//!
//! A functor is a named accessor computing a number from a record. Functors,
//! literals and registered functions combine with the C family of operators
//! into expressions, in two interchangeable forms:
//!
//! - static nodes ([`Functor`], [`Constant`], [`Unary`], [`Binary`]) whose
//!   type encodes the expression, checked and inlined by the compiler;
//! - dynamic nodes ([`Dynamic`]), type-erased trees assembled at run time,
//!   for instance by the `arfunctors-parser` crate from text.
//!
//! Both evaluate against a shared `&R` and never mutate themselves, so a
//! tree may be evaluated from several threads at once.
//!
//! # Example
//!
//! ```
//! use arfunctors::{functor, Arfunctor, ArfunctorExt, Dynamic, Value};
//!
//! struct Particle { x: f64, y: f64, charge: i32 }
//!
//! let x = functor("x", |p: &Particle| p.x);
//! let y = functor("y", |p: &Particle| p.y);
//! let charge = functor("charge", |p: &Particle| p.charge);
//!
//! let p = Particle { x: 0.5, y: 0.5, charge: -1 };
//!
//! // compile time
//! let inside = (x * x + y * y).le(1.0);
//! assert!(inside.evaluate(&p));
//!
//! // run time
//! let selection = Dynamic::wrap(inside).and(charge.lt(0));
//! assert_eq!(selection.evaluate(&p), Ok(Value::Bool(true)));
//! assert_eq!(selection.to_string(), "x * x + y * y <= 1.0 && charge < 0");
//! ```

pub mod dynamic;
pub mod error;
pub mod literal;
pub mod operators;
pub mod registry;
pub mod static_node;
pub mod value;

pub use dynamic::{Dynamic, IntoDynamic};
pub use error::{EvalError, LexicalError, RegistryError};
pub use literal::{scan_number, FloatType, IntegerType, LiteralTypes};
pub use operators::{BinaryDefinition, BinaryOperator, Operator, OperatorTable, UnaryOperator};
pub use registry::{is_identifier, Entry, Function, IntoFunction, Registry};
pub use static_node::{
    functor, op, Arfunctor, ArfunctorExt, Binary, Combine, Constant, Functor, IntoArfunctor, Prefix,
    StaticNode, Unary,
};
pub use value::{NumericType, Scalar, Value};
