//! Run-time expression nodes.
//!
//! [`Dynamic<R>`] erases the shape of an expression behind a boxed node, so
//! trees can be assembled from data (the parser builds them) and stored in
//! collections. Each node owns its operands outright: cloning a tree copies
//! every node, and combining trees never shares or borrows a sub-tree.
//!
//! Every tree knows its [`NumericType`] when it is built, and evaluation
//! always yields a [`Value`] of that type.

use crate::error::EvalError;
use crate::operators::{write_operand, BinaryOperator, UnaryOperator, ATOM_PRECEDENCE};
use crate::registry::Function;
use crate::static_node::{
    op, Arfunctor, ArfunctorExt, BinaryOp, Combine, Prefix, StaticNode, UnaryOp,
};
use crate::value::{NumericType, Scalar, Value};
use std::fmt;
use std::ops;
use std::sync::Arc;

trait Node<R>: Send + Sync {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError>;

    fn output_type(&self) -> NumericType;

    fn precedence(&self) -> u8;

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn clone_node(&self) -> Box<dyn Node<R>>;
}

/// A type-erased expression over records of type `R`.
///
/// ```
/// use arfunctors::{functor, ArfunctorExt, Dynamic, Value};
///
/// struct Point { x: f64, y: f64 }
///
/// let x = functor("x", |p: &Point| p.x);
/// let y = Dynamic::functor("y", |p: &Point| p.y);
/// let inside = (x * x + y.clone() * y).lt(4.0);
///
/// assert_eq!(inside.to_string(), "x * x + y * y < 4.0");
/// assert_eq!(inside.evaluate(&Point { x: 1.0, y: 1.5 }), Ok(Value::Bool(true)));
/// ```
pub struct Dynamic<R> {
    node: Box<dyn Node<R>>,
}

impl<R> Dynamic<R> {
    pub fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        self.node.evaluate(record)
    }

    /// Type of every value [`evaluate`](Self::evaluate) returns.
    ///
    /// A tree built with [`unary`](Self::unary) or [`binary`](Self::binary)
    /// over operand types the operator does not support only carries a
    /// nominal type: evaluating it always fails with
    /// [`EvalError::UnsupportedOperands`].
    pub fn output_type(&self) -> NumericType {
        self.node.output_type()
    }

    /// Binding strength of the outermost operator.
    pub fn precedence(&self) -> u8 {
        self.node.precedence()
    }
}

impl<R: 'static> Dynamic<R> {
    fn new(node: impl Node<R> + 'static) -> Self {
        Dynamic {
            node: Box::new(node),
        }
    }

    /// Promotes a static node or scalar into a run-time node.
    pub fn wrap(node: impl IntoDynamic<R>) -> Self {
        node.into_dynamic()
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Dynamic::new(LiteralNode(value.into()))
    }

    /// An accessor over the record, rendered as `name`.
    pub fn functor<T, F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        T: Scalar,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        Dynamic::new(FunctorNode {
            name: name.into(),
            ty: T::TYPE,
            f: Arc::new(move |record: &R| f(record).into_value()),
        })
    }

    /// Gives a whole tree a name to render as.
    pub fn named(name: impl Into<Arc<str>>, node: Dynamic<R>) -> Self {
        Dynamic::new(NamedNode {
            name: name.into(),
            node,
        })
    }

    /// Applies a prefix operator. An operand type the operator does not
    /// support is reported when evaluating, and the tree's
    /// [`output_type`](Self::output_type) is then the promoted operand type.
    pub fn unary(op: UnaryOperator, operand: impl IntoDynamic<R>) -> Self {
        let operand = operand.into_dynamic();
        let ty = operand.output_type();
        Dynamic::new(UnaryNode {
            op,
            ty: op.result_type(ty).unwrap_or(ty.promoted()),
            operand,
        })
    }

    /// Applies an infix operator. Operand types the operator does not
    /// support are reported when evaluating, and the tree's
    /// [`output_type`](Self::output_type) is then the common operand type.
    pub fn binary(
        op: BinaryOperator,
        left: impl IntoDynamic<R>,
        right: impl IntoDynamic<R>,
    ) -> Self {
        let (left, right) = (left.into_dynamic(), right.into_dynamic());
        let (lt, rt) = (left.output_type(), right.output_type());
        Dynamic::new(BinaryNode {
            op,
            ty: op.result_type(lt, rt).unwrap_or(lt.common(rt)),
            left,
            right,
        })
    }

    /// Calls a function. The argument count is checked on every evaluation.
    pub fn call(name: impl Into<Arc<str>>, function: Function, args: Vec<Dynamic<R>>) -> Self {
        Dynamic::new(CallNode {
            name: name.into(),
            function,
            args,
        })
    }
}

impl<R> Clone for Dynamic<R> {
    fn clone(&self) -> Self {
        Dynamic {
            node: self.node.clone_node(),
        }
    }
}

impl<R> fmt::Display for Dynamic<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.render(f)
    }
}

impl<R> fmt::Debug for Dynamic<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dynamic({}: {})", self, self.output_type())
    }
}

#[derive(Clone)]
struct LiteralNode(Value);

impl<R> Node<R> for LiteralNode {
    fn evaluate(&self, _record: &R) -> Result<Value, EvalError> {
        Ok(self.0)
    }

    fn output_type(&self) -> NumericType {
        self.0.numeric_type()
    }

    fn precedence(&self) -> u8 {
        self.0.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(self.clone())
    }
}

type Accessor<R> = dyn Fn(&R) -> Value + Send + Sync;

struct FunctorNode<R> {
    name: Arc<str>,
    ty: NumericType,
    f: Arc<Accessor<R>>,
}

impl<R: 'static> Node<R> for FunctorNode<R> {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        Ok((self.f)(record))
    }

    fn output_type(&self) -> NumericType {
        self.ty
    }

    fn precedence(&self) -> u8 {
        ATOM_PRECEDENCE
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(FunctorNode {
            name: self.name.clone(),
            ty: self.ty,
            f: self.f.clone(),
        })
    }
}

struct NamedNode<R> {
    name: Arc<str>,
    node: Dynamic<R>,
}

impl<R: 'static> Node<R> for NamedNode<R> {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        self.node.evaluate(record)
    }

    fn output_type(&self) -> NumericType {
        self.node.output_type()
    }

    fn precedence(&self) -> u8 {
        ATOM_PRECEDENCE
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(NamedNode {
            name: self.name.clone(),
            node: self.node.clone(),
        })
    }
}

/// A static node lifted into the run-time world.
#[derive(Clone)]
struct Promoted<N>(N);

impl<R, N> Node<R> for Promoted<N>
where
    N: StaticNode + Arfunctor<R> + Clone + Send + Sync + 'static,
    N::Output: Scalar,
{
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        Ok(self.0.evaluate(record).into_value())
    }

    fn output_type(&self) -> NumericType {
        <N::Output as Scalar>::TYPE
    }

    fn precedence(&self) -> u8 {
        self.0.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f)
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(self.clone())
    }
}

struct UnaryNode<R> {
    op: UnaryOperator,
    ty: NumericType,
    operand: Dynamic<R>,
}

impl<R: 'static> Node<R> for UnaryNode<R> {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        self.op.apply(self.operand.evaluate(record)?)
    }

    fn output_type(&self) -> NumericType {
        self.ty
    }

    fn precedence(&self) -> u8 {
        self.op.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.symbol())?;
        write_operand(f, self.operand.precedence(), self.op.precedence(), false, |f| {
            self.operand.node.render(f)
        })
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(UnaryNode {
            op: self.op,
            ty: self.ty,
            operand: self.operand.clone(),
        })
    }
}

struct BinaryNode<R> {
    op: BinaryOperator,
    ty: NumericType,
    left: Dynamic<R>,
    right: Dynamic<R>,
}

impl<R: 'static> Node<R> for BinaryNode<R> {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        let left = self.left.evaluate(record)?;
        // `&&` and `||` skip the right operand like their C counterparts.
        match self.op {
            BinaryOperator::And if !left.is_truthy() => return Ok(Value::Bool(false)),
            BinaryOperator::Or if left.is_truthy() => return Ok(Value::Bool(true)),
            _ => {}
        }
        self.op.apply(left, self.right.evaluate(record)?)
    }

    fn output_type(&self) -> NumericType {
        self.ty
    }

    fn precedence(&self) -> u8 {
        self.op.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.op.precedence();
        write_operand(f, self.left.precedence(), parent, false, |f| {
            self.left.node.render(f)
        })?;
        write!(f, " {} ", self.op)?;
        write_operand(f, self.right.precedence(), parent, true, |f| {
            self.right.node.render(f)
        })
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(BinaryNode {
            op: self.op,
            ty: self.ty,
            left: self.left.clone(),
            right: self.right.clone(),
        })
    }
}

struct CallNode<R> {
    name: Arc<str>,
    function: Function,
    args: Vec<Dynamic<R>>,
}

impl<R: 'static> Node<R> for CallNode<R> {
    fn evaluate(&self, record: &R) -> Result<Value, EvalError> {
        if self.args.len() != self.function.arity() {
            return Err(EvalError::ArityMismatch {
                name: self.name.to_string(),
                expected: self.function.arity(),
                found: self.args.len(),
            });
        }
        let args = self
            .args
            .iter()
            .map(|arg| arg.evaluate(record))
            .collect::<Result<Vec<_>, _>>()?;
        self.function.invoke(&self.name, &args)
    }

    fn output_type(&self) -> NumericType {
        self.function.result_type()
    }

    fn precedence(&self) -> u8 {
        ATOM_PRECEDENCE
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.node.render(f)?;
        }
        f.write_str(")")
    }

    fn clone_node(&self) -> Box<dyn Node<R>> {
        Box::new(CallNode {
            name: self.name.clone(),
            function: self.function.clone(),
            args: self.args.clone(),
        })
    }
}

/// Anything that can become a [`Dynamic<R>`]: dynamic nodes, static nodes
/// evaluating to a scalar, and scalars.
pub trait IntoDynamic<R> {
    fn into_dynamic(self) -> Dynamic<R>;
}

impl<R> IntoDynamic<R> for Dynamic<R> {
    fn into_dynamic(self) -> Dynamic<R> {
        self
    }
}

impl<R: 'static, N> IntoDynamic<R> for N
where
    N: StaticNode + Arfunctor<R> + Clone + Send + Sync + 'static,
    N::Output: Scalar,
{
    fn into_dynamic(self) -> Dynamic<R> {
        Dynamic::new(Promoted(self))
    }
}

macro_rules! scalar_into_dynamic {
    ($($scalar:ty),*) => {
        $(
            impl<R: 'static> IntoDynamic<R> for $scalar {
                fn into_dynamic(self) -> Dynamic<R> {
                    Dynamic::literal(self)
                }
            }
        )*
    };
}

scalar_into_dynamic!(bool, i32, u32, i64, u64, i128, u128, f32, f64);

// static ⊕ dynamic
impl<Op: BinaryOp, R: 'static, L> Combine<Op, L> for Dynamic<R>
where
    L: StaticNode + IntoDynamic<R>,
{
    type Output = Dynamic<R>;

    fn combine(left: L, right: Dynamic<R>) -> Dynamic<R> {
        Dynamic::binary(Op::OPERATOR, left, right)
    }
}

// dynamic ⊕ anything
impl<Op: BinaryOp, R: 'static, X: IntoDynamic<R>> Combine<Op, Dynamic<R>> for X {
    type Output = Dynamic<R>;

    fn combine(left: Dynamic<R>, right: X) -> Dynamic<R> {
        Dynamic::binary(Op::OPERATOR, left, right)
    }
}

impl<Op: UnaryOp, R: 'static> Prefix<Op> for Dynamic<R> {
    type Output = Dynamic<R>;

    fn prefix(self) -> Dynamic<R> {
        Dynamic::unary(Op::OPERATOR, self)
    }
}

impl<R: 'static> ArfunctorExt for Dynamic<R> {}

macro_rules! dynamic_operators {
    ($($trait:ident::$method:ident => $op:ident),*) => {
        $(
            impl<R: 'static, Rhs: IntoDynamic<R>> ops::$trait<Rhs> for Dynamic<R> {
                type Output = Dynamic<R>;

                fn $method(self, rhs: Rhs) -> Dynamic<R> {
                    Dynamic::binary(BinaryOperator::$op, self, rhs)
                }
            }

            scalar_on_left!($trait::$method => $op; i32, u32, i64, u64, i128, u128, f32, f64);
        )*
    };
}

macro_rules! scalar_on_left {
    ($trait:ident::$method:ident => $op:ident; $($scalar:ty),*) => {
        $(
            impl<R: 'static> ops::$trait<Dynamic<R>> for $scalar {
                type Output = Dynamic<R>;

                fn $method(self, rhs: Dynamic<R>) -> Dynamic<R> {
                    Dynamic::binary(BinaryOperator::$op, self, rhs)
                }
            }
        )*
    };
}

dynamic_operators!(
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Rem,
    BitAnd::bitand => BitAnd,
    BitOr::bitor => BitOr,
    BitXor::bitxor => BitXor,
    Shl::shl => Shl,
    Shr::shr => Shr
);

impl<R: 'static> ops::Neg for Dynamic<R> {
    type Output = Dynamic<R>;

    fn neg(self) -> Dynamic<R> {
        Prefix::<op::Neg>::prefix(self)
    }
}

impl<R: 'static> ops::Not for Dynamic<R> {
    type Output = Dynamic<R>;

    fn not(self) -> Dynamic<R> {
        Prefix::<op::Not>::prefix(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_node::functor;

    #[derive(Clone, Copy)]
    struct Sample {
        a: i32,
        b: f64,
        flag: bool,
    }

    const S: Sample = Sample {
        a: 6,
        b: 0.5,
        flag: true,
    };

    fn a() -> Dynamic<Sample> {
        Dynamic::functor("a", |s: &Sample| s.a)
    }

    fn b() -> Dynamic<Sample> {
        Dynamic::functor("b", |s: &Sample| s.b)
    }

    #[test]
    fn types_follow_the_operators() {
        let sum = a() + b();
        assert_eq!(sum.output_type(), NumericType::F64);
        assert_eq!(sum.evaluate(&S), Ok(Value::F64(6.5)));

        let cmp = a().ge(6u32);
        assert_eq!(cmp.output_type(), NumericType::Bool);
        assert_eq!(cmp.evaluate(&S), Ok(Value::Bool(true)));

        let shifted = Dynamic::functor("flag", |s: &Sample| s.flag) << 3i64;
        assert_eq!(shifted.output_type(), NumericType::I32);
        assert_eq!(shifted.evaluate(&S), Ok(Value::I32(8)));
    }

    #[test]
    fn unsupported_operands_fail_on_every_evaluation() {
        let masked = b() & 1i32;
        assert_eq!(masked.output_type(), NumericType::F64);
        assert_eq!(
            masked.evaluate(&S),
            Err(EvalError::UnsupportedOperands {
                symbol: "&",
                operands: "f64, i32".to_string(),
            })
        );

        let flipped = b().complement();
        assert_eq!(flipped.output_type(), NumericType::F64);
        assert!(matches!(
            flipped.evaluate(&S),
            Err(EvalError::UnsupportedOperands { symbol: "~", .. })
        ));
    }

    #[test]
    fn mixes_with_static_nodes_and_scalars() {
        let b_static = functor("b", |s: &Sample| s.b);
        let left = b_static * a();
        let right = a() - b_static;
        let both = 2.0f64 * left + right;
        assert_eq!(both.to_string(), "2.0 * (b * a) + (a - b)");
        assert_eq!(both.evaluate(&S), Ok(Value::F64(11.5)));
        assert_eq!((-a()).complement().evaluate(&S), Ok(Value::I32(5)));
        assert_eq!((!a()).evaluate(&S), Ok(Value::Bool(false)));
    }

    #[test]
    fn clones_are_independent() {
        let original = a() * 2i32;
        let copy = original.clone();
        drop(original);
        assert_eq!(copy.evaluate(&S), Ok(Value::I32(12)));
        assert_eq!(copy.to_string(), "a * 2");
    }

    #[test]
    fn evaluation_errors_surface() {
        let zero = Dynamic::<Sample>::literal(0);
        assert_eq!(
            (a() / zero.clone()).evaluate(&S),
            Err(EvalError::DivisionByZero)
        );
        assert!(matches!(
            (b() & 1i32).evaluate(&S),
            Err(EvalError::UnsupportedOperands { symbol: "&", .. })
        ));
        // the right operand is never reached
        assert_eq!(
            zero.clone().and(a() / zero).evaluate(&S),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn calls_check_arity_when_evaluated() {
        let max = Function::new(|x: f64, y: f64| x.max(y));
        let good = Dynamic::call("max", max.clone(), vec![a(), b()]);
        assert_eq!(good.evaluate(&S), Ok(Value::F64(6.0)));
        assert_eq!(good.to_string(), "max(a, b)");

        let bad = Dynamic::call("max", max, vec![a()]);
        assert_eq!(
            bad.evaluate(&S),
            Err(EvalError::ArityMismatch {
                name: "max".into(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn trees_are_shared_across_threads() {
        let tree = (a() * 3i32).lt(b() * 100.0);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(tree.evaluate(&S), Ok(Value::Bool(true))));
            }
        });
    }
}
