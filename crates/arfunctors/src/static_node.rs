//! Compile-time expression nodes.
//!
//! A static node is a plain value whose type spells out the whole expression:
//! `Binary<op::Lt, Functor<F>, Constant<f64>>` is `x < 2.0`. Building one
//! evaluates nothing, and evaluating one is a direct, inlinable call chain.
//! Operand types are checked by the compiler: arithmetic and bitwise operands
//! share one primitive type, so `i32 + f64` does not build. Integer results
//! wrap and shift amounts are masked, the same as in [`Dynamic`].
//!
//! [`Dynamic`]: crate::Dynamic
//!
//! Native operators (`+ - * / % & | ^ << >>`, prefix `-` and `!`) build nodes
//! as long as one side already is a node; relational and logical operators
//! are methods of [`ArfunctorExt`].

use crate::operators::arithmetic::Arithmetic;
use crate::operators::bitwise::Bitwise;
use crate::operators::{write_operand, BinaryOperator, UnaryOperator, ATOM_PRECEDENCE};
use crate::value::Scalar;
use std::fmt;
use std::marker::PhantomData;
use std::ops;

/// Something that can be evaluated against a record.
pub trait Arfunctor<R> {
    type Output;

    fn evaluate(&self, record: &R) -> Self::Output;
}

/// Marker and rendering support shared by every static node type.
pub trait StaticNode {
    /// Binding strength of the outermost operator.
    fn precedence(&self) -> u8;

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Zero-sized operator types.
pub mod op {
    use crate::operators::{BinaryOperator, UnaryOperator};

    macro_rules! markers {
        ($trait:ident, $kind:ident: $($name:ident),*) => {
            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $name;

                impl super::$trait for $name {
                    const OPERATOR: $kind = $kind::$name;
                }
            )*
        };
    }

    // `UnaryOperator` has no `Neg`/`Pos` variants, so those are written out.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Pos;

    impl super::UnaryOp for Pos {
        const OPERATOR: UnaryOperator = UnaryOperator::Plus;
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Neg;

    impl super::UnaryOp for Neg {
        const OPERATOR: UnaryOperator = UnaryOperator::Minus;
    }

    markers!(UnaryOp, UnaryOperator: Not, Complement);
    markers!(
        BinaryOp, BinaryOperator: Add, Sub, Mul, Div, Rem, Lt, Le, Gt, Ge, Eq, Ne, And, Or, BitAnd,
        BitOr, BitXor, Shl, Shr
    );
}

/// Links a marker type to its run-time operator.
pub trait UnaryOp {
    const OPERATOR: UnaryOperator;
}

pub trait BinaryOp {
    const OPERATOR: BinaryOperator;
}

/// Evaluation of a prefix operator over an operand of type `T`.
pub trait ApplyUnary<T>: UnaryOp {
    type Output;

    fn apply(operand: T) -> Self::Output;
}

/// Evaluation of an infix operator over operands of types `L` and `Rt`.
pub trait ApplyBinary<L, Rt>: BinaryOp {
    type Output;

    fn apply(left: L, right: Rt) -> Self::Output;
}

macro_rules! apply_same_type {
    ($op:ident: $($ty:ty),* => |$l:ident, $r:ident| $body:expr) => {
        $(
            impl ApplyBinary<$ty, $ty> for op::$op {
                type Output = $ty;

                fn apply($l: $ty, $r: $ty) -> $ty {
                    $body
                }
            }
        )*
    };
}

// Integers wrap like their run-time counterparts. Division by zero panics.
apply_same_type!(Add: i32, u32, i64, u64, i128, u128, f32, f64 => |l, r| Arithmetic::add(l, r));
apply_same_type!(Sub: i32, u32, i64, u64, i128, u128, f32, f64 => |l, r| Arithmetic::sub(l, r));
apply_same_type!(Mul: i32, u32, i64, u64, i128, u128, f32, f64 => |l, r| Arithmetic::mul(l, r));
apply_same_type!(Div: i32, u32, i64, u64, i128, u128 => |l, r| l.wrapping_div(r));
apply_same_type!(Rem: i32, u32, i64, u64, i128, u128 => |l, r| l.wrapping_rem(r));
apply_same_type!(Div: f32, f64 => |l, r| l / r);
apply_same_type!(Rem: f32, f64 => |l, r| l % r);
apply_same_type!(BitAnd: i32, u32, i64, u64, i128, u128 => |l, r| Bitwise::and(l, r));
apply_same_type!(BitOr: i32, u32, i64, u64, i128, u128 => |l, r| Bitwise::or(l, r));
apply_same_type!(BitXor: i32, u32, i64, u64, i128, u128 => |l, r| Bitwise::xor(l, r));

/// Shifts take any integer amount, masked to the width of the left operand.
macro_rules! apply_shift {
    ($($ty:ty),*) => {
        $(
            apply_shift!(@amounts $ty: i32, u32, i64, u64, i128, u128);
        )*
    };
    (@amounts $ty:ty: $($amount:ty),*) => {
        $(
            impl ApplyBinary<$ty, $amount> for op::Shl {
                type Output = $ty;

                fn apply(left: $ty, right: $amount) -> $ty {
                    Bitwise::shl(left, right as u32)
                }
            }

            impl ApplyBinary<$ty, $amount> for op::Shr {
                type Output = $ty;

                fn apply(left: $ty, right: $amount) -> $ty {
                    Bitwise::shr(left, right as u32)
                }
            }
        )*
    };
}

apply_shift!(i32, u32, i64, u64, i128, u128);

macro_rules! apply_comparison {
    ($($op:ident => $trait:ident::$method:ident),*) => {
        $(
            impl<L: $trait<Rt>, Rt> ApplyBinary<L, Rt> for op::$op {
                type Output = bool;

                fn apply(left: L, right: Rt) -> bool {
                    $trait::$method(&left, &right)
                }
            }
        )*
    };
}

apply_comparison!(
    Lt => PartialOrd::lt,
    Le => PartialOrd::le,
    Gt => PartialOrd::gt,
    Ge => PartialOrd::ge,
    Eq => PartialEq::eq,
    Ne => PartialEq::ne
);

impl ApplyBinary<bool, bool> for op::And {
    type Output = bool;

    fn apply(left: bool, right: bool) -> bool {
        left && right
    }
}

impl ApplyBinary<bool, bool> for op::Or {
    type Output = bool;

    fn apply(left: bool, right: bool) -> bool {
        left || right
    }
}

macro_rules! apply_negation {
    ($($ty:ty),*) => {
        $(
            impl ApplyUnary<$ty> for op::Neg {
                type Output = $ty;

                fn apply(operand: $ty) -> $ty {
                    Arithmetic::neg(operand)
                }
            }
        )*
    };
}

apply_negation!(i32, u32, i64, u64, i128, u128, f32, f64);

impl ApplyUnary<bool> for op::Neg {
    type Output = i32;

    fn apply(operand: bool) -> i32 {
        -i32::from(operand)
    }
}

impl ApplyUnary<bool> for op::Not {
    type Output = bool;

    fn apply(operand: bool) -> bool {
        !operand
    }
}

impl ApplyUnary<bool> for op::Pos {
    type Output = i32;

    fn apply(operand: bool) -> i32 {
        i32::from(operand)
    }
}

macro_rules! apply_numeric_unary {
    (pos: $($float:ty),*; complement: $($int:ty),*) => {
        $(
            impl ApplyUnary<$float> for op::Pos {
                type Output = $float;

                fn apply(operand: $float) -> $float {
                    operand
                }
            }
        )*
        $(
            impl ApplyUnary<$int> for op::Pos {
                type Output = $int;

                fn apply(operand: $int) -> $int {
                    operand
                }
            }

            impl ApplyUnary<$int> for op::Complement {
                type Output = $int;

                fn apply(operand: $int) -> $int {
                    !operand
                }
            }
        )*
    };
}

apply_numeric_unary!(pos: f32, f64; complement: i32, u32, i64, u64, i128, u128);

impl ApplyUnary<bool> for op::Complement {
    type Output = i32;

    fn apply(operand: bool) -> i32 {
        !i32::from(operand)
    }
}

/// A named accessor over the record.
#[derive(Clone, Copy)]
pub struct Functor<F> {
    name: &'static str,
    f: F,
}

/// Names a closure so it can take part in expressions.
///
/// ```
/// use arfunctors::{functor, Arfunctor};
///
/// struct Point { x: f64 }
///
/// let x = functor("x", |p: &Point| p.x);
/// let e = x * 2.0 + 1.0;
/// assert_eq!(e.evaluate(&Point { x: 3.0 }), 7.0);
/// assert_eq!(e.to_string(), "x * 2.0 + 1.0");
/// ```
pub fn functor<F>(name: &'static str, f: F) -> Functor<F> {
    Functor { name, f }
}

impl<F> Functor<F> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<R, T, F: Fn(&R) -> T> Arfunctor<R> for Functor<F> {
    type Output = T;

    fn evaluate(&self, record: &R) -> T {
        (self.f)(record)
    }
}

impl<F> StaticNode for Functor<F> {
    fn precedence(&self) -> u8 {
        ATOM_PRECEDENCE
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A literal operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<T>(pub T);

impl<R, T: Scalar> Arfunctor<R> for Constant<T> {
    type Output = T;

    fn evaluate(&self, _record: &R) -> T {
        self.0
    }
}

impl<T: Scalar> StaticNode for Constant<T> {
    fn precedence(&self) -> u8 {
        self.0.into_value().precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.into_value())
    }
}

/// A prefix operator applied to one operand.
pub struct Unary<Op, A> {
    operand: A,
    op: PhantomData<Op>,
}

impl<Op, A> Unary<Op, A> {
    pub fn new(operand: A) -> Self {
        Unary {
            operand,
            op: PhantomData,
        }
    }

    pub fn operand(&self) -> &A {
        &self.operand
    }
}

impl<Op, A: Clone> Clone for Unary<Op, A> {
    fn clone(&self) -> Self {
        Unary::new(self.operand.clone())
    }
}

impl<Op, A: Copy> Copy for Unary<Op, A> {}

impl<R, Op, A> Arfunctor<R> for Unary<Op, A>
where
    A: Arfunctor<R>,
    Op: ApplyUnary<A::Output>,
{
    type Output = Op::Output;

    fn evaluate(&self, record: &R) -> Self::Output {
        Op::apply(self.operand.evaluate(record))
    }
}

impl<Op: UnaryOp, A: StaticNode> StaticNode for Unary<Op, A> {
    fn precedence(&self) -> u8 {
        Op::OPERATOR.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Op::OPERATOR.symbol())?;
        write_operand(f, self.operand.precedence(), self.precedence(), false, |f| {
            self.operand.render(f)
        })
    }
}

/// An infix operator applied to two operands.
pub struct Binary<Op, L, Rt> {
    left: L,
    right: Rt,
    op: PhantomData<Op>,
}

impl<Op, L, Rt> Binary<Op, L, Rt> {
    pub fn new(left: L, right: Rt) -> Self {
        Binary {
            left,
            right,
            op: PhantomData,
        }
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &Rt {
        &self.right
    }
}

impl<Op, L: Clone, Rt: Clone> Clone for Binary<Op, L, Rt> {
    fn clone(&self) -> Self {
        Binary::new(self.left.clone(), self.right.clone())
    }
}

impl<Op, L: Copy, Rt: Copy> Copy for Binary<Op, L, Rt> {}

impl<R, Op, L, Rt> Arfunctor<R> for Binary<Op, L, Rt>
where
    L: Arfunctor<R>,
    Rt: Arfunctor<R>,
    Op: ApplyBinary<L::Output, Rt::Output>,
{
    type Output = Op::Output;

    fn evaluate(&self, record: &R) -> Self::Output {
        Op::apply(self.left.evaluate(record), self.right.evaluate(record))
    }
}

impl<Op: BinaryOp, L: StaticNode, Rt: StaticNode> StaticNode for Binary<Op, L, Rt> {
    fn precedence(&self) -> u8 {
        Op::OPERATOR.precedence()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.precedence();
        write_operand(f, self.left.precedence(), parent, false, |f| {
            self.left.render(f)
        })?;
        write!(f, " {} ", Op::OPERATOR.symbol())?;
        write_operand(f, self.right.precedence(), parent, true, |f| {
            self.right.render(f)
        })
    }
}

impl<F> fmt::Display for Functor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl<F> fmt::Debug for Functor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Functor").field(&self.name).finish()
    }
}

impl<T: Scalar> fmt::Display for Constant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl<Op: UnaryOp, A: StaticNode> fmt::Display for Unary<Op, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl<Op: BinaryOp, L: StaticNode, Rt: StaticNode> fmt::Display for Binary<Op, L, Rt> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

/// Right-hand operand of an infix operator whose left operand is `L`.
///
/// The implementation chosen decides the kind of node produced: two static
/// operands give a static [`Binary`], a dynamic operand on either side gives a
/// [`Dynamic`](crate::Dynamic). There is no implementation for two plain
/// scalars.
pub trait Combine<Op, L>: Sized {
    type Output;

    fn combine(left: L, right: Self) -> Self::Output;
}

/// Operand of a prefix operator.
pub trait Prefix<Op>: Sized {
    type Output;

    fn prefix(self) -> Self::Output;
}

/// Conversion into a static node: nodes stay as they are, scalars become
/// [`Constant`]s.
pub trait IntoArfunctor {
    type Node: StaticNode;

    fn into_arfunctor(self) -> Self::Node;
}

impl<N: StaticNode> IntoArfunctor for N {
    type Node = N;

    fn into_arfunctor(self) -> N {
        self
    }
}

macro_rules! scalar_into_arfunctor {
    ($($scalar:ty),*) => {
        $(
            impl IntoArfunctor for $scalar {
                type Node = Constant<$scalar>;

                fn into_arfunctor(self) -> Constant<$scalar> {
                    Constant(self)
                }
            }
        )*
    };
}

scalar_into_arfunctor!(bool, i32, u32, i64, u64, i128, u128, f32, f64);

// A single impl for every static right operand keeps the output type known
// while an untyped literal such as `2.0` is still being inferred.
impl<Op: BinaryOp, L: StaticNode, Rhs: IntoArfunctor> Combine<Op, L> for Rhs {
    type Output = Binary<Op, L, Rhs::Node>;

    fn combine(left: L, right: Rhs) -> Self::Output {
        Binary::new(left, right.into_arfunctor())
    }
}

impl<Op: UnaryOp, N: StaticNode> Prefix<Op> for N {
    type Output = Unary<Op, N>;

    fn prefix(self) -> Self::Output {
        Unary::new(self)
    }
}

/// Operators without a native Rust spelling that returns a node.
pub trait ArfunctorExt: Sized {
    fn lt<Rhs: Combine<op::Lt, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn le<Rhs: Combine<op::Le, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn gt<Rhs: Combine<op::Gt, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn ge<Rhs: Combine<op::Ge, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn equals<Rhs: Combine<op::Eq, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn not_equals<Rhs: Combine<op::Ne, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn and<Rhs: Combine<op::And, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn or<Rhs: Combine<op::Or, Self>>(self, rhs: Rhs) -> Rhs::Output {
        Rhs::combine(self, rhs)
    }

    fn pos(self) -> <Self as Prefix<op::Pos>>::Output
    where
        Self: Prefix<op::Pos>,
    {
        self.prefix()
    }

    fn complement(self) -> <Self as Prefix<op::Complement>>::Output
    where
        Self: Prefix<op::Complement>,
    {
        self.prefix()
    }
}

impl<N: StaticNode> ArfunctorExt for N {}

macro_rules! node_operators {
    ($($trait:ident::$method:ident => $op:ident),*) => {
        $(
            impl<F, Rhs: Combine<op::$op, Functor<F>>> ops::$trait<Rhs> for Functor<F> {
                type Output = Rhs::Output;

                fn $method(self, rhs: Rhs) -> Rhs::Output {
                    Rhs::combine(self, rhs)
                }
            }

            impl<T: Scalar, Rhs: Combine<op::$op, Constant<T>>> ops::$trait<Rhs> for Constant<T> {
                type Output = Rhs::Output;

                fn $method(self, rhs: Rhs) -> Rhs::Output {
                    Rhs::combine(self, rhs)
                }
            }

            impl<O: UnaryOp, A: StaticNode, Rhs: Combine<op::$op, Unary<O, A>>> ops::$trait<Rhs>
                for Unary<O, A>
            {
                type Output = Rhs::Output;

                fn $method(self, rhs: Rhs) -> Rhs::Output {
                    Rhs::combine(self, rhs)
                }
            }

            impl<O, L, Rt, Rhs> ops::$trait<Rhs> for Binary<O, L, Rt>
            where
                O: BinaryOp,
                L: StaticNode,
                Rt: StaticNode,
                Rhs: Combine<op::$op, Binary<O, L, Rt>>,
            {
                type Output = Rhs::Output;

                fn $method(self, rhs: Rhs) -> Rhs::Output {
                    Rhs::combine(self, rhs)
                }
            }
        )*
    };
}

node_operators!(
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

macro_rules! node_prefix_operators {
    ($($trait:ident::$method:ident => $op:ident),*) => {
        $(
            impl<F> ops::$trait for Functor<F> {
                type Output = Unary<op::$op, Self>;

                fn $method(self) -> Self::Output {
                    Unary::new(self)
                }
            }

            impl<T: Scalar> ops::$trait for Constant<T> {
                type Output = Unary<op::$op, Self>;

                fn $method(self) -> Self::Output {
                    Unary::new(self)
                }
            }

            impl<O: UnaryOp, A: StaticNode> ops::$trait for Unary<O, A> {
                type Output = Unary<op::$op, Self>;

                fn $method(self) -> Self::Output {
                    Unary::new(self)
                }
            }

            impl<O: BinaryOp, L: StaticNode, Rt: StaticNode> ops::$trait for Binary<O, L, Rt> {
                type Output = Unary<op::$op, Self>;

                fn $method(self) -> Self::Output {
                    Unary::new(self)
                }
            }
        )*
    };
}

node_prefix_operators!(Neg::neg => Neg, Not::not => Not);

/// `scalar ⊕ node`: the orphan rules require one impl per scalar and node type.
macro_rules! scalar_on_left {
    ($trait:ident::$method:ident => $op:ident; $($scalar:ty),*) => {
        $(
            impl<F> ops::$trait<Functor<F>> for $scalar {
                type Output = Binary<op::$op, Constant<$scalar>, Functor<F>>;

                fn $method(self, rhs: Functor<F>) -> Self::Output {
                    Binary::new(Constant(self), rhs)
                }
            }

            impl<T: Scalar> ops::$trait<Constant<T>> for $scalar {
                type Output = Binary<op::$op, Constant<$scalar>, Constant<T>>;

                fn $method(self, rhs: Constant<T>) -> Self::Output {
                    Binary::new(Constant(self), rhs)
                }
            }

            impl<O: UnaryOp, A: StaticNode> ops::$trait<Unary<O, A>> for $scalar {
                type Output = Binary<op::$op, Constant<$scalar>, Unary<O, A>>;

                fn $method(self, rhs: Unary<O, A>) -> Self::Output {
                    Binary::new(Constant(self), rhs)
                }
            }

            impl<O: BinaryOp, L: StaticNode, Rt: StaticNode> ops::$trait<Binary<O, L, Rt>>
                for $scalar
            {
                type Output = Binary<op::$op, Constant<$scalar>, Binary<O, L, Rt>>;

                fn $method(self, rhs: Binary<O, L, Rt>) -> Self::Output {
                    Binary::new(Constant(self), rhs)
                }
            }
        )*
    };
}

macro_rules! all_scalars_on_left {
    ($($trait:ident::$method:ident => $op:ident),*) => {
        $(
            scalar_on_left!($trait::$method => $op; i32, u32, i64, u64, i128, u128, f32, f64);
        )*
    };
}

all_scalars_on_left!(
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
