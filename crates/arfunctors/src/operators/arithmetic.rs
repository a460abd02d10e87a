//! Arithmetic operators: `+ - * / %` and the prefix `+ -`.

use super::BinaryOperator;
use crate::error::EvalError;
use crate::value::{NumericType, Scalar, Value};

/// Arithmetic over one primitive. Integers wrap on overflow; integer division
/// by zero is reported instead of panicking.
pub trait Arithmetic: Scalar {
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Result<Self, EvalError>;
    fn rem(self, rhs: Self) -> Result<Self, EvalError>;
    fn neg(self) -> Self;
}

macro_rules! integer_arithmetic {
    ($($ty:ty),*) => {
        $(
            impl Arithmetic for $ty {
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn div(self, rhs: Self) -> Result<Self, EvalError> {
                    if rhs == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    Ok(self.wrapping_div(rhs))
                }

                fn rem(self, rhs: Self) -> Result<Self, EvalError> {
                    if rhs == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    Ok(self.wrapping_rem(rhs))
                }

                fn neg(self) -> Self {
                    self.wrapping_neg()
                }
            }
        )*
    };
}

macro_rules! float_arithmetic {
    ($($ty:ty),*) => {
        $(
            impl Arithmetic for $ty {
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                fn div(self, rhs: Self) -> Result<Self, EvalError> {
                    Ok(self / rhs)
                }

                fn rem(self, rhs: Self) -> Result<Self, EvalError> {
                    Ok(self % rhs)
                }

                fn neg(self) -> Self {
                    -self
                }
            }
        )*
    };
}

integer_arithmetic!(i32, u32, i64, u64, i128, u128);
float_arithmetic!(f32, f64);

fn binary_in<T: Arithmetic>(
    op: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, EvalError> {
    let (a, b) = (T::from_value(left), T::from_value(right));
    let result = match op {
        BinaryOperator::Add => a.add(b),
        BinaryOperator::Sub => a.sub(b),
        BinaryOperator::Mul => a.mul(b),
        BinaryOperator::Div => a.div(b)?,
        BinaryOperator::Rem => a.rem(b)?,
        other => {
            return Err(EvalError::unsupported(
                other.symbol(),
                &[left.numeric_type(), right.numeric_type()],
            ))
        }
    };
    Ok(result.into_value())
}

fn negate_in<T: Arithmetic>(operand: Value) -> Value {
    T::from_value(operand).neg().into_value()
}

/// Evaluates `+ - * / %` in the common type of both operands.
pub fn apply(op: BinaryOperator, left: Value, right: Value) -> Result<Value, EvalError> {
    let ty = left.numeric_type().common(right.numeric_type());
    dispatch_numeric!(ty, binary_in(op, left, right))
}

pub fn negate(operand: Value) -> Value {
    dispatch_numeric!(operand.numeric_type(), negate_in(operand))
}

/// Unary plus only performs the integral promotion.
pub fn plus(operand: Value) -> Value {
    operand.cast(operand.numeric_type().promoted())
}
