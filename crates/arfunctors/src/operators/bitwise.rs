//! Bitwise operators. Defined for integral operands only.

use super::BinaryOperator;
use crate::error::EvalError;
use crate::value::{NumericType, Scalar, Value};

pub trait Bitwise: Scalar {
    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    /// Shift amounts are masked to the bit width.
    fn shl(self, amount: u32) -> Self;
    fn shr(self, amount: u32) -> Self;
    fn complement(self) -> Self;
}

macro_rules! integer_bitwise {
    ($($ty:ty),*) => {
        $(
            impl Bitwise for $ty {
                fn and(self, rhs: Self) -> Self {
                    self & rhs
                }

                fn or(self, rhs: Self) -> Self {
                    self | rhs
                }

                fn xor(self, rhs: Self) -> Self {
                    self ^ rhs
                }

                fn shl(self, amount: u32) -> Self {
                    self.wrapping_shl(amount)
                }

                fn shr(self, amount: u32) -> Self {
                    self.wrapping_shr(amount)
                }

                fn complement(self) -> Self {
                    !self
                }
            }
        )*
    };
}

integer_bitwise!(i32, u32, i64, u64, i128, u128);

fn binary_in<T: Bitwise>(
    op: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, EvalError> {
    let a = T::from_value(left);
    let result = match op {
        BinaryOperator::BitAnd => a.and(T::from_value(right)),
        BinaryOperator::BitOr => a.or(T::from_value(right)),
        BinaryOperator::BitXor => a.xor(T::from_value(right)),
        BinaryOperator::Shl => a.shl(right.as_u32()),
        BinaryOperator::Shr => a.shr(right.as_u32()),
        other => {
            return Err(EvalError::unsupported(
                other.symbol(),
                &[left.numeric_type(), right.numeric_type()],
            ))
        }
    };
    Ok(result.into_value())
}

fn complement_in<T: Bitwise>(operand: Value) -> Result<Value, EvalError> {
    Ok(T::from_value(operand).complement().into_value())
}

/// `& | ^` work in the common type, shifts keep the promoted left type.
pub fn apply(op: BinaryOperator, left: Value, right: Value) -> Result<Value, EvalError> {
    let (lt, rt) = (left.numeric_type(), right.numeric_type());
    let unsupported = || EvalError::unsupported(op.symbol(), &[lt, rt]);
    if rt.is_float() {
        return Err(unsupported());
    }
    let ty = match op {
        BinaryOperator::Shl | BinaryOperator::Shr => lt.promoted(),
        _ => lt.common(rt),
    };
    dispatch_integer!(ty, binary_in(op, left, right), Err(unsupported()))
}

pub fn complement(operand: Value) -> Result<Value, EvalError> {
    let ty = operand.numeric_type();
    dispatch_integer!(
        ty,
        complement_in(operand),
        Err(EvalError::unsupported("~", &[ty]))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_operations() {
        assert_eq!(
            apply(BinaryOperator::BitAnd, Value::I32(6), Value::I32(3)),
            Ok(Value::I32(2))
        );
        assert_eq!(
            apply(BinaryOperator::BitOr, Value::U32(4), Value::I64(1)),
            Ok(Value::I64(5))
        );
        assert_eq!(
            apply(BinaryOperator::BitXor, Value::Bool(true), Value::I32(3)),
            Ok(Value::I32(2))
        );
        assert_eq!(complement(Value::I32(0)), Ok(Value::I32(-1)));
        assert_eq!(complement(Value::Bool(true)), Ok(Value::I32(-2)));
    }

    #[test]
    fn shifts_keep_left_type() {
        assert_eq!(
            apply(BinaryOperator::Shl, Value::U32(1), Value::I64(4)),
            Ok(Value::U32(16))
        );
        assert_eq!(
            apply(BinaryOperator::Shr, Value::I64(-16), Value::I32(2)),
            Ok(Value::I64(-4))
        );
        assert_eq!(
            apply(BinaryOperator::Shl, Value::I32(1), Value::I32(33)),
            Ok(Value::I32(2))
        );
    }

    #[test]
    fn floats_are_rejected() {
        assert!(matches!(
            apply(BinaryOperator::BitAnd, Value::F32(1.0), Value::I32(1)),
            Err(EvalError::UnsupportedOperands { symbol: "&", .. })
        ));
        assert!(
            apply(BinaryOperator::Shl, Value::I32(1), Value::F64(1.0)).is_err()
        );
        assert!(complement(Value::F64(1.0)).is_err());
    }
}
