//! Relational operators. Both operands are converted to their common type
//! before comparing.

use super::BinaryOperator;
use crate::value::{NumericType, Scalar, Value};

fn compare_in<T: Scalar + PartialOrd>(op: BinaryOperator, left: Value, right: Value) -> bool {
    let (a, b) = (T::from_value(left), T::from_value(right));
    match op {
        BinaryOperator::Lt => a < b,
        BinaryOperator::Le => a <= b,
        BinaryOperator::Gt => a > b,
        BinaryOperator::Ge => a >= b,
        BinaryOperator::Eq => a == b,
        BinaryOperator::Ne => a != b,
        _ => false,
    }
}

pub fn apply(op: BinaryOperator, left: Value, right: Value) -> Value {
    let ty = left.numeric_type().common(right.numeric_type());
    Value::Bool(dispatch_numeric!(ty, compare_in(op, left, right)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_types() {
        assert_eq!(
            apply(BinaryOperator::Lt, Value::F32(1.5), Value::I32(2)),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOperator::Eq, Value::I64(3), Value::F64(3.0)),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOperator::Ne, Value::Bool(true), Value::I32(1)),
            Value::Bool(false)
        );
        assert_eq!(
            apply(BinaryOperator::Ge, Value::U64(0), Value::U32(0)),
            Value::Bool(true)
        );
    }

    #[test]
    fn signed_unsigned_comparison_converts_first() {
        // -1 becomes u32::MAX in the common type
        assert_eq!(
            apply(BinaryOperator::Lt, Value::I32(-1), Value::U32(1)),
            Value::Bool(false)
        );
        assert_eq!(
            apply(BinaryOperator::Lt, Value::I64(-1), Value::U32(1)),
            Value::Bool(true)
        );
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Value::F64(f64::NAN);
        assert_eq!(apply(BinaryOperator::Eq, nan, nan), Value::Bool(false));
        assert_eq!(apply(BinaryOperator::Ne, nan, nan), Value::Bool(true));
    }
}
