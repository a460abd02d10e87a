//! Logical operators over the truthiness of their operands.

use super::BinaryOperator;
use crate::value::Value;

pub fn apply(op: BinaryOperator, left: Value, right: Value) -> Value {
    let result = match op {
        BinaryOperator::And => left.is_truthy() && right.is_truthy(),
        BinaryOperator::Or => left.is_truthy() || right.is_truthy(),
        _ => false,
    };
    Value::Bool(result)
}

pub fn not(operand: Value) -> Value {
    Value::Bool(!operand.is_truthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert_eq!(
            apply(BinaryOperator::And, Value::F32(0.5), Value::I32(2)),
            Value::Bool(true)
        );
        assert_eq!(
            apply(BinaryOperator::And, Value::F32(0.0), Value::I32(2)),
            Value::Bool(false)
        );
        assert_eq!(
            apply(BinaryOperator::Or, Value::U128(0), Value::Bool(false)),
            Value::Bool(false)
        );
        assert_eq!(not(Value::F64(0.0)), Value::Bool(true));
        assert_eq!(not(Value::I32(-3)), Value::Bool(false));
    }
}
