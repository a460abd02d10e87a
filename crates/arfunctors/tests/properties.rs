//! Property-based tests for expression evaluation.

use arfunctors::{functor, Arfunctor, ArfunctorExt, Dynamic, NumericType, Value};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    y: f64,
    n: i64,
}

fn sample() -> impl Strategy<Value = Sample> {
    let fields = (-1.0e6f64..1.0e6, -1.0e6f64..1.0e6, any::<i64>());
    fields.prop_map(|(x, y, n)| Sample { x, y, n })
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::I32),
        any::<u32>().prop_map(Value::U32),
        any::<i64>().prop_map(Value::I64),
        any::<u64>().prop_map(Value::U64),
        (i128::MIN + 1..=i128::MAX).prop_map(Value::I128),
        any::<u128>().prop_map(Value::U128),
        prop::num::f32::NORMAL.prop_map(Value::F32),
        prop::num::f64::NORMAL.prop_map(Value::F64),
    ]
}

proptest! {
    /// Static and dynamic forms of one expression agree on every record.
    #[test]
    fn static_matches_dynamic(s in sample(), k in -100.0f64..100.0) {
        let x = functor("x", |s: &Sample| s.x);
        let y = functor("y", |s: &Sample| s.y);
        let n = functor("n", |s: &Sample| s.n);

        let compiled = (x * k - y / 3.0).gt(x + y).or((n % 7i64).equals(0i64));
        let runtime = (Dynamic::wrap(x) * k - Dynamic::wrap(y) / 3.0)
            .gt(Dynamic::wrap(x) + y)
            .or((Dynamic::wrap(n) % 7i64).equals(0i64));

        prop_assert_eq!(runtime.evaluate(&s), Ok(Value::Bool(compiled.evaluate(&s))));
        prop_assert_eq!(compiled.to_string(), runtime.to_string());
    }

    /// Static and dynamic integer arithmetic wrap and mask the same way.
    #[test]
    fn static_integers_match_dynamic(a in any::<i32>(), b in any::<i32>()) {
        let p = functor("p", move |_: &()| a);
        let q = functor("q", move |_: &()| b);

        let compiled = (p * q + p - 7i32) << q ^ -p;
        let runtime = (Dynamic::wrap(p) * q + p - 7i32) << Dynamic::wrap(q) ^ -Dynamic::wrap(p);

        prop_assert_eq!(
            runtime.evaluate(&()),
            Ok(Value::I32(compiled.evaluate(&())))
        );
        prop_assert_eq!(compiled.to_string(), runtime.to_string());
    }

    /// Integer arithmetic matches Rust's wrapping operations.
    #[test]
    fn integer_arithmetic_wraps(a in any::<i64>(), b in any::<i64>()) {
        let sum = Dynamic::<()>::literal(a) + b;
        let product = Dynamic::<()>::literal(a) * b;
        prop_assert_eq!(sum.evaluate(&()), Ok(Value::I64(a.wrapping_add(b))));
        prop_assert_eq!(product.evaluate(&()), Ok(Value::I64(a.wrapping_mul(b))));
    }

    /// The result of every operator has the type announced before evaluation.
    #[test]
    fn output_type_is_exact(a in value(), b in value()) {
        let left = Dynamic::<()>::literal(a);
        let right = Dynamic::<()>::literal(b);
        for node in [
            left.clone() + right.clone(),
            left.clone() * right.clone(),
            left.clone().lt(right.clone()),
            left.clone().and(right.clone()),
            -left.clone(),
        ] {
            let result = node.evaluate(&()).map(|v| v.numeric_type());
            prop_assert_eq!(result, Ok(node.output_type()));
        }
        if a.numeric_type().is_integer() && b.numeric_type().is_integer() {
            let node = left ^ right;
            prop_assert_eq!(
                node.evaluate(&()).map(|v| v.numeric_type()),
                Ok(node.output_type())
            );
        }
    }

    /// A literal's text reads back as the same value.
    #[test]
    fn literal_text_reads_back(v in value()) {
        let text = v.to_string();
        let parsed = text.parse::<Value>();
        // the most negative integers are read as a negated positive literal,
        // which widens
        if let Ok(back) = parsed {
            if back.numeric_type() == v.numeric_type() {
                prop_assert_eq!(back, v);
            } else {
                prop_assert!(v.numeric_type().is_integer());
                prop_assert_eq!(back.cast(v.numeric_type()), v);
            }
        } else {
            prop_assert!(false, "{} did not parse", text);
        }
    }

    /// Clones evaluate like the original after it is dropped.
    #[test]
    fn clones_are_deep(s in sample()) {
        let original = Dynamic::functor("x", |s: &Sample| s.x) * 2.0
            + Dynamic::functor("n", |s: &Sample| s.n);
        let expected = original.evaluate(&s);
        let copy = original.clone();
        drop(original);
        prop_assert_eq!(copy.evaluate(&s), expected);
        prop_assert_eq!(copy.output_type(), NumericType::F64);
    }
}
