//! Numeric values flowing through expressions.
//!
//! A [`Value`] holds exactly one of the arithmetic kinds an expression can
//! produce. [`NumericType`] is its tag, ordered by conversion rank so that the
//! common type of two operands is simply the larger of their promoted types.

use std::fmt;

/// Tag of a [`Value`], ordered by conversion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericType {
    Bool,
    I32,
    U32,
    I64,
    U64,
    I128,
    U128,
    F32,
    F64,
}

impl NumericType {
    pub const ALL: [NumericType; 9] = [
        NumericType::Bool,
        NumericType::I32,
        NumericType::U32,
        NumericType::I64,
        NumericType::U64,
        NumericType::I128,
        NumericType::U128,
        NumericType::F32,
        NumericType::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericType::Bool => "bool",
            NumericType::I32 => "i32",
            NumericType::U32 => "u32",
            NumericType::I64 => "i64",
            NumericType::U64 => "u64",
            NumericType::I128 => "i128",
            NumericType::U128 => "u128",
            NumericType::F32 => "f32",
            NumericType::F64 => "f64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumericType::F32 | NumericType::F64)
    }

    /// Integral types, `bool` included.
    pub fn is_integer(self) -> bool {
        !self.is_float()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            NumericType::I32
                | NumericType::I64
                | NumericType::I128
                | NumericType::F32
                | NumericType::F64
        )
    }

    pub fn bits(self) -> u32 {
        match self {
            NumericType::Bool => 1,
            NumericType::I32 | NumericType::U32 | NumericType::F32 => 32,
            NumericType::I64 | NumericType::U64 | NumericType::F64 => 64,
            NumericType::I128 | NumericType::U128 => 128,
        }
    }

    /// Integral promotion: `bool` takes part in arithmetic as `i32`.
    pub fn promoted(self) -> NumericType {
        match self {
            NumericType::Bool => NumericType::I32,
            other => other,
        }
    }

    /// Common type of a binary arithmetic operation.
    pub fn common(self, other: NumericType) -> NumericType {
        self.promoted().max(other.promoted())
    }

    /// Next wider integer type with the same signedness.
    pub fn widened(self) -> Option<NumericType> {
        match self {
            NumericType::I32 => Some(NumericType::I64),
            NumericType::I64 => Some(NumericType::I128),
            NumericType::U32 => Some(NumericType::U64),
            NumericType::U64 => Some(NumericType::U128),
            _ => None,
        }
    }

    /// Comma-separated type names, as used in operand error messages.
    pub fn join(types: &[NumericType]) -> String {
        let names: Vec<_> = types.iter().map(|ty| ty.name()).collect();
        names.join(", ")
    }

    /// Largest magnitude an integer type can hold, `None` for floats.
    pub(crate) fn integer_max(self) -> Option<u128> {
        match self {
            NumericType::Bool => Some(1),
            NumericType::I32 => Some(i32::MAX as u128),
            NumericType::U32 => Some(u32::MAX as u128),
            NumericType::I64 => Some(i64::MAX as u128),
            NumericType::U64 => Some(u64::MAX as u128),
            NumericType::I128 => Some(i128::MAX as u128),
            NumericType::U128 => Some(u128::MAX),
            NumericType::F32 | NumericType::F64 => None,
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single arithmetic value.
///
/// Equality is exact: `I32(1)` and `I64(1)` are different values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
}

macro_rules! cast_methods {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Converts to `", stringify!($ty), "` with `as` semantics.")]
            pub fn $method(self) -> $ty {
                match self {
                    Value::Bool(v) => v as u8 as $ty,
                    Value::I32(v) => v as $ty,
                    Value::U32(v) => v as $ty,
                    Value::I64(v) => v as $ty,
                    Value::U64(v) => v as $ty,
                    Value::I128(v) => v as $ty,
                    Value::U128(v) => v as $ty,
                    Value::F32(v) => v as $ty,
                    Value::F64(v) => v as $ty,
                }
            }
        )*
    };
}

impl Value {
    pub fn numeric_type(&self) -> NumericType {
        match self {
            Value::Bool(_) => NumericType::Bool,
            Value::I32(_) => NumericType::I32,
            Value::U32(_) => NumericType::U32,
            Value::I64(_) => NumericType::I64,
            Value::U64(_) => NumericType::U64,
            Value::I128(_) => NumericType::I128,
            Value::U128(_) => NumericType::U128,
            Value::F32(_) => NumericType::F32,
            Value::F64(_) => NumericType::F64,
        }
    }

    /// Non-zero test used by the logical operators.
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Bool(v) => v,
            Value::F32(v) => v != 0.0,
            Value::F64(v) => v != 0.0,
            other => other.as_u128() != 0,
        }
    }

    pub fn as_bool(self) -> bool {
        self.is_truthy()
    }

    cast_methods! {
        as_i32 => i32,
        as_u32 => u32,
        as_i64 => i64,
        as_u64 => u64,
        as_i128 => i128,
        as_u128 => u128,
        as_f32 => f32,
        as_f64 => f64,
    }

    /// Converts the value to another type with `as` semantics.
    pub fn cast(self, ty: NumericType) -> Value {
        match ty {
            NumericType::Bool => Value::Bool(self.as_bool()),
            NumericType::I32 => Value::I32(self.as_i32()),
            NumericType::U32 => Value::U32(self.as_u32()),
            NumericType::I64 => Value::I64(self.as_i64()),
            NumericType::U64 => Value::U64(self.as_u64()),
            NumericType::I128 => Value::I128(self.as_i128()),
            NumericType::U128 => Value::U128(self.as_u128()),
            NumericType::F32 => Value::F32(self.as_f32()),
            NumericType::F64 => Value::F64(self.as_f64()),
        }
    }

    /// Rendering precedence: a negative literal reads like a prefix minus.
    pub(crate) fn precedence(&self) -> u8 {
        let negative = match *self {
            Value::I32(v) => v < 0,
            Value::I64(v) => v < 0,
            Value::I128(v) => v < 0,
            Value::F32(v) => v.is_sign_negative(),
            Value::F64(v) => v.is_sign_negative(),
            _ => false,
        };
        if negative {
            crate::operators::UNARY_PRECEDENCE
        } else {
            crate::operators::ATOM_PRECEDENCE
        }
    }
}

/// Literal syntax: the suffix spells out the type so the text parses back to
/// the same variant.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}u"),
            Value::I64(v) => write!(f, "{v}l"),
            Value::U64(v) => write!(f, "{v}ul"),
            Value::I128(v) => write!(f, "{v}ll"),
            Value::U128(v) => write!(f, "{v}ull"),
            Value::F32(v) => write!(f, "{v:?}f"),
            Value::F64(v) => write!(f, "{v:?}"),
        }
    }
}

/// A primitive type that can be stored in a [`Value`].
pub trait Scalar: Copy + Send + Sync + 'static {
    const TYPE: NumericType;

    fn into_value(self) -> Value;

    /// Converts any value to `Self` with `as` semantics.
    fn from_value(value: Value) -> Self;
}

macro_rules! scalar {
    ($($ty:ty => $variant:ident, $cast:ident;)*) => {
        $(
            impl Scalar for $ty {
                const TYPE: NumericType = NumericType::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Self {
                    value.$cast()
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            /// Extracts the exact variant; any other variant is handed back.
            impl TryFrom<Value> for $ty {
                type Error = Value;

                fn try_from(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

scalar! {
    bool => Bool, as_bool;
    i32 => I32, as_i32;
    u32 => U32, as_u32;
    i64 => I64, as_i64;
    u64 => U64, as_u64;
    i128 => I128, as_i128;
    u128 => U128, as_u128;
    f32 => F32, as_f32;
    f64 => F64, as_f64;
}
