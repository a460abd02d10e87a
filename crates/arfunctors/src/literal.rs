//! Numeric literal grammar.
//!
//! ```text
//! number := digits ['.' digits] [('e'|'E') ['+'|'-'] digits] [suffix]
//! suffix := 'u'? ('l' | 'll')? | ('l' | 'll') 'u' | 'f'
//! ```
//!
//! A decimal point must be followed by digits, so `13.` and `1.e5` are
//! rejected. A floating literal whose value overflows its type to infinity,
//! or underflows to zero from a non-zero mantissa, is out of range.
//!
//! Suffixes are case-insensitive, but the letters of `ll` must share a case.
//! The literal type follows the C rules: an integer literal takes the first
//! type of its signedness, starting at the width selected by the suffix, that
//! can hold it.

use crate::error::LexicalError;
use crate::operators::arithmetic;
use crate::value::{NumericType, Value};
use std::str::FromStr;

/// Width of unsuffixed integer literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerType {
    #[default]
    I32,
    I64,
    I128,
}

impl IntegerType {
    fn numeric_type(self, unsigned: bool) -> NumericType {
        match (self, unsigned) {
            (IntegerType::I32, false) => NumericType::I32,
            (IntegerType::I32, true) => NumericType::U32,
            (IntegerType::I64, false) => NumericType::I64,
            (IntegerType::I64, true) => NumericType::U64,
            (IntegerType::I128, false) => NumericType::I128,
            (IntegerType::I128, true) => NumericType::U128,
        }
    }
}

/// Precision of unsuffixed floating-point literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatType {
    F32,
    #[default]
    F64,
}

/// Types given to literals that carry no width suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiteralTypes {
    pub integer: IntegerType,
    pub float: FloatType,
}

impl LiteralTypes {
    pub fn with_integer(mut self, integer: IntegerType) -> Self {
        self.integer = integer;
        self
    }

    pub fn with_float(mut self, float: FloatType) -> Self {
        self.float = float;
        self
    }
}

fn digits_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| from + n)
}

/// Scans the literal at the start of `input` and returns it with the number of
/// bytes consumed. No sign is accepted: a leading `-` is a prefix operator.
pub fn scan_number(input: &str, types: LiteralTypes) -> Result<(Value, usize), LexicalError> {
    let bytes = input.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_digit) {
        return Err(LexicalError::MissingNumber);
    }

    let mut pos = digits_end(bytes, 0);
    let mut is_float = false;
    if bytes.get(pos) == Some(&b'.') {
        is_float = true;
        let end = digits_end(bytes, pos + 1);
        if end == pos + 1 {
            return Err(LexicalError::MissingFractionDigits);
        }
        pos = end;
        if bytes.get(pos) == Some(&b'.') {
            return Err(LexicalError::RepeatedDecimalPoint);
        }
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        is_float = true;
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let end = digits_end(bytes, pos);
        if end == pos {
            return Err(LexicalError::MissingExponentDigits);
        }
        pos = end;
        match bytes.get(pos) {
            Some(b'e' | b'E') => return Err(LexicalError::RepeatedExponent),
            Some(b'.') => return Err(LexicalError::RepeatedDecimalPoint),
            _ => {}
        }
    }

    let number = &input[..pos];
    let suffix_len = bytes[pos..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .unwrap_or(bytes.len() - pos);
    let suffix = &input[pos..pos + suffix_len];
    let value = if is_float {
        float_value(number, float_suffix(suffix, types)?)?
    } else {
        match integer_suffix(suffix, types)? {
            Suffixed::Float(ty) => float_value(number, ty)?,
            Suffixed::Integer(ty) => integer_value(number, ty)?,
        }
    };
    Ok((value, pos + suffix_len))
}

enum Suffixed {
    Integer(NumericType),
    Float(NumericType),
}

fn invalid(suffix: &str) -> LexicalError {
    LexicalError::InvalidSuffix(suffix.to_string())
}

fn float_suffix(suffix: &str, types: LiteralTypes) -> Result<NumericType, LexicalError> {
    match suffix {
        "" => Ok(match types.float {
            FloatType::F32 => NumericType::F32,
            FloatType::F64 => NumericType::F64,
        }),
        "f" | "F" => Ok(NumericType::F32),
        "l" | "L" => Ok(NumericType::F64),
        other => Err(invalid(other)),
    }
}

fn integer_suffix(suffix: &str, types: LiteralTypes) -> Result<Suffixed, LexicalError> {
    if suffix.contains('l') && suffix.contains('L') {
        return Err(invalid(suffix));
    }
    let ty = match suffix.to_ascii_lowercase().as_str() {
        "" => types.integer.numeric_type(false),
        "u" => types.integer.numeric_type(true),
        "l" => NumericType::I64,
        "ll" => NumericType::I128,
        "ul" | "lu" => NumericType::U64,
        "ull" | "llu" => NumericType::U128,
        "f" => return Ok(Suffixed::Float(NumericType::F32)),
        _ => return Err(invalid(suffix)),
    };
    Ok(Suffixed::Integer(ty))
}

fn integer_value(digits: &str, mut ty: NumericType) -> Result<Value, LexicalError> {
    let kind = if ty.is_signed() { "signed" } else { "unsigned" };
    let magnitude = digits
        .bytes()
        .try_fold(0u128, |acc, b| {
            acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
        })
        .ok_or(LexicalError::IntegerOutOfRange(kind))?;
    while ty.integer_max().is_some_and(|max| magnitude > max) {
        ty = ty.widened().ok_or(LexicalError::IntegerOutOfRange(kind))?;
    }
    Ok(Value::U128(magnitude).cast(ty))
}

fn float_value(number: &str, ty: NumericType) -> Result<Value, LexicalError> {
    let value = match ty {
        NumericType::F32 => number.parse::<f32>().map(Value::F32),
        _ => number.parse::<f64>().map(Value::F64),
    }
    .map_err(|_| LexicalError::MissingNumber)?;
    let mantissa = number.split(['e', 'E']).next().unwrap_or(number);
    let underflow = value.as_f64() == 0.0 && mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b));
    if value.as_f64().is_infinite() || underflow {
        return Err(LexicalError::ExponentOutOfRange(ty));
    }
    Ok(value)
}

/// Reads a whole string as one literal, with optional surrounding whitespace
/// and any run of leading signs; every `-` flips the sign. `true` and `false`
/// are accepted as booleans.
impl FromStr for Value {
    type Err = LexicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        let body = s.trim_start_matches(|c: char| c == '+' || c == '-' || c.is_whitespace());
        let negative = s[..s.len() - body.len()].matches('-').count() % 2 == 1;
        let (value, consumed) = scan_number(body, LiteralTypes::default())?;
        if let Some(c) = body[consumed..].chars().next() {
            return Err(LexicalError::UnexpectedCharacter(c));
        }
        Ok(if negative { arithmetic::negate(value) } else { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Result<(Value, usize), LexicalError> {
        scan_number(input, LiteralTypes::default())
    }

    #[test]
    fn suffixes_select_the_type() {
        assert_eq!(scan("13"), Ok((Value::I32(13), 2)));
        assert_eq!(scan("13u"), Ok((Value::U32(13), 3)));
        assert_eq!(scan("13l"), Ok((Value::I64(13), 3)));
        assert_eq!(scan("13LL"), Ok((Value::I128(13), 4)));
        assert_eq!(scan("13Ul"), Ok((Value::U64(13), 4)));
        assert_eq!(scan("13llu"), Ok((Value::U128(13), 5)));
        assert_eq!(scan("13f"), Ok((Value::F32(13.0), 3)));
        assert_eq!(scan("13.0f"), Ok((Value::F32(13.0), 5)));
        assert_eq!(scan("13.0L"), Ok((Value::F64(13.0), 5)));
        assert_eq!(scan("13.45e-2"), Ok((Value::F64(0.1345), 8)));
        assert_eq!(scan("2E3"), Ok((Value::F64(2000.0), 3)));
    }

    #[test]
    fn stops_at_the_first_foreign_character() {
        assert_eq!(scan("12+x"), Ok((Value::I32(12), 2)));
        assert_eq!(scan("1.5)"), Ok((Value::F64(1.5), 3)));
        assert_eq!(scan("7 "), Ok((Value::I32(7), 1)));
    }

    #[test]
    fn unsuffixed_integers_widen() {
        assert_eq!(scan("2147483648"), Ok((Value::I64(2147483648), 10)));
        assert_eq!(scan("4294967296u"), Ok((Value::U64(4294967296), 11)));
        assert_eq!(
            scan("9223372036854775808l"),
            Ok((Value::I128(9223372036854775808), 20))
        );
        assert_eq!(
            scan("340282366920938463463374607431768211456"),
            Err(LexicalError::IntegerOutOfRange("signed"))
        );
        assert_eq!(
            scan("170141183460469231731687303715884105728"),
            Err(LexicalError::IntegerOutOfRange("signed"))
        );
    }

    #[test]
    fn malformed_literals() {
        assert_eq!(scan("1.2.3"), Err(LexicalError::RepeatedDecimalPoint));
        assert_eq!(scan("1e"), Err(LexicalError::MissingExponentDigits));
        assert_eq!(scan("1e+"), Err(LexicalError::MissingExponentDigits));
        assert_eq!(scan("1e5e3"), Err(LexicalError::RepeatedExponent));
        assert_eq!(scan("1uu"), Err(LexicalError::InvalidSuffix("uu".into())));
        assert_eq!(scan("1lL"), Err(LexicalError::InvalidSuffix("lL".into())));
        assert_eq!(scan("1.5u"), Err(LexicalError::InvalidSuffix("u".into())));
        assert_eq!(
            scan("12abc"),
            Err(LexicalError::InvalidSuffix("abc".into()))
        );
        assert_eq!(scan("x"), Err(LexicalError::MissingNumber));
    }

    #[test]
    fn exponent_overflow_is_an_error() {
        assert_eq!(
            scan("1e39f"),
            Err(LexicalError::ExponentOutOfRange(NumericType::F32))
        );
        assert_eq!(
            scan("1e309"),
            Err(LexicalError::ExponentOutOfRange(NumericType::F64))
        );
        assert_eq!(scan("1e38f"), Ok((Value::F32(1e38), 5)));
        assert_eq!(
            scan("1e-400"),
            Err(LexicalError::ExponentOutOfRange(NumericType::F64))
        );
        assert_eq!(
            scan("2.5e-50f"),
            Err(LexicalError::ExponentOutOfRange(NumericType::F32))
        );
        assert_eq!(scan("0.0e-400"), Ok((Value::F64(0.0), 8)));
        assert_eq!(scan("5e-324"), Ok((Value::F64(5e-324), 6)));
    }

    #[test]
    fn decimal_point_needs_digits() {
        assert_eq!(scan("13."), Err(LexicalError::MissingFractionDigits));
        assert_eq!(scan("1.e5"), Err(LexicalError::MissingFractionDigits));
        assert_eq!(scan("1.f"), Err(LexicalError::MissingFractionDigits));
        assert_eq!(scan("1.0"), Ok((Value::F64(1.0), 3)));
    }

    #[test]
    fn default_types_are_configurable() {
        let types = LiteralTypes::default()
            .with_integer(IntegerType::I64)
            .with_float(FloatType::F32);
        assert_eq!(scan_number("3", types), Ok((Value::I64(3), 1)));
        assert_eq!(scan_number("3u", types), Ok((Value::U64(3), 2)));
        assert_eq!(scan_number("3.5", types), Ok((Value::F32(3.5), 3)));
        assert_eq!(scan_number("3.5l", types), Ok((Value::F64(3.5), 4)));
    }

    #[test]
    fn from_str_handles_signs() {
        assert_eq!(" --+-13l ".parse::<Value>(), Ok(Value::I64(-13)));
        assert_eq!("- 2.5f".parse::<Value>(), Ok(Value::F32(-2.5)));
        assert_eq!("--7".parse::<Value>(), Ok(Value::I32(7)));
        assert_eq!("true".parse::<Value>(), Ok(Value::Bool(true)));
        assert_eq!("-".parse::<Value>(), Err(LexicalError::MissingNumber));
        assert_eq!(
            "1 2".parse::<Value>(),
            Err(LexicalError::UnexpectedCharacter(' '))
        );
    }
}
