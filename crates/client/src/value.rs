//! Typed attribute values
//!
//! A [`Value`] wraps exactly one primitive. The request builder dispatches on
//! the variant to pick the JSON representation, so callers never hand it an
//! untyped blob.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value as Json};

/// A primitive value assigned to an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string
    String(String),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// Single precision float
    Float(f32),
    /// Double precision float
    Double(f64),
    /// Boolean flag
    Boolean(bool),
    /// Arbitrary precision decimal
    Decimal(Decimal),
}

/// Kind tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Decimal,
}

impl ValueKind {
    /// Lowercase kind name, used in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    #[inline]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    #[inline]
    pub const fn int(value: i32) -> Self {
        Self::Int(value)
    }

    #[inline]
    pub const fn long(value: i64) -> Self {
        Self::Long(value)
    }

    #[inline]
    pub const fn float(value: f32) -> Self {
        Self::Float(value)
    }

    #[inline]
    pub const fn double(value: f64) -> Self {
        Self::Double(value)
    }

    #[inline]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    #[inline]
    pub const fn decimal(value: Decimal) -> Self {
        Self::Decimal(value)
    }

    /// Kind tag of this value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Decimal(_) => ValueKind::Decimal,
        }
    }

    /// Native JSON representation of the wrapped primitive
    ///
    /// Floats and decimals keep their shortest exact textual form, so `0.1f32`
    /// serializes as `0.1` and `Decimal("12.50")` as `12.50`. Non-finite
    /// floats have no JSON number form and become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::String(v) => Json::String(v.clone()),
            Self::Int(v) => Json::Number((*v).into()),
            Self::Long(v) => Json::Number((*v).into()),
            Self::Float(v) if v.is_finite() => number_from_text(&v.to_string()),
            Self::Double(v) if v.is_finite() => number_from_text(&v.to_string()),
            Self::Float(_) | Self::Double(_) => Json::Null,
            Self::Boolean(v) => Json::Bool(*v),
            Self::Decimal(v) => number_from_text(&v.to_string()),
        }
    }
}

/// Parse a finite numeric literal into a JSON number, keeping its text
fn number_from_text(text: &str) -> Json {
    Number::from_str(text).map(Json::Number).unwrap_or(Json::Null)
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_match_kind() {
        assert_eq!(Value::string("a").kind(), ValueKind::String);
        assert_eq!(Value::int(1).kind(), ValueKind::Int);
        assert_eq!(Value::long(1).kind(), ValueKind::Long);
        assert_eq!(Value::float(1.0).kind(), ValueKind::Float);
        assert_eq!(Value::double(1.0).kind(), ValueKind::Double);
        assert_eq!(Value::boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::decimal(Decimal::new(1250, 2)).kind(), ValueKind::Decimal);
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from("home"), Value::String("home".to_string()));
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(7_i64), Value::Long(7));
        assert_eq!(Value::from(true), Value::Boolean(true));
    }

    #[test]
    fn test_no_coercion_between_integer_kinds() {
        assert_ne!(Value::int(1), Value::long(1));
    }

    #[test]
    fn test_to_json_scalars() {
        assert_eq!(serde_json::to_string(&Value::string("x").to_json()).unwrap(), r#""x""#);
        assert_eq!(serde_json::to_string(&Value::int(-3).to_json()).unwrap(), "-3");
        assert_eq!(
            serde_json::to_string(&Value::long(9_000_000_000).to_json()).unwrap(),
            "9000000000"
        );
        assert_eq!(serde_json::to_string(&Value::boolean(false).to_json()).unwrap(), "false");
    }

    #[test]
    fn test_to_json_float_keeps_short_form() {
        assert_eq!(serde_json::to_string(&Value::float(0.1).to_json()).unwrap(), "0.1");
        assert_eq!(serde_json::to_string(&Value::double(2.5).to_json()).unwrap(), "2.5");
    }

    #[test]
    fn test_to_json_decimal_is_exact() {
        let value = Value::decimal(Decimal::new(1250, 2));
        assert_eq!(serde_json::to_string(&value.to_json()).unwrap(), "12.50");
    }

    #[test]
    fn test_to_json_non_finite_is_null() {
        assert_eq!(Value::double(f64::NAN).to_json(), Json::Null);
        assert_eq!(Value::float(f32::INFINITY).to_json(), Json::Null);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(ValueKind::Decimal.as_str(), "decimal");
        assert_eq!(ValueKind::Boolean.to_string(), "boolean");
    }
}
