//! Values extracted from remote records, before and after conversion.
//!
//! # Design
//! `FieldValue` is the single tagged union that flows through the field
//! layer. Raw JSON is lifted into it (`From<&Value>`), fields convert it to
//! their target variant, and models pull typed values back out through
//! `FromFieldValue`. `Null` stands for both JSON `null` and an absent path.
//!
//! Raw JSON numbers stay `serde_json::Number` until a field converts them,
//! so their canonical text is the source's (`35.0`, not `35`) and integers
//! beyond `i64` keep every digit. Integers and decimals are unbounded.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use num_bigint::BigInt;
use serde_json::{Number, Value};

/// Canonical textual form of dates (`Display`).
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical textual form of date-times (`Display`).
pub const CANONICAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Text(String),
    /// JSON number as received, not yet converted.
    Number(Number),
    Integer(BigInt),
    Decimal(BigDecimal),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Nested array or object, kept as-is.
    Json(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Text(_) => "string",
            FieldValue::Number(_) => "number",
            FieldValue::Integer(_) => "integer",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Float(_) => "float",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Json(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            FieldValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// `None` for non-integers and for integers outside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            FieldValue::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::Json(value.clone()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::from(&other),
        }
    }
}

/// The canonical textual representation. `Null` renders as an empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Date(d) => write!(f, "{}", d.format(CANONICAL_DATE_FORMAT)),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format(CANONICAL_DATETIME_FORMAT)),
            FieldValue::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Typed extraction of a converted attribute.
///
/// `from_field_value` returns `None` when the variant does not match; the
/// caller turns that into a `TypeMismatch` naming `EXPECTED`.
pub trait FromFieldValue: Sized {
    const EXPECTED: &'static str;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FromFieldValue for FieldValue {
    const EXPECTED: &'static str = "any value";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        Some(value)
    }
}

impl FromFieldValue for String {
    const EXPECTED: &'static str = "string";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromFieldValue for BigInt {
    const EXPECTED: &'static str = "integer";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl FromFieldValue for i64 {
    const EXPECTED: &'static str = "integer in i64 range";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromFieldValue for BigDecimal {
    const EXPECTED: &'static str = "decimal";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Decimal(d) => Some(d),
            _ => None,
        }
    }
}

impl FromFieldValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromFieldValue for NaiveDate {
    const EXPECTED: &'static str = "date";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_date()
    }
}

impl FromFieldValue for NaiveDateTime {
    const EXPECTED: &'static str = "datetime";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_datetime()
    }
}

/// Null becomes `None`; anything else must match `T`.
impl<T: FromFieldValue> FromFieldValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_matching_variants() {
        assert_eq!(FieldValue::from(&json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(&json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(&json!(13)), FieldValue::Number(13.into()));
        assert_eq!(FieldValue::from(&json!(1.5)).kind_name(), "number");
        assert_eq!(
            FieldValue::from(&json!("流山市役所")),
            FieldValue::Text("流山市役所".to_string())
        );
    }

    #[test]
    fn json_structures_are_kept() {
        let value = FieldValue::from(json!({"a": [1, 2]}));
        assert_eq!(value, FieldValue::Json(json!({"a": [1, 2]})));
        assert_eq!(value.to_string(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn display_is_canonical() {
        let date = NaiveDate::from_ymd_opt(2013, 7, 19).unwrap();
        assert_eq!(FieldValue::Integer(BigInt::from(13)).to_string(), "13");
        assert_eq!(FieldValue::Float(0.5).to_string(), "0.5");
        assert_eq!(FieldValue::Date(date).to_string(), "2013-07-19");
        assert_eq!(
            FieldValue::DateTime(date.and_hms_opt(17, 1, 2).unwrap()).to_string(),
            "2013-07-19 17:01:02"
        );
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn option_accepts_null() {
        assert_eq!(Option::<String>::from_field_value(FieldValue::Null), Some(None));
        assert_eq!(
            Option::<i64>::from_field_value(FieldValue::Integer(BigInt::from(4))),
            Some(Some(4))
        );
        assert_eq!(String::from_field_value(FieldValue::Null), None);
        assert_eq!(i64::from_field_value(FieldValue::Text("4".into())), None);
    }

    #[test]
    fn json_numbers_keep_source_text() {
        assert_eq!(FieldValue::from(&json!(35.0)).to_string(), "35.0");
        assert_eq!(
            FieldValue::from(&json!(u64::MAX)).to_string(),
            "18446744073709551615"
        );
        assert_eq!(FieldValue::from(&json!(-3)).to_string(), "-3");
    }

    #[test]
    fn i64_extraction_checks_range() {
        let big: BigInt = "12345678901234567890".parse().unwrap();
        assert_eq!(FieldValue::Integer(big.clone()).as_i64(), None);
        assert_eq!(i64::from_field_value(FieldValue::Integer(big.clone())), None);
        assert_eq!(BigInt::from_field_value(FieldValue::Integer(big.clone())), Some(big));
        assert_eq!(FieldValue::Integer(BigInt::from(i64::MIN)).as_i64(), Some(i64::MIN));
    }
}
