//! Typed projection rules from nested JSON records.
//!
//! # Design
//! A `Field` is a path plus a target kind. Extraction resolves the path
//! (`resolve_path`), lifts the JSON into a `FieldValue` and converts it.
//! Conversion leaves already-typed input untouched and otherwise parses the
//! value's canonical text, so every kind accepts strings, numbers, or its
//! own variant alike. `Null` passes through every kind unchanged.
//!
//! A field without an explicit path takes its attribute name when a
//! `Schema` binds it; see `Field::bind`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use num_bigint::BigInt;
use serde_json::Value;

use crate::error::ValueConversionError;
use crate::types::Record;
use crate::value::FieldValue;

/// Timestamp convention of the feature API for dates, e.g. `2013/07/19`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Timestamp convention of the feature API, e.g. `2013/07/19 17:01:02`.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Decimal,
    Float,
    Date,
    DateTime,
}

impl FieldKind {
    fn default_format(self) -> Option<&'static str> {
        match self {
            FieldKind::Date => Some(DEFAULT_DATE_FORMAT),
            FieldKind::DateTime => Some(DEFAULT_DATETIME_FORMAT),
            _ => None,
        }
    }
}

/// One named, typed projection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: Option<String>,
    format: Option<String>,
    kind: FieldKind,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            name: None,
            format: None,
            kind,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn decimal() -> Self {
        Self::new(FieldKind::Decimal)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    /// Set the dot-delimited source path, e.g. `"attrs.attr2"`.
    pub fn named(mut self, path: impl Into<String>) -> Self {
        self.name = Some(path.into());
        self
    }

    /// Set the `strftime` pattern. Only temporal kinds read it.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The effective pattern: explicit, else the kind's default.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().or_else(|| self.kind.default_format())
    }

    /// Copy of this field with the path defaulted to `attribute`.
    pub fn bind(&self, attribute: &str) -> Self {
        let mut bound = self.clone();
        if bound.name.is_none() {
            bound.name = Some(attribute.to_string());
        }
        bound
    }

    /// Resolve this field's path in `record` and convert what is found.
    ///
    /// An unnamed field resolves nothing and yields `Null`.
    pub fn extract(&self, record: &Record) -> Result<FieldValue, ValueConversionError> {
        let raw = self
            .name
            .as_deref()
            .and_then(|path| resolve_path(record, path))
            .map(FieldValue::from)
            .unwrap_or_default();
        self.convert(&raw)
    }

    pub fn convert(&self, value: &FieldValue) -> Result<FieldValue, ValueConversionError> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }
        match self.kind {
            FieldKind::String => Ok(match value {
                FieldValue::Text(_) => value.clone(),
                other => FieldValue::Text(other.to_string()),
            }),
            FieldKind::Integer => match value {
                FieldValue::Integer(_) => Ok(value.clone()),
                other => {
                    let text = other.to_string();
                    text.trim()
                        .parse::<BigInt>()
                        .map(FieldValue::Integer)
                        .map_err(|_| ValueConversionError::InvalidInteger(text))
                }
            },
            FieldKind::Decimal => match value {
                FieldValue::Decimal(_) => Ok(value.clone()),
                other => {
                    let text = other.to_string();
                    BigDecimal::from_str(text.trim())
                        .map(FieldValue::Decimal)
                        .map_err(|_| ValueConversionError::InvalidDecimal(text))
                }
            },
            FieldKind::Float => match value {
                FieldValue::Float(_) => Ok(value.clone()),
                other => {
                    let text = other.to_string();
                    text.trim()
                        .parse::<f64>()
                        .map(FieldValue::Float)
                        .map_err(|_| ValueConversionError::InvalidFloat(text))
                }
            },
            FieldKind::Date => match value {
                FieldValue::Date(_) => Ok(value.clone()),
                other => {
                    let text = other.to_string();
                    let format = self.format().unwrap_or(DEFAULT_DATE_FORMAT);
                    NaiveDate::parse_from_str(text.trim(), format)
                        .map(FieldValue::Date)
                        .map_err(|_| ValueConversionError::InvalidDate {
                            value: text,
                            format: format.to_string(),
                        })
                }
            },
            FieldKind::DateTime => match value {
                FieldValue::DateTime(_) => Ok(value.clone()),
                other => {
                    let text = other.to_string();
                    let format = self.format().unwrap_or(DEFAULT_DATETIME_FORMAT);
                    NaiveDateTime::parse_from_str(text.trim(), format)
                        .map(FieldValue::DateTime)
                        .map_err(|_| ValueConversionError::InvalidDateTime {
                            value: text,
                            format: format.to_string(),
                        })
                }
            },
        }
    }
}

/// Walk `record` along a dot-delimited path.
///
/// Returns `None` when a key is missing at any level or an intermediate
/// value is not an object.
pub fn resolve_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(record.get(first)?, |value, key| value.as_object()?.get(key))
}
