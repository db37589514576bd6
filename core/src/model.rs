//! Declarative record types bound to remote collections.
//!
//! # Design
//! A model type lists its attributes once in a `Schema`, an ordered set of
//! `(attribute, Field)` pairs kept in a `OnceLock` by the implementor. Binding
//! happens in `Schema::new`: each field without a path gets a copy whose path
//! is the attribute name, so extraction never has to look the name up again.
//! `Schema::materialize` applies every bound field to one record and yields
//! `Values`; the model type then takes its typed attributes out of them.
//!
//! The query operations are provided methods on `Model`, so every model
//! type gets `get_all_data`, `get_data`, `get_by_id` and `get_data_count`
//! against any `DataSource`.

use tracing::debug;

use crate::error::{Error, ValueConversionError};
use crate::field::{resolve_path, Field};
use crate::source::DataSource;
use crate::transport::Transport;
use crate::types::Record;
use crate::value::{FieldValue, FromFieldValue};

/// A field bound to the attribute it populates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    attribute: String,
    field: Field,
}

impl BoundField {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The resolved source path; always set after binding.
    pub fn path(&self) -> &str {
        self.field.name().unwrap_or(&self.attribute)
    }
}

/// The ordered attribute declarations of one model type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<BoundField>,
}

impl Schema {
    /// Bind `declarations` in order.
    ///
    /// Declaring an attribute twice keeps its first position and the last
    /// field.
    pub fn new<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (S, Field)>,
        S: Into<String>,
    {
        let mut fields: Vec<BoundField> = Vec::new();
        for (attribute, field) in declarations {
            let attribute = attribute.into();
            let bound = BoundField {
                field: field.bind(&attribute),
                attribute,
            };
            match fields.iter_mut().find(|f| f.attribute == bound.attribute) {
                Some(existing) => *existing = bound,
                None => fields.push(bound),
            }
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn get(&self, attribute: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.attribute == attribute)
            .map(|f| &f.field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Apply every declared field to `record`.
    ///
    /// The first failing field aborts the whole record; the error names the
    /// attribute.
    pub fn materialize(&self, record: &Record) -> Result<Values, ValueConversionError> {
        let entries = self
            .fields
            .iter()
            .map(|bound| {
                bound
                    .field
                    .extract(record)
                    .map(|value| (bound.attribute.clone(), value))
                    .map_err(|source| ValueConversionError::Attribute {
                        attribute: bound.attribute.clone(),
                        source: Box::new(source),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Values { entries })
    }
}

/// Converted attributes of one record, one entry per declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct Values {
    entries: Vec<(String, FieldValue)>,
}

impl Values {
    pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
    }

    /// Move one attribute out as `T`. A second take of the same attribute
    /// sees `Null`.
    pub fn take<T: FromFieldValue>(&mut self, attribute: &str) -> Result<T, ValueConversionError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
            .ok_or_else(|| ValueConversionError::UnknownAttribute(attribute.to_string()))?;
        let value = std::mem::take(slot);
        let found = value.kind_name();
        T::from_field_value(value).ok_or_else(|| ValueConversionError::TypeMismatch {
            attribute: attribute.to_string(),
            expected: T::EXPECTED,
            found,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A record type materialised from a remote collection.
///
/// ```
/// use std::sync::OnceLock;
///
/// use opendata_core::{Field, Model, Schema, ValueConversionError, Values};
///
/// struct Facility {
///     name: String,
///     geo: String,
/// }
///
/// impl Model for Facility {
///     fn schema() -> &'static Schema {
///         static SCHEMA: OnceLock<Schema> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             Schema::new([
///                 ("name", Field::string().named("attrs.attr2")),
///                 ("geo", Field::string().named("geometry")),
///             ])
///         })
///     }
///
///     fn from_values(mut values: Values) -> Result<Self, ValueConversionError> {
///         Ok(Self {
///             name: values.take("name")?,
///             geo: values.take("geo")?,
///         })
///     }
/// }
/// ```
pub trait Model: Sized {
    /// Path of the source-native record identifier used by `get_by_id`.
    const ID_PATH: &'static str = "feature_id";

    fn schema() -> &'static Schema;

    fn from_values(values: Values) -> Result<Self, ValueConversionError>;

    fn from_record(record: &Record) -> Result<Self, ValueConversionError> {
        Self::from_values(Self::schema().materialize(record)?)
    }

    fn get_data_count<T: Transport>(source: &DataSource<T>, layer: &str) -> Result<u64, Error> {
        Ok(source.get_data_count(layer)?)
    }

    /// Every record of `layer`, in source order.
    fn get_all_data<T: Transport>(source: &DataSource<T>, layer: &str) -> Result<Vec<Self>, Error> {
        let records = source.get_all_records(layer)?;
        materialize_all(layer, &records)
    }

    /// At most `limit` records from the start of `layer`, without a count request.
    fn get_data<T: Transport>(source: &DataSource<T>, layer: &str, limit: u64) -> Result<Vec<Self>, Error> {
        let records = source.fetch_records(layer, limit)?;
        materialize_all(layer, &records)
    }

    /// The record whose `ID_PATH` equals `id`, or `None`.
    fn get_by_id<T: Transport>(source: &DataSource<T>, layer: &str, id: i64) -> Result<Option<Self>, Error> {
        let records = source.get_all_records(layer)?;
        let found = records
            .iter()
            .find(|record| has_id(record, Self::ID_PATH, id))
            .map(Self::from_record)
            .transpose()?;
        debug!(layer, id, found = found.is_some(), "looked up record by id");
        Ok(found)
    }
}

fn materialize_all<M: Model>(layer: &str, records: &[Record]) -> Result<Vec<M>, Error> {
    let models = records
        .iter()
        .map(M::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        model = std::any::type_name::<M>(),
        layer,
        records = models.len(),
        "materialized records"
    );
    Ok(models)
}

/// Identifiers arrive as JSON integers or numeric strings.
fn has_id(record: &Record, path: &str, id: i64) -> bool {
    match resolve_path(record, path) {
        Some(serde_json::Value::Number(n)) => n.as_i64() == Some(id),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok() == Some(id),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::OnceLock;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn city_hall() -> Record {
        record(json!({
            "created": "2013/07/19 17:01:02",
            "attrs": {
                "attr2": "流山市役所",
                "attr6": "35.8562708",
                "attr7": "139.9028991"
            },
            "feature_id": 1,
            "geometry": "POINT(139.9028991 35.8562708)"
        }))
    }

    #[derive(Debug)]
    struct Office {
        created: chrono::NaiveDateTime,
        geo: String,
        name: String,
        latitude: BigDecimal,
        longitude: f64,
        phone: Option<String>,
    }

    impl Model for Office {
        fn schema() -> &'static Schema {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::new([
                    ("created", Field::datetime()),
                    ("geo", Field::string().named("geometry")),
                    ("name", Field::string().named("attrs.attr2")),
                    ("latitude", Field::decimal().named("attrs.attr6")),
                    ("longitude", Field::float().named("attrs.attr7")),
                    ("phone", Field::string().named("attrs.attr8")),
                ])
            })
        }

        fn from_values(mut values: Values) -> Result<Self, ValueConversionError> {
            Ok(Self {
                created: values.take("created")?,
                geo: values.take("geo")?,
                name: values.take("name")?,
                latitude: values.take("latitude")?,
                longitude: values.take("longitude")?,
                phone: values.take("phone")?,
            })
        }
    }

    #[test]
    fn schema_binds_default_paths() {
        let schema = Office::schema();
        let paths: Vec<_> = schema.fields().iter().map(|f| (f.attribute(), f.path())).collect();
        assert_eq!(
            paths,
            vec![
                ("created", "created"),
                ("geo", "geometry"),
                ("name", "attrs.attr2"),
                ("latitude", "attrs.attr6"),
                ("longitude", "attrs.attr7"),
                ("phone", "attrs.attr8"),
            ]
        );
        assert_eq!(schema.get("created").and_then(Field::name), Some("created"));
    }

    #[test]
    fn redeclared_attribute_keeps_last_field() {
        let schema = Schema::new([
            ("a", Field::string()),
            ("b", Field::integer()),
            ("a", Field::float().named("x")),
        ]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields()[0].attribute(), "a");
        assert_eq!(schema.fields()[0].field(), &Field::float().named("x"));
    }

    #[test]
    fn from_record_populates_every_attribute() {
        let office = Office::from_record(&city_hall()).unwrap();
        assert_eq!(
            office.created,
            NaiveDate::from_ymd_opt(2013, 7, 19)
                .unwrap()
                .and_hms_opt(17, 1, 2)
                .unwrap()
        );
        assert_eq!(office.geo, "POINT(139.9028991 35.8562708)");
        assert_eq!(office.name, "流山市役所");
        assert_eq!(office.latitude, BigDecimal::from_str("35.8562708").unwrap());
        assert_eq!(office.longitude, 139.9028991);
        assert_eq!(office.phone, None);
    }

    #[test]
    fn materialize_yields_one_value_per_field() {
        let values = Office::schema().materialize(&city_hall()).unwrap();
        assert_eq!(values.len(), Office::schema().len());
        assert_eq!(values.get("phone"), Some(&FieldValue::Null));
        assert_eq!(
            values.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["created", "geo", "name", "latitude", "longitude", "phone"]
        );
    }

    #[test]
    fn conversion_failure_names_the_attribute() {
        let mut rec = city_hall();
        rec["attrs"]["attr6"] = json!("north");
        let err = Office::from_record(&rec).unwrap_err();
        match err {
            ValueConversionError::Attribute { attribute, source } => {
                assert_eq!(attribute, "latitude");
                assert!(matches!(*source, ValueConversionError::InvalidDecimal(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_into_required_attribute_is_a_mismatch() {
        let mut rec = city_hall();
        rec.remove("geometry");
        let err = Office::from_record(&rec).unwrap_err();
        assert_eq!(
            err,
            ValueConversionError::TypeMismatch {
                attribute: "geo".to_string(),
                expected: "string",
                found: "null",
            }
        );
    }

    #[test]
    fn take_unknown_attribute_fails() {
        let mut values = Office::schema().materialize(&city_hall()).unwrap();
        let err = values.take::<String>("address").unwrap_err();
        assert_eq!(err, ValueConversionError::UnknownAttribute("address".to_string()));
    }

    #[test]
    fn ids_match_numbers_and_numeric_strings() {
        let rec = record(json!({"feature_id": 2, "alt": {"id": " 7 "}}));
        assert!(has_id(&rec, "feature_id", 2));
        assert!(!has_id(&rec, "feature_id", 2015));
        assert!(has_id(&rec, "alt.id", 7));
        assert!(!has_id(&rec, "missing", 2));
    }
}
