//! Error types for the open-data client.
//!
//! # Design
//! Failures fall into two families. `RemoteQueryError` covers everything
//! between building a request and holding a parsed envelope: bad layer ids,
//! transport failures, non-200 statuses and unusable bodies.
//! `ValueConversionError` covers a field that cannot turn an extracted value
//! into its declared type. Model operations surface either one through
//! `Error`. A missing record is not an error; lookups return `Option`.

use thiserror::Error;

/// The remote feature API could not produce a usable response.
#[derive(Debug, Error)]
pub enum RemoteQueryError {
    /// The layer id is empty or contains characters the query string cannot carry.
    #[error("invalid collection id {0:?}")]
    InvalidCollection(String),

    /// The server returned 404, typically for an unknown layer.
    #[error("collection not found")]
    NotFound,

    /// The server returned a non-200 status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body is not a feature envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The envelope carries no usable item count.
    #[error("invalid item count: {0}")]
    InvalidCount(String),
}

/// A field could not convert an extracted value to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueConversionError {
    #[error("invalid literal for integer: {0:?}")]
    InvalidInteger(String),

    #[error("invalid arithmetic operation: {0:?} is not a decimal literal")]
    InvalidDecimal(String),

    #[error("could not convert {0:?} to float")]
    InvalidFloat(String),

    #[error("{value:?} does not match date format {format:?}")]
    InvalidDate { value: String, format: String },

    #[error("{value:?} does not match date-time format {format:?}")]
    InvalidDateTime { value: String, format: String },

    /// A converted attribute does not have the type the model asked for.
    #[error("attribute `{attribute}` expected {expected}, found {found}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The model asked for an attribute its schema does not declare.
    #[error("attribute `{0}` is not declared in the schema")]
    UnknownAttribute(String),

    /// Conversion of one declared attribute failed.
    #[error("attribute `{attribute}`: {source}")]
    Attribute {
        attribute: String,
        #[source]
        source: Box<ValueConversionError>,
    },
}

/// Errors returned by model query operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Remote(#[from] RemoteQueryError),

    #[error(transparent)]
    Conversion(#[from] ValueConversionError),
}
