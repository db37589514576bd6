//! Read-only client core for a municipal open-data feature API.
//!
//! # Overview
//! Fetches feature records from a JSON HTTP endpoint and maps each record
//! into a typed model. Two layers:
//! - `field` / `value`: typed projection rules that pull a value out of a
//!   nested record by a dot-delimited path and convert it.
//! - `model`: schemas of named fields plus the query operations
//!   (`get_all_data`, `get_data`, `get_by_id`, `get_data_count`).
//!
//! # Design
//! - Request building and response parsing live in `FeatureClient`, which
//!   never touches the network (host-does-IO pattern). A `Transport` executes
//!   the round-trip; `UreqTransport` is the blocking default.
//! - `DataSource` pairs the two and is the only thing models talk to.
//! - No caching, no retries, no state between calls.

pub mod client;
pub mod error;
pub mod field;
pub mod http;
pub mod model;
pub mod source;
pub mod transport;
pub mod types;
pub mod value;

pub use client::{FeatureClient, DEFAULT_ENDPOINT};
pub use error::{Error, RemoteQueryError, ValueConversionError};
pub use field::{Field, FieldKind};
pub use http::{HttpRequest, HttpResponse};
pub use model::{Model, Schema, Values};
pub use source::DataSource;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Envelope, Record};
pub use value::{FieldValue, FromFieldValue};

pub use bigdecimal::BigDecimal;
pub use num_bigint::BigInt;
