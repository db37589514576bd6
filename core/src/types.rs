//! Wire DTOs for the feature API.
//!
//! # Design
//! The remote API wraps every page in `{"num": ..., "results": [...]}`.
//! `num` has been observed both as a JSON integer and as a numeric string, so
//! it is kept as a raw `Value` on the wire type and interpreted once in
//! `Envelope::from_wire`. Records stay untyped maps; fields project from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RemoteQueryError;

/// One remote record: a nested mapping of string keys to JSON values.
pub type Record = Map<String, Value>;

/// Raw response body as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(default)]
    pub num: Option<Value>,
    pub results: Vec<Record>,
}

/// A page of records together with the collection's total item count.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub count: u64,
    pub records: Vec<Record>,
}

impl Envelope {
    pub fn from_wire(wire: WireEnvelope) -> Result<Self, RemoteQueryError> {
        let count = match wire.num {
            Some(num) => parse_count(&num)?,
            None => return Err(RemoteQueryError::InvalidCount("missing `num`".to_string())),
        };
        Ok(Self {
            count,
            records: wire.results,
        })
    }
}

fn parse_count(num: &Value) -> Result<u64, RemoteQueryError> {
    let count = match num {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    count.ok_or_else(|| RemoteQueryError::InvalidCount(num.to_string()))
}
