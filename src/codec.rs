//! Attribute marshalling
//!
//! Converts between the native [`Value`] grammar and the store's tagged
//! [`AttributeValue`] wire format. Encoding is fallible only for values the
//! store cannot hold; decoding is total.

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

use crate::error::Error;
use crate::value::{Item, Number, Value};

/// Wire form of an item
pub type WireItem = HashMap<String, AttributeValue>;

/// Encode a native value into its wire form
pub fn encode(value: &Value) -> Result<AttributeValue, Error> {
    Ok(match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => {
            if !n.is_valid() {
                return Err(Error::UnsupportedValue(format!(
                    "number `{n}` is not a finite decimal"
                )));
            }
            AttributeValue::N(n.as_str().to_string())
        }
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Binary(bytes) => AttributeValue::B(Blob::new(bytes.clone())),
        Value::List(list) => AttributeValue::L(list.iter().map(encode).collect::<Result<_, _>>()?),
        Value::Map(map) => AttributeValue::M(encode_item(map)?),
    })
}

/// Encode every attribute of an item
pub fn encode_item(item: &Item) -> Result<WireItem, Error> {
    item.iter()
        .map(|(name, value)| {
            encode(value)
                .map(|encoded| (name.clone(), encoded))
                .map_err(|e| match e {
                    Error::UnsupportedValue(reason) => {
                        Error::UnsupportedValue(format!("attribute `{name}`: {reason}"))
                    }
                    other => other,
                })
        })
        .collect()
}

/// Encode an optional set of expression values
///
/// The store rejects an empty value map, so an empty input encodes to `None`.
pub(crate) fn encode_values(values: Option<&Item>) -> Result<Option<WireItem>, Error> {
    match values {
        Some(values) if !values.is_empty() => encode_item(values).map(Some),
        _ => Ok(None),
    }
}

/// Decode a wire value into its native form
///
/// Sets decode to lists. Tags this crate does not know decode to `Null`.
pub fn decode(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(Number::from_text(n.as_str())),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::B(blob) => Value::Binary(blob.as_ref().to_vec()),
        AttributeValue::L(list) => Value::List(list.iter().map(decode).collect()),
        AttributeValue::M(map) => Value::Map(decode_item(map)),
        AttributeValue::Ss(set) => Value::List(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::List(
            set.iter()
                .map(|n| Value::Number(Number::from_text(n.as_str())))
                .collect(),
        ),
        AttributeValue::Bs(set) => Value::List(
            set.iter()
                .map(|blob| Value::Binary(blob.as_ref().to_vec()))
                .collect(),
        ),
        _ => Value::Null,
    }
}

/// Decode every attribute of a wire item
pub fn decode_item(item: &WireItem) -> Item {
    item.iter()
        .map(|(name, value)| (name.clone(), decode(value)))
        .collect()
}

/// Convert a structured value (struct, map) into a native item
///
/// Fields skipped by serde (`skip_serializing_if`) are absent from the
/// result. Values that do not serialize to a map are rejected.
pub fn to_item<T: Serialize>(value: &T) -> Result<Item, Error> {
    let item: WireItem = serde_dynamo::to_item(value)?;
    Ok(decode_item(&item))
}

/// Convert a native item into a structured value
pub fn from_item<T: DeserializeOwned>(item: &Item) -> Result<T, Error> {
    Ok(serde_dynamo::from_item(encode_item(item)?)?)
}
