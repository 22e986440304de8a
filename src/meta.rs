//! Bookkeeping metadata
//!
//! Every stored item carries four reserved attributes: creation and update
//! timestamps plus the partition and sort key. The names are process-wide
//! constants ([`ATTRIBUTE_NAMES`]).

use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::Error;
use crate::expression::UpdateExpression;
use crate::value::{Item, Key, Value};

/// Reserved attribute names
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeNames {
    /// Creation timestamp, written once
    pub created: &'static str,
    /// Partition key
    pub partition_key: &'static str,
    /// Sort key
    pub sort_key: &'static str,
    /// Update timestamp, refreshed on every write
    pub updated: &'static str,
}

/// The reserved attribute names used by every table
pub const ATTRIBUTE_NAMES: AttributeNames = AttributeNames {
    created: "_c",
    partition_key: "_pk",
    sort_key: "_sk",
    updated: "_u",
};

impl AttributeNames {
    /// Whether `name` is one of the reserved attribute names
    pub fn is_reserved(&self, name: &str) -> bool {
        [self.created, self.partition_key, self.sort_key, self.updated].contains(&name)
    }

    /// Name placeholder bound to the update timestamp (`#_u`)
    pub fn updated_name_placeholder(&self) -> String {
        format!("#{}", self.updated)
    }

    /// Value placeholder bound to the update timestamp (`:_u`)
    pub fn updated_value_placeholder(&self) -> String {
        format!(":{}", self.updated)
    }
}

/// Panics in debug builds when a name map binds a reserved placeholder
/// (`#_c`, `#_pk`, `#_sk`, `#_u`) to some other attribute
pub(crate) fn assert_reserved_placeholders(expression_attribute_names: &HashMap<String, String>) {
    for (placeholder, attribute) in expression_attribute_names {
        if let Some(name) = placeholder.strip_prefix('#') {
            debug_assert!(
                !ATTRIBUTE_NAMES.is_reserved(name) || attribute == name,
                "Reserved placeholder {placeholder} bound to {attribute}"
            );
        }
    }
}

/// Milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(i64::MIN);

impl Timestamp {
    /// Current wall-clock time, strictly greater than any value previously
    /// returned in this process
    pub fn now() -> Self {
        let wall = Utc::now().timestamp_millis();
        let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
        loop {
            let next = wall.max(last.saturating_add(1));
            match LAST_TIMESTAMP.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next),
                Err(actual) => last = actual,
            }
        }
    }

    /// Wrap a raw millisecond count
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// The raw millisecond count
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Read a timestamp back from a decoded attribute
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_i64().map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Timestamp> for Value {
    fn from(timestamp: Timestamp) -> Self {
        Value::from(timestamp.0)
    }
}

/// Bookkeeping attributes of a stored item
#[derive(Clone, Debug, PartialEq)]
pub struct Meta {
    /// Creation timestamp
    pub created: Timestamp,
    /// Partition key
    pub partition_key: String,
    /// Sort key
    pub sort_key: String,
    /// Last update timestamp
    pub updated: Timestamp,
}

impl Meta {
    /// Read the four reserved attributes from a decoded item
    ///
    /// Returns `None` if any of them is missing or has the wrong type.
    pub fn from_item(item: &Item) -> Option<Self> {
        let names = &ATTRIBUTE_NAMES;
        Some(Self {
            created: item.get(names.created).and_then(Timestamp::from_value)?,
            partition_key: item.get(names.partition_key)?.as_str()?.to_string(),
            sort_key: item.get(names.sort_key)?.as_str()?.to_string(),
            updated: item.get(names.updated).and_then(Timestamp::from_value)?,
        })
    }
}

/// Build a key from the reserved partition and sort key attributes
pub fn primary_key(partition_key: impl Into<Value>, sort_key: Option<Value>) -> Key {
    let mut key = Key::new();
    let _ = key.insert(
        ATTRIBUTE_NAMES.partition_key.to_string(),
        partition_key.into(),
    );
    if let Some(sort_key) = sort_key {
        let _ = key.insert(ATTRIBUTE_NAMES.sort_key.to_string(), sort_key);
    }
    key
}

/// Stamp creation and update timestamps on an item about to be put
///
/// Attributes already present are kept verbatim, so stamping an already
/// stamped item changes nothing.
pub fn apply_on_put(mut item: Item) -> Item {
    let timestamp = Timestamp::now();
    let _ = item
        .entry(ATTRIBUTE_NAMES.created.to_string())
        .or_insert_with(|| Value::from(timestamp));
    let _ = item
        .entry(ATTRIBUTE_NAMES.updated.to_string())
        .or_insert_with(|| Value::from(timestamp));
    item
}

/// Update expression parts after metadata injection
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateParts {
    /// Rendered update expression
    pub update_expression: String,
    /// Expression attribute names
    pub expression_attribute_names: HashMap<String, String>,
    /// Expression attribute values, native form
    pub expression_attribute_values: Item,
}

/// Inject an update-timestamp assignment into an update expression
///
/// The `#_u` name binding always points at the reserved attribute. A value
/// the caller bound to `:_u` is kept; otherwise the current timestamp is
/// bound. The assignment is added to the SET clause (a new one is prepended
/// when there is none) unless the caller already assigns the attribute,
/// directly, through a placeholder of their own, or through `#_u`.
pub fn apply_on_update(
    update_expression: Option<&str>,
    expression_attribute_names: Option<HashMap<String, String>>,
    expression_attribute_values: Option<Item>,
) -> Result<UpdateParts, Error> {
    let names = &ATTRIBUTE_NAMES;
    let mut attribute_names = expression_attribute_names.unwrap_or_default();
    let mut attribute_values = expression_attribute_values.unwrap_or_default();
    let mut expression: UpdateExpression = update_expression.unwrap_or_default().parse()?;

    let name_placeholder = names.updated_name_placeholder();
    let value_placeholder = names.updated_value_placeholder();

    // `#_u` resolves to the reserved attribute whatever the caller bound it to
    let mut bindings = attribute_names.clone();
    let _ = bindings.insert(name_placeholder.clone(), names.updated.to_string());

    let inject = !expression.assigns(names.updated, &bindings);
    if inject {
        expression.push_set(&format!("{name_placeholder} = {value_placeholder}"));
    }
    if inject || expression.references(&name_placeholder) {
        let _ = attribute_names.insert(name_placeholder, names.updated.to_string());
    }
    if inject || expression.references(&value_placeholder) {
        let _ = attribute_values
            .entry(value_placeholder)
            .or_insert_with(|| Value::from(Timestamp::now()));
    }

    Ok(UpdateParts {
        update_expression: expression.to_string(),
        expression_attribute_names: attribute_names,
        expression_attribute_values: attribute_values,
    })
}
