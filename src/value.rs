use std::collections::BTreeMap;
use std::fmt;

/// A native item: attribute name to value
///
/// Ordered so that logs and equality checks are deterministic.
pub type Item = BTreeMap<String, Value>;

/// A key is the subset of an item's attributes that addresses it uniquely
pub type Key = Item;

/// A native attribute value
///
/// Mirrors the store's attribute grammar: scalars, nested maps and lists.
/// There is no "undefined" variant; an attribute that should not be
/// stored is simply absent from its [`Item`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Explicit, stored null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Number scalar, kept as decimal text
    Number(Number),
    /// String scalar
    String(String),
    /// Binary scalar
    Binary(Vec<u8>),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested map
    Map(Item),
}

/// A decimal number as carried on the wire
///
/// The text is preserved verbatim so that a decoded number encodes back to
/// the exact same representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Wrap decimal text without validating it
    ///
    /// Validation happens when the value is encoded.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The decimal text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse as a signed integer
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Parse as a float
    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// Whether the text is a finite decimal the store can hold
    pub fn is_valid(&self) -> bool {
        self.0.parse::<f64>().map(f64::is_finite).unwrap_or(false)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! impl_number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number(n.to_string())
                }
            }

            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl Value {
    /// Returns the string if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a number that parses as one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested map if this is a map value
    pub fn as_map(&self) -> Option<&Item> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the elements if this is a list value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Whether this is an explicit null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Item> for Value {
    fn from(map: Item) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Build an [`Item`] from `name => value` pairs
///
/// ```
/// use ddb_access::{item, Value};
///
/// let item = item! { "_pk" => "user#1", "age" => 42, "tags" => vec![Value::from("a")] };
/// assert_eq!(item["age"].as_i64(), Some(42));
/// ```
#[macro_export]
macro_rules! item {
    () => {
        $crate::Item::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut item = $crate::Item::new();
        $(
            let _ = item.insert(::std::string::ToString::to_string(&$name), $crate::Value::from($value));
        )+
        item
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keeps_text() {
        let n = Number::from_text("1.50");
        assert_eq!(n.as_str(), "1.50");
        assert_eq!(n.as_f64(), Some(1.5));
        assert_eq!(n.as_i64(), None);
    }

    #[test]
    fn test_number_validity() {
        assert!(Number::from(42).is_valid());
        assert!(Number::from(-0.25).is_valid());
        assert!(!Number::from(f64::NAN).is_valid());
        assert!(!Number::from(f64::INFINITY).is_valid());
        assert!(!Number::from_text("").is_valid());
        assert!(!Number::from_text("abc").is_valid());
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    }

    #[test]
    fn test_item_macro() {
        let item = item! { "a" => 1, "b" => "two", "c" => true };
        assert_eq!(item.len(), 3);
        assert_eq!(item["a"].as_i64(), Some(1));
        assert_eq!(item["b"].as_str(), Some("two"));
        assert_eq!(item["c"].as_bool(), Some(true));
        assert!(item!().is_empty());
    }
}
