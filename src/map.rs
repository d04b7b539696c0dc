//! Ordered map type for object-shaped input.
//!
//! [`ValueMap`] wraps an [`IndexMap`] so that decoded objects keep their
//! field order. `Duration` and `Rate` only ever accept a map with a single
//! entry, and an ordered map makes "the first entry" well defined.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scalars::{ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.insert("d".to_string(), Value::from("1s"));
//!
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.get("d").and_then(|v| v.as_str()), Some("1s"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to tagged values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<String, crate::Value>);

impl ValueMap {
    /// Creates an empty `ValueMap`.
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scalars::{ValueMap, Value};
    ///
    /// let mut map = ValueMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes a map that holds exactly one entry and returns its value.
    ///
    /// This is the "single-key object" shape accepted by `Duration` and `Rate`.
    ///
    /// # Errors
    ///
    /// [`Error::NoContent`] for an empty map, [`Error::TooBig`] for more than one entry.
    ///
    /// [`Error::NoContent`]: crate::Error::NoContent
    /// [`Error::TooBig`]: crate::Error::TooBig
    pub fn into_single(self) -> crate::Result<crate::Value> {
        match self.0.len() {
            0 => Err(crate::Error::NoContent),
            1 => self
                .0
                .into_iter()
                .next()
                .map(|(_, value)| value)
                .ok_or(crate::Error::NoContent),
            len => Err(crate::Error::TooBig { len }),
        }
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, crate::Value>> for ValueMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        ValueMap(map.into_iter().collect())
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Value};

    #[test]
    fn test_into_single() {
        let map: ValueMap = vec![("d".to_string(), Value::from("1s"))]
            .into_iter()
            .collect();
        assert_eq!(map.into_single().unwrap(), Value::from("1s"));
    }

    #[test]
    fn test_into_single_arity() {
        assert!(matches!(ValueMap::new().into_single(), Err(Error::NoContent)));

        let mut map = ValueMap::new();
        map.insert("a".to_string(), Value::from(1i64));
        map.insert("b".to_string(), Value::from(2i64));
        assert!(matches!(map.into_single(), Err(Error::TooBig { len: 2 })));
    }

    #[test]
    fn test_insertion_order() {
        let mut map = ValueMap::with_capacity(2);
        map.insert("second".to_string(), Value::Null);
        map.insert("first".to_string(), Value::Null);
        let keys: Vec<_> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["second", "first"]);
    }
}
