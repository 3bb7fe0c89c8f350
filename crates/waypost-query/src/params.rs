//! Parsed query parameters

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Value stored under a query key
///
/// Serializes untagged, so `{"id": "3", "tag": ["a", "b"]}` round-trips
/// through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Key appeared once
    Single(String),
    /// Key appeared several times, in order of appearance
    Multiple(Vec<String>),
}

impl ParamValue {
    /// All values as a slice, one element for [`ParamValue::Single`]
    pub fn as_slice(&self) -> &[String] {
        match self {
            ParamValue::Single(value) => std::slice::from_ref(value),
            ParamValue::Multiple(values) => values,
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.as_slice().first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Add another value, promoting a single value to a sequence
    pub fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = ParamValue::Multiple(vec![first, value]);
            }
            ParamValue::Multiple(values) => values.push(value),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Multiple(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl PartialEq<str> for ParamValue {
    fn eq(&self, other: &str) -> bool {
        matches!(self, ParamValue::Single(value) if value == other)
    }
}

impl PartialEq<&str> for ParamValue {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Insertion-ordered mapping of decoded query keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value but keeping its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add a value under `key`; repeated keys collect into a sequence
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// First value stored under `key`
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ParamValue::first)
    }

    /// Every value stored under `key`, empty when absent
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(ParamValue::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }

    /// Serialize as a `?`-prefixed query string
    pub fn to_query_string(&self) -> String {
        crate::codec::stringify(self)
    }

    /// Compare as query strings would: a one-element sequence equals a single
    /// value and empty sequences count as absent keys.
    pub fn equivalent(&self, other: &Params) -> bool {
        fn populated(params: &Params) -> impl Iterator<Item = (&String, &ParamValue)> {
            params.iter().filter(|(_, value)| !value.is_empty())
        }

        populated(self).count() == populated(other).count()
            && populated(self).all(|(key, value)| other.get_all(key) == value.as_slice())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = indexmap::map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl std::str::FromStr for Params {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::codec::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_collects_repeated_keys() {
        let mut params = Params::new();
        params.append("tag", "a");
        assert_eq!(params.get("tag"), Some(&ParamValue::from("a")));

        params.append("tag", "b");
        params.append("tag", "c");
        assert_eq!(params.get_all("tag"), ["a", "b", "c"]);
        assert_eq!(params.get_first("tag"), Some("a"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut params: Params = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        params.insert("a", "9");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(params.get("a").unwrap(), "9");

        params.remove("b");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn test_missing_key() {
        let params = Params::new();
        assert!(params.get("nope").is_none());
        assert!(params.get_all("nope").is_empty());
        assert!(!params.contains_key("nope"));
    }

    #[test]
    fn test_equivalent() {
        let mut single = Params::new();
        single.insert("id", "3");
        single.insert("empty", Vec::<String>::new());

        let mut wrapped = Params::new();
        wrapped.insert("id", vec!["3"]);

        assert!(single.equivalent(&wrapped));
        assert!(wrapped.equivalent(&single));

        wrapped.insert("other", "x");
        assert!(!single.equivalent(&wrapped));
    }

    #[test]
    fn test_json_shape() {
        let mut params = Params::new();
        params.insert("id", "3");
        params.insert("tag", vec!["a", "b"]);

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"id":"3","tag":["a","b"]}"#);

        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
