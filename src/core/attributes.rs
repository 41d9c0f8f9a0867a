//! Attributes of a start tag.
//!
//! Stored as ordered key-value pairs of strings; most COLLADA elements carry
//! only a handful, so the common case stays inline.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::util::{Error, Result};

/// Attribute storage - key-value pairs in document order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: SmallVec<[(String, String); 4]>,
}

impl Attributes {
    /// Create empty attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value. A repeated key keeps its first position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// Get an attribute value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get an attribute as an owned string.
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Get a mandatory attribute, failing with the owning element's name.
    pub fn required(&self, element: &str, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::missing(element, key))
    }

    /// Parse an optional attribute; a missing one yields `None`.
    pub fn parse<T: FromStr>(&self, element: &str, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| Error::invalid(element, raw)),
            None => Ok(None),
        }
    }

    /// Parse a mandatory attribute.
    pub fn parse_required<T: FromStr>(&self, element: &str, key: &str) -> Result<T> {
        let raw = self.required(element, key)?;
        raw.trim().parse::<T>().map_err(|_| Error::invalid(element, raw))
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
