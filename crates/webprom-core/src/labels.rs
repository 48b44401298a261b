//! Time-series identity keys.
//!
//! A `LabelSet` is flattened into a key-sorted vector so two sets built from
//! the same pairs in different order compare and hash equal. Keys are unique;
//! a later pair with the same key replaces the earlier one.

use std::collections::BTreeMap;
use std::fmt;

/// Label name the exposition format reserves for histogram bucket bounds.
pub const BUCKET_LABEL: &str = "le";

/// Valid, non-reserved Prometheus label name: `[a-zA-Z_][a-zA-Z0-9_]*`,
/// not `__`-prefixed and not `le`.
pub fn is_label_name(s: &str) -> bool {
    let mut chars = s.chars();
    s != BUCKET_LABEL
        && !s.starts_with("__")
        && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    /// Empty label set (a metric's single unlabeled series).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from arbitrary pairs. Duplicate keys: last one wins.
    pub fn new<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            pairs: map.into_iter().collect(),
        }
    }

    /// New set with `overrides` layered on top; override keys win.
    pub fn merge(&self, overrides: &LabelSet) -> LabelSet {
        if overrides.is_empty() {
            return self.clone();
        }
        LabelSet::new(
            self.pairs
                .iter()
                .chain(overrides.pairs.iter())
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// New set with one extra pair; replaces an existing value for `key`.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> LabelSet {
        self.merge(&LabelSet::new([(key.into(), value.into())]))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| self.pairs[i].1.as_str())
    }

    /// Label names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True when both sets carry exactly the same label names.
    pub fn same_keys(&self, other: &LabelSet) -> bool {
        self.keys().eq(other.keys())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        LabelSet::new(iter)
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v:?}")?;
        }
        f.write_str("}")
    }
}
