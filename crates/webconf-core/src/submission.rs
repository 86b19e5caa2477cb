//! Submitted form data.

use std::collections::HashMap;

/// Raw values from one form submission, keyed by parameter id.
///
/// Parsing the HTTP request is up to the web layer; this only carries the
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    values: HashMap<String, String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Set the value for `id`, replacing an earlier one.
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Submitted ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
