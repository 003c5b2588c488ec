//! Multi-value accumulation for repeated keys within one section.
//!
//! While a section is being read in multi-value mode, every raw value is a
//! list of its physical source lines. Inserting under a key that already
//! exists appends the new lines after the stored ones instead of replacing
//! them, so a key repeated across duplicate entries collects into one
//! ordered list. This type only backs the raw reading stage; it never
//! appears in an assembled configuration.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiMap {
    entries: IndexMap<String, Vec<String>>,
}

impl MultiMap {
    pub fn new() -> Self {
        MultiMap::default()
    }

    /// Store `values` under `key`, appending to any existing entries
    /// (old entries first).
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(existing) => existing.extend(values),
            None => {
                self.entries.insert(key, values);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Mutable access to the accumulated entries, used to extend the most
    /// recent value with continuation lines.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a MultiMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
