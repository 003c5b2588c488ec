//! The dot-path tree: an insertion-ordered map addressable by composite keys.
//!
//! A composite key like `"basic.relax.fmax"` is split on the separator and
//! walked level by level. Reads require every intermediate level to already
//! be a nested map. Writes create missing intermediate maps on demand, with
//! one uniform rule for every leading segment: create if absent, reuse an
//! existing map, and treat a plain value sitting mid-path as a conflict
//! (an error in strict mode, replaced otherwise).
//!
//! Strict mode (on by default) also protects the final segment: assigning
//! over an existing nested map fails with
//! [`StrictOverwrite`](DotfigError::StrictOverwrite) instead of silently
//! discarding a whole sub-tree.
//!
//! Writes are not transactional in principle: a failing `set` makes no
//! attempt to roll back intermediate maps created along the way. With the
//! uniform segment rule a failure can only occur where the path prefix
//! already existed, so in practice a rejected write leaves the tree as it
//! was.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::DotfigError;
use crate::value::Value;

/// The canonical key separator.
pub const KEY_SEPARATOR: char = '.';

#[derive(Debug, Clone)]
pub struct DotMap {
    entries: IndexMap<String, Value>,
    separator: char,
    strict: bool,
}

impl Default for DotMap {
    fn default() -> Self {
        DotMap::new()
    }
}

impl DotMap {
    /// An empty map with the default separator, strict mode on.
    pub fn new() -> Self {
        DotMap {
            entries: IndexMap::new(),
            separator: KEY_SEPARATOR,
            strict: true,
        }
    }

    /// An empty map splitting composite keys on `separator`.
    pub fn with_separator(separator: char) -> Self {
        DotMap {
            separator,
            ..DotMap::new()
        }
    }

    /// Enable or disable strict overwrite protection.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Read a value at a composite key.
    ///
    /// Fails with [`DotfigError::KeyNotFound`] if any segment is missing or
    /// an intermediate segment does not hold a nested map.
    pub fn get(&self, key: &str) -> Result<&Value, DotfigError> {
        let segments: Vec<&str> = key.split(self.separator).collect();
        let (leaf, path) = segments
            .split_last()
            .ok_or_else(|| DotfigError::KeyNotFound(key.to_string()))?;

        let mut current = self;
        for segment in path {
            match current.entries.get(*segment) {
                Some(Value::Map(map)) => current = map,
                _ => return Err(DotfigError::KeyNotFound(key.to_string())),
            }
        }
        current
            .entries
            .get(*leaf)
            .ok_or_else(|| DotfigError::KeyNotFound(key.to_string()))
    }

    /// Mutable access to the value at a composite key.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value, DotfigError> {
        let segments: Vec<&str> = key.split(self.separator).collect();
        let (leaf, path) = segments
            .split_last()
            .ok_or_else(|| DotfigError::KeyNotFound(key.to_string()))?;

        let mut current = self;
        for segment in path {
            match current.entries.get_mut(*segment) {
                Some(Value::Map(map)) => current = map,
                _ => return Err(DotfigError::KeyNotFound(key.to_string())),
            }
        }
        current
            .entries
            .get_mut(*leaf)
            .ok_or_else(|| DotfigError::KeyNotFound(key.to_string()))
    }

    /// Assign a value at a composite key, creating intermediate maps as
    /// needed.
    ///
    /// A freshly created (or still empty) deepest intermediate map is seeded
    /// with a single self-named [`Value::Empty`] entry before the final
    /// assignment, so new branches are never observably empty mid-write.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), DotfigError> {
        self.set_value(key, value.into())
    }

    pub(crate) fn set_value(&mut self, key: &str, value: Value) -> Result<(), DotfigError> {
        let strict = self.strict;
        let segments: Vec<String> = key.split(self.separator).map(str::to_string).collect();
        let (leaf, path) = match segments.split_last() {
            Some(split) => split,
            None => return Err(DotfigError::KeyNotFound(key.to_string())),
        };

        let mut current = self;
        for segment in path {
            current = current.descend(segment, key)?;
        }

        if let Some(parent) = path.last()
            && current.entries.is_empty()
        {
            current.entries.insert(parent.clone(), Value::Empty);
        }

        if strict && matches!(current.entries.get(leaf.as_str()), Some(Value::Map(_))) {
            return Err(DotfigError::StrictOverwrite {
                key: key.to_string(),
            });
        }
        current.entries.insert(leaf.clone(), value);
        Ok(())
    }

    /// Create-or-reuse the nested map at a composite path.
    ///
    /// Unlike [`set`](Self::set), an existing map at the final segment is
    /// reused rather than rejected, so callers can merge into it.
    pub fn ensure_table(&mut self, key: &str) -> Result<&mut DotMap, DotfigError> {
        let segments: Vec<String> = key.split(self.separator).map(str::to_string).collect();
        let mut current = self;
        for segment in &segments {
            current = current.descend(segment, key)?;
        }
        Ok(current)
    }

    /// One step of the ensure-path walk. Absent segments get a fresh map;
    /// existing maps are reused; a plain value is a conflict in strict mode
    /// and is replaced otherwise.
    fn descend(&mut self, segment: &str, key: &str) -> Result<&mut DotMap, DotfigError> {
        let replace = match self.entries.get(segment) {
            None => true,
            Some(Value::Map(_)) => false,
            Some(_) if self.strict => {
                return Err(DotfigError::PathConflict {
                    key: key.to_string(),
                    segment: segment.to_string(),
                });
            }
            Some(_) => true,
        };

        if replace {
            let child = DotMap {
                entries: IndexMap::new(),
                separator: self.separator,
                strict: self.strict,
            };
            self.entries.insert(segment.to_string(), Value::Map(child));
        }
        match self.entries.get_mut(segment) {
            Some(Value::Map(map)) => Ok(map),
            _ => Err(DotfigError::KeyNotFound(key.to_string())),
        }
    }

    /// Insert at a single level, without composite-key splitting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a single-level entry.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Single-level membership test.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Single-level lookup, no path splitting.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON rendering of the whole tree, placeholders included (as `null`).
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.entries {
            object.insert(key.clone(), value.to_json());
        }
        serde_json::Value::Object(object)
    }

    /// Like [`to_json`](Self::to_json) but with `Empty` placeholder entries
    /// left out, recursively. Used for inline rendering, where a placeholder
    /// would read back as a real `null`.
    pub(crate) fn to_json_filtered(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.entries {
            match value {
                Value::Empty => {}
                Value::Map(map) => {
                    object.insert(key.clone(), map.to_json_filtered());
                }
                other => {
                    object.insert(key.clone(), other.to_json());
                }
            }
        }
        serde_json::Value::Object(object)
    }
}

impl PartialEq for DotMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Equality against a plain JSON object. `Empty` placeholder entries are
/// ignored on this side, since plain data has no way to express them.
impl PartialEq<serde_json::Value> for DotMap {
    fn eq(&self, other: &serde_json::Value) -> bool {
        let Some(object) = other.as_object() else {
            return false;
        };
        let real: Vec<(&String, &Value)> = self
            .entries
            .iter()
            .filter(|(_, v)| !v.is_empty_marker())
            .collect();
        if real.len() != object.len() {
            return false;
        }
        real.iter()
            .all(|(key, value)| object.get(*key).is_some_and(|json| *value == json))
    }
}

impl<'a> IntoIterator for &'a DotMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for DotMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = DotMap::new();
        for (key, value) in iter {
            map.entries.insert(key, value);
        }
        map
    }
}

/// Composite-key read access.
///
/// # Panics
///
/// Panics if the key does not resolve. Use [`DotMap::get`] for fallible
/// access.
impl std::ops::Index<&str> for DotMap {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Serialize for DotMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_at_growing_depth() {
        // deepening the same path turns a leaf into a map at every step,
        // which only a relaxed tree allows
        let mut map = DotMap::new().strict(false);
        let mut key = String::from("a");
        map.set(&key, 0).unwrap();

        for (i, segment) in ["b", "c", "d"].iter().enumerate() {
            key = format!("{key}.{segment}");
            map.set(&key, (i + 1) as i64).unwrap();
            assert_eq!(map.get(&key).unwrap(), &Value::Integer((i + 1) as i64));
        }
    }

    #[test]
    fn strict_tree_rejects_deepening_through_a_leaf() {
        let mut map = DotMap::new();
        map.set("a", 0).unwrap();
        let err = map.set("a.b", 1).unwrap_err();
        assert!(
            matches!(err, DotfigError::PathConflict { key, segment }
                if key == "a.b" && segment == "a")
        );
    }

    #[test]
    fn intermediate_segments_resolve_to_maps() {
        let mut map = DotMap::new();
        map.set("a.b.c.d", "sth").unwrap();

        assert!(map.get("a").unwrap().is_map());
        assert!(map.get("a.b").unwrap().is_map());
        assert!(map.get("a.b.c").unwrap().is_map());
        assert_eq!(map.get("a.b.c.d").unwrap(), &Value::String("sth".into()));
    }

    #[test]
    fn get_missing_segment_fails() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        assert!(matches!(
            map.get("a.x"),
            Err(DotfigError::KeyNotFound(k)) if k == "a.x"
        ));
    }

    #[test]
    fn get_through_leaf_fails() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        // b is a leaf, not a map to descend through
        assert!(matches!(map.get("a.b.c"), Err(DotfigError::KeyNotFound(_))));
    }

    #[test]
    fn strict_protects_existing_subtree() {
        let mut map = DotMap::new();
        map.set("a.b.c", 1).unwrap();
        let err = map.set("a.b", "flat").unwrap_err();
        assert!(matches!(err, DotfigError::StrictOverwrite { key } if key == "a.b"));
        // sub-tree untouched
        assert_eq!(map.get("a.b.c").unwrap(), &Value::Integer(1));
    }

    #[test]
    fn relaxed_mode_replaces_subtree() {
        let mut map = DotMap::new().strict(false);
        map.set("a.b.c", 1).unwrap();
        map.set("a.b", "flat").unwrap();
        assert_eq!(map.get("a.b").unwrap(), &Value::String("flat".into()));
        assert!(map.get("a.b.c").is_err());
    }

    #[test]
    fn leaf_mid_path_conflicts_in_strict_mode() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        let err = map.set("a.b.c", 2).unwrap_err();
        assert!(
            matches!(err, DotfigError::PathConflict { key, segment }
                if key == "a.b.c" && segment == "b")
        );
    }

    #[test]
    fn leaf_mid_path_replaced_when_relaxed() {
        let mut map = DotMap::new().strict(false);
        map.set("a.b", 1).unwrap();
        map.set("a.b.c", 2).unwrap();
        assert_eq!(map.get("a.b.c").unwrap(), &Value::Integer(2));
    }

    #[test]
    fn fresh_branch_is_seeded_with_placeholder() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();

        let a = map.get("a").unwrap().as_map().unwrap();
        assert_eq!(a.value("a"), Some(&Value::Empty));
        assert_eq!(a.value("b"), Some(&Value::Integer(1)));
    }

    #[test]
    fn only_deepest_intermediate_is_seeded() {
        let mut map = DotMap::new();
        map.set("a.b.c.d", "x").unwrap();

        let a = map.get("a").unwrap().as_map().unwrap();
        let b = map.get("a.b").unwrap().as_map().unwrap();
        let c = map.get("a.b.c").unwrap().as_map().unwrap();
        assert!(a.value("a").is_none());
        assert!(b.value("b").is_none());
        assert_eq!(c.value("c"), Some(&Value::Empty));
    }

    #[test]
    fn single_segment_key_never_seeds() {
        let mut map = DotMap::new();
        map.set("a", 1).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn sibling_keys_survive_nested_writes() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        map.set("a.c", 2).unwrap();
        map.set("a.d", "e").unwrap();
        assert_eq!(map.get("a.b").unwrap(), &Value::Integer(1));
        assert_eq!(map.get("a.c").unwrap(), &Value::Integer(2));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut map = DotMap::new();
        map.set("z", 1).unwrap();
        map.set("a", 2).unwrap();
        map.set("m", 3).unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn custom_separator() {
        let mut map = DotMap::with_separator('/');
        map.set("a/b", 1).unwrap();
        assert_eq!(map.get("a/b").unwrap(), &Value::Integer(1));
        // a dot is an ordinary key character here
        map.set("x.y", 2).unwrap();
        assert_eq!(map.value("x.y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn ensure_table_reuses_existing_map() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        map.ensure_table("a").unwrap().insert("c", 2);
        assert_eq!(map.get("a.b").unwrap(), &Value::Integer(1));
        assert_eq!(map.get("a.c").unwrap(), &Value::Integer(2));
    }

    #[test]
    fn ensure_table_creates_missing_path() {
        let mut map = DotMap::new();
        let sub = map.ensure_table("x.y").unwrap();
        assert!(sub.is_empty());
        assert!(map.get("x.y").unwrap().is_map());
    }

    #[test]
    fn equality_with_json_mapping() {
        let mut map = DotMap::new();
        map.set("a.b", 1).unwrap();
        map.set("a.c", true).unwrap();

        // the placeholder seeded under "a" is ignored by JSON equality
        let reference = serde_json::json!({"a": {"b": 1, "c": true}});
        assert_eq!(map, reference);
        assert_ne!(map, serde_json::json!({"a": {"b": 1}}));
    }

    #[test]
    fn maps_with_same_entries_are_equal() {
        let mut a = DotMap::new();
        a.set("x.y", 1).unwrap();
        let mut b = DotMap::new();
        b.set("x.y", 1).unwrap();
        assert_eq!(a, b);

        b.set("x.z", 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn index_reads_composite_keys() {
        let mut map = DotMap::new();
        map.set("a.b", 42).unwrap();
        assert_eq!(map["a.b"], Value::Integer(42));
    }

    #[test]
    #[should_panic(expected = "Key not found")]
    fn index_panics_on_missing_key() {
        let map = DotMap::new();
        let _ = &map["nope"];
    }

    #[test]
    fn serializes_to_json_object() {
        let mut map = DotMap::new();
        map.set("sec.key", "v").unwrap();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["sec"]["key"], serde_json::json!("v"));
        // placeholder serializes as null, like the reader-facing dump format
        assert_eq!(json["sec"]["sec"], serde_json::Value::Null);
    }

    #[test]
    fn rejected_write_leaves_tree_unchanged() {
        let mut map = DotMap::new();
        map.set("a.b.c", 1).unwrap();
        let before = map.clone();
        assert!(map.set("a.b", 5).is_err());
        assert!(map.set("a.b.c.d", 2).is_err());
        assert_eq!(map, before);
    }
}
