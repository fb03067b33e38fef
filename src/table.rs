use crate::{TomlKey, TomlLookupError, TomlValue};

#[cfg(feature = "preserve-order")]
pub(crate) type Map = indexmap::IndexMap<TomlKey, TomlValue>;
#[cfg(not(feature = "preserve-order"))]
pub(crate) type Map = std::collections::BTreeMap<TomlKey, TomlValue>;

/// A TOML table: a mapping from keys to values with unique keys.
///
/// With the default `preserve-order` feature the table remembers insertion
/// order (which, for parsed documents, is source order); without it entries
/// are kept sorted by key.
///
/// Keys are looked up by their string value, so `table.get("key")` finds an
/// entry regardless of how the key was quoted in the source.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TomlTable {
    pub(crate) entries: Map,
}

impl TomlTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the table has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets the value for `key`.
    pub fn get(&self, key: &str) -> Option<&TomlValue> {
        self.entries.get(key)
    }

    /// Gets the value for `key`, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut TomlValue> {
        self.entries.get_mut(key)
    }

    /// Gets the value for `key`, reporting the missing key on failure.
    pub fn try_get(&self, key: &str) -> Result<&TomlValue, TomlLookupError> {
        self.entries
            .get(key)
            .ok_or_else(|| TomlLookupError::MissingKey(key.into()))
    }

    /// Gets the stored key equal to `key`, with its original
    /// representation.
    pub fn get_key(&self, key: &str) -> Option<&TomlKey> {
        self.entries.get_key_value(key).map(|(k, _)| k)
    }

    /// Inserts an entry, returning the previous value for that key, if any.
    ///
    /// When the key was already present, the stored key (and its written
    /// representation) is kept.
    pub fn insert(
        &mut self,
        key: impl Into<TomlKey>,
        value: impl Into<TomlValue>,
    ) -> Option<TomlValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes the entry for `key`, returning its value, if any.
    ///
    /// With `preserve-order`, later entries shift down to close the gap.
    pub fn remove(&mut self, key: &str) -> Option<TomlValue> {
        #[cfg(feature = "preserve-order")]
        {
            self.entries.shift_remove(key)
        }
        #[cfg(not(feature = "preserve-order"))]
        {
            self.entries.remove(key)
        }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates the entries.
    pub fn iter(&self) -> impl Iterator<Item = (&TomlKey, &TomlValue)> {
        self.entries.iter()
    }

    /// Iterates the entries with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TomlKey, &mut TomlValue)> {
        self.entries.iter_mut()
    }

    /// Iterates the keys.
    pub fn keys(&self) -> impl Iterator<Item = &TomlKey> {
        self.entries.keys()
    }

    /// Iterates the values.
    pub fn values(&self) -> impl Iterator<Item = &TomlValue> {
        self.entries.values()
    }

    /// Iterates the values mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut TomlValue> {
        self.entries.values_mut()
    }
}

impl std::ops::Index<&str> for TomlTable {
    type Output = TomlValue;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("no such key in table")
    }
}

impl IntoIterator for TomlTable {
    type Item = (TomlKey, TomlValue);
    #[cfg(feature = "preserve-order")]
    type IntoIter = indexmap::map::IntoIter<TomlKey, TomlValue>;
    #[cfg(not(feature = "preserve-order"))]
    type IntoIter = std::collections::btree_map::IntoIter<TomlKey, TomlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(TomlKey, TomlValue)> for TomlTable {
    fn from_iter<T: IntoIterator<Item = (TomlKey, TomlValue)>>(iter: T) -> Self {
        TomlTable {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut table = TomlTable::new();
        table.insert("title", "TOML Example");
        table.insert("port", 8080i64);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("title").and_then(|v| v.as_string()),
            Some("TOML Example")
        );
        assert!(table.get("missing").is_none());
        assert_eq!(
            table.try_get("missing").unwrap_err(),
            TomlLookupError::MissingKey("missing".into())
        );
    }

    #[test]
    fn lookup_ignores_quoting() {
        let mut table = TomlTable::new();
        let mut key = TomlKey::new("dotted.name");
        key.set_repr("\"dotted.name\"");
        table.insert(key, 1i64);

        assert!(table.contains_key("dotted.name"));
        assert_eq!(
            table.get_key("dotted.name").and_then(|k| k.repr()),
            Some("\"dotted.name\"")
        );
    }

    #[test]
    fn replacing_keeps_original_key_repr() {
        let mut table = TomlTable::new();
        let mut key = TomlKey::new("a");
        key.set_repr("'a'");
        table.insert(key, 1i64);
        let old = table.insert("a", 2i64);

        assert_eq!(old.and_then(|v| v.as_integer()), Some(1));
        assert_eq!(table.get_key("a").and_then(|k| k.repr()), Some("'a'"));
        assert_eq!(table.get("a").and_then(|v| v.as_integer()), Some(2));
    }

    #[cfg(feature = "preserve-order")]
    #[test]
    fn preserves_insertion_order() {
        let mut table = TomlTable::new();
        table.insert("z", 1i64);
        table.insert("a", 2i64);
        let keys: Vec<_> = table.keys().map(|k| k.value().to_string()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
