//! Insertion-ordered list of named entities.

use std::ops::Index;

use rustc_hash::FxHashMap;

/// An entity with a (possibly non-unique) name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Entities in document order, addressable by name.
///
/// Names in TMX documents are not unique. When a name is already taken the
/// new entity is keyed as `"{name} ({n})"` with the smallest `n >= 1` whose
/// key is still free, the same way Tiled itself disambiguates. Looking up the
/// plain name therefore always yields the first entity that carried it, and
/// iteration yields every entity in insertion order.
///
/// ```
/// use tmxkit_map::{Named, NamedList};
///
/// struct Layer(&'static str);
/// impl Named for Layer {
///     fn name(&self) -> &str { self.0 }
/// }
///
/// let mut list = NamedList::new();
/// list.push(Layer("Ground"));
/// list.push(Layer("Ground"));
///
/// assert_eq!(list.keys().collect::<Vec<_>>(), ["Ground", "Ground (1)"]);
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NamedList<T> {
    items: Vec<T>,
    keys: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: Named> NamedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return the key it was stored under.
    pub fn push(&mut self, item: T) -> &str {
        let key = self.free_key(item.name());
        let position = self.items.len();

        self.index.insert(key.clone(), position);
        self.keys.push(key);
        self.items.push(item);

        &self.keys[position]
    }

    fn free_key(&self, name: &str) -> String {
        if !self.index.contains_key(name) {
            return name.to_string();
        }
        (1u32..)
            .map(|n| format!("{name} ({n})"))
            .find(|key| !self.index.contains_key(key))
            .unwrap_or_else(|| name.to_string())
    }
}

impl<T> NamedList<T> {
    /// Look up an entity by its key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// Look up an entity by insertion position.
    pub fn get_index(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Insertion position of the entity stored under `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Check if an entity is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// `(key, entity)` pairs in insertion order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&str, &T)> {
        self.keys.iter().map(String::as_str).zip(self.items.iter())
    }

    /// Entities as a slice, in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Index<usize> for NamedList<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.items[position]
    }
}

impl<'a, T> IntoIterator for &'a NamedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Named> FromIterator<T> for NamedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}
