use std::collections::HashMap;

/// Anything stored in a [`Registry`] is addressed by a stable string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Insertion-ordered collection keyed by entity id.
///
/// Lookup goes through a hash index; iteration follows registration order so
/// enumeration is stable across runs and platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item`, replacing (in place) any entry with the same id.
    /// Returns the replaced entry.
    pub fn insert(&mut self, item: T) -> Option<T> {
        if let Some(&slot) = self.index.get(item.key()) {
            return Some(std::mem::replace(&mut self.entries[slot], item));
        }
        self.index.insert(item.key().to_string(), self.entries.len());
        self.entries.push(item);
        None
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&slot) => Some(&mut self.entries[slot]),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Keyed::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Keyed> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut registry = Self::new();
        for item in iter {
            registry.insert(item);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::{Keyed, Registry};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: &'static str,
        value: u32,
    }

    impl Keyed for Entry {
        fn key(&self) -> &str {
            self.id
        }
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let registry: Registry<Entry> = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|id| Entry { id, value: 0 })
            .collect();

        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn reinserting_an_id_replaces_in_place() {
        let mut registry = Registry::new();
        registry.insert(Entry { id: "a", value: 1 });
        registry.insert(Entry { id: "b", value: 2 });

        let replaced = registry.insert(Entry { id: "a", value: 9 });

        assert_eq!(replaced, Some(Entry { id: "a", value: 1 }));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(registry.get("a").map(|entry| entry.value), Some(9));
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let mut registry: Registry<Entry> = Registry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.get_mut("missing").is_none());
        assert!(!registry.contains("missing"));
        assert!(registry.is_empty());
    }
}
