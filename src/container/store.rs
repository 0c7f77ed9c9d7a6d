// Decoded key -> value-history mapping.

use std::collections::HashMap;

/// Every value observed for every key, in file order.
///
/// Keys iterate in order of first appearance. A key that was written several
/// times keeps one entry per record; nothing is merged or overwritten.
#[derive(Debug, Clone, Default)]
pub struct DecodedStore {
    entries: Vec<(String, Vec<Vec<u8>>)>,
    index: HashMap<String, usize>,
}

impl DecodedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the history of `key`.
    pub(crate) fn push(&mut self, key: &str, value: &[u8]) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1.push(value.to_vec()),
            None => {
                self.index.insert(key.to_owned(), self.entries.len());
                self.entries.push((key.to_owned(), vec![value.to_vec()]));
            }
        }
    }

    /// Value history for `key`, oldest first.
    pub fn get(&self, key: &str) -> Option<&[Vec<u8>]> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of stored values across all keys.
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl PartialEq for DecodedStore {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for DecodedStore {}

/// Iterator over `(key, history)` pairs in first-appearance order.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Vec<Vec<u8>>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [Vec<u8>]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a DecodedStore {
    type Item = (&'a str, &'a [Vec<u8>]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_append_only() {
        let mut store = DecodedStore::new();
        store.push("k", &[1]);
        store.push("other", &[9]);
        store.push("k", &[2]);
        store.push("k", &[1]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.value_count(), 4);
        assert_eq!(store.get("k").unwrap(), &[vec![1u8], vec![2u8], vec![1u8]]);
        assert_eq!(store.get("other").unwrap(), &[vec![9u8]]);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn keys_keep_first_appearance_order() {
        let mut store = DecodedStore::new();
        for key in ["zeta", "alpha", "zeta", "mid", "alpha"] {
            store.push(key, b"v");
        }
        let keys: Vec<_> = store.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(store.iter().len(), 3);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut a = DecodedStore::new();
        a.push("x", &[1]);
        a.push("y", &[2]);
        let mut b = DecodedStore::new();
        b.push("y", &[2]);
        b.push("x", &[1]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn empty_values_are_kept() {
        let mut store = DecodedStore::new();
        store.push("k", &[]);
        assert!(store.contains_key("k"));
        assert_eq!(store.get("k").unwrap(), &[Vec::<u8>::new()]);
    }
}
