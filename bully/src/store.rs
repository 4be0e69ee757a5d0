use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
    sync::{PoisonError, RwLock},
};

/// The Key-Value Store every Peer carries around
///
/// The Store plays no role in the election itself.
#[derive(Debug)]
pub struct Store<K = String, V = String> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Store<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
{
    /// Stores the value under the given key, returning the previous value if there was one
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn delete(&self, key: &K) -> Option<V> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A sorted copy of everything currently stored
    pub fn dump(&self) -> BTreeMap<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
