use crate::key::{Key, Pair};
use std::collections::HashMap;

/// 按插入顺序保存的键值映射，流水线收集的结果。
///
/// 重复写入同一个键时，值被替换，但位置保持为该键首次出现的位置。
#[derive(Debug, Clone, PartialEq)]
pub struct PairMap<V> {
    entries: Vec<Pair<V>>,
    index: HashMap<Key, usize>,
}

impl<V> PairMap<V> {
    pub fn new() -> Self {
        PairMap { entries: Vec::new(), index: HashMap::new() }
    }

    /// 写入数据，如果键已经存在则返回被替换的旧值。
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Key) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_vec(self) -> Vec<Pair<V>> {
        self.entries
    }
}

impl<V> Default for PairMap<V> {
    fn default() -> Self {
        PairMap::new()
    }
}

impl<V> FromIterator<Pair<V>> for PairMap<V> {
    fn from_iter<T: IntoIterator<Item = Pair<V>>>(iter: T) -> Self {
        let mut map = PairMap::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<Pair<V>> for PairMap<V> {
    fn extend<T: IntoIterator<Item = Pair<V>>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> IntoIterator for PairMap<V> {
    type Item = Pair<V>;
    type IntoIter = std::vec::IntoIter<Pair<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
