//! The fork table (C1): a layered mapping supporting local insert,
//! local-only iteration, and whiteout-aware chain lookup.
//!
//! Per spec §9's design note, the parent link is *not* stored inside the
//! table itself -- the table only knows about its own local layer (`back`
//! and `whiteouts`). Chain-aware operations (`get`, `chain_contains`,
//! `remove`) are implemented one level up, by [`crate::scope::ScopeArena`],
//! which walks parent `ScopeId`s and calls the local operations below at
//! each step. This sidesteps a self-referential/`Rc<RefCell<_>>` table
//! while preserving every invariant from spec §4.1/§8.

use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct ForkTable<K, V> {
    back: FxHashMap<K, V>,
    whiteouts: FxHashSet<K>,
}

impl<K, V> Default for ForkTable<K, V> {
    fn default() -> Self {
        ForkTable {
            back: FxHashMap::default(),
            whiteouts: FxHashSet::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> ForkTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into the local layer, clearing any whiteout for `k`.
    /// Returns the prior local value, if any.
    pub fn put(&mut self, k: K, v: V) -> Option<V> {
        self.whiteouts.remove(&k);
        self.back.insert(k, v)
    }

    /// Remove `k` from the local layer only. Returns the prior local value.
    pub fn remove_local(&mut self, k: &K) -> Option<V> {
        self.back.remove(k)
    }

    /// Add a whiteout for `k`, hiding an inherited/outer binding without
    /// touching the parent.
    pub fn whiteout(&mut self, k: K) {
        self.whiteouts.insert(k);
    }

    pub fn is_whiteout(&self, k: &K) -> bool {
        self.whiteouts.contains(k)
    }

    /// Local `contains`: true iff `k` was inserted into this layer.
    pub fn contains_local(&self, k: &K) -> bool {
        self.back.contains_key(k)
    }

    pub fn get_local(&self, k: &K) -> Option<&V> {
        self.back.get(k)
    }

    /// Local-only iteration, per spec §4.1: the iterator yields only this
    /// layer's entries, never the parent chain's.
    pub fn iter_local(&self) -> impl Iterator<Item = (&K, &V)> {
        self.back.iter()
    }

    pub fn len_local(&self) -> usize {
        self.back.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_clears_whiteout() {
        let mut t: ForkTable<String, i32> = ForkTable::new();
        t.whiteout("x".to_string());
        assert!(t.is_whiteout(&"x".to_string()));
        t.put("x".to_string(), 1);
        assert!(!t.is_whiteout(&"x".to_string()));
        assert_eq!(t.get_local(&"x".to_string()), Some(&1));
    }

    #[test]
    fn remove_local_only_affects_back() {
        let mut t: ForkTable<String, i32> = ForkTable::new();
        t.put("x".to_string(), 1);
        assert_eq!(t.remove_local(&"x".to_string()), Some(1));
        assert!(!t.contains_local(&"x".to_string()));
    }

    #[test]
    fn iter_local_yields_only_back() {
        let mut t: ForkTable<String, i32> = ForkTable::new();
        t.put("a".to_string(), 1);
        t.put("b".to_string(), 2);
        let mut names: Vec<_> = t.iter_local().map(|(k, _)| k.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
