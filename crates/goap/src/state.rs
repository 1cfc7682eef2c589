//! Symbolic world and goal states.

use std::collections::BTreeMap;
use std::fmt;

/// Set of uniquely keyed boolean facts.
///
/// Keys are unique: [`WorldState::set`] replaces an existing value rather
/// than adding a second entry. Iteration follows key order, so two states
/// with the same facts always compare and print identically.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WorldState<K: Ord> {
    facts: BTreeMap<K, bool>,
}

/// Goal states share the world-state representation: the facts a plan must make true.
pub type GoalState<K> = WorldState<K>;

impl<K: Ord> Default for WorldState<K> {
    fn default() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> WorldState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`WorldState::set`].
    pub fn with(mut self, key: K, value: bool) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, returning the value it replaced.
    pub fn set(&mut self, key: K, value: bool) -> Option<bool> {
        self.facts.insert(key, value)
    }

    pub fn get(&self, key: K) -> Option<bool> {
        self.facts.get(&key).copied()
    }

    pub fn remove(&mut self, key: K) -> Option<bool> {
        self.facts.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, bool)> + '_ {
        self.facts.iter().map(|(key, value)| (*key, *value))
    }

    /// Whether every fact in `required` is present here with the same value.
    ///
    /// A fact missing from `self` never matches, even when `required` asks
    /// for `false`.
    pub fn satisfies(&self, required: &WorldState<K>) -> bool {
        required
            .facts
            .iter()
            .all(|(key, value)| self.facts.get(key) == Some(value))
    }

    /// Successor state: `self` with every fact of `effects` written over it.
    pub fn apply(&self, effects: &WorldState<K>) -> Self {
        let mut next = self.clone();
        next.extend(effects.iter());
        next
    }
}

impl<K: Ord + Copy> FromIterator<(K, bool)> for WorldState<K> {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut state = Self::new();
        state.extend(iter);
        state
    }
}

impl<K: Ord + Copy> Extend<(K, bool)> for WorldState<K> {
    fn extend<I: IntoIterator<Item = (K, bool)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for WorldState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.facts.iter()).finish()
    }
}
