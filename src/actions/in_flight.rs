use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::types::CategoryId;

/// Identity of an action whose simulated round-trip has not completed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InFlightKey {
    /// The create/edit form is being saved.
    Save,
    Delete(CategoryId),
    Toggle(CategoryId),
}

/// Set of in-flight actions shared by every clone of a board.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<InFlightKey>>>,
}

impl InFlight {
    fn keys(&self) -> MutexGuard<'_, HashSet<InFlightKey>> {
        // Single insert/remove calls: a poisoned set is still consistent.
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `key` as in flight. Returns `None` if it already is.
    pub fn acquire(&self, key: InFlightKey) -> Option<InFlightGuard> {
        if !self.keys().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn contains(&self, key: &InFlightKey) -> bool {
        self.keys().contains(key)
    }
}

/// Clears its key when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<InFlightKey>>>,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        keys.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_guard_drops() {
        let in_flight = InFlight::default();
        let key = InFlightKey::Toggle(CategoryId::new("1").unwrap());

        let guard = in_flight.acquire(key.clone()).unwrap();
        assert!(in_flight.contains(&key));
        assert!(in_flight.acquire(key.clone()).is_none());

        drop(guard);
        assert!(!in_flight.contains(&key));
        assert!(in_flight.acquire(key).is_some());
    }

    #[test]
    fn keys_are_per_entity_and_per_action() {
        let in_flight = InFlight::default();
        let one = CategoryId::new("1").unwrap();
        let two = CategoryId::new("2").unwrap();

        let _a = in_flight.acquire(InFlightKey::Toggle(one.clone())).unwrap();
        assert!(in_flight.acquire(InFlightKey::Toggle(two)).is_some());
        assert!(in_flight.acquire(InFlightKey::Delete(one)).is_some());
    }
}
