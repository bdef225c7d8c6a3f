//! Two-phase node state and the fail-fast claim guard.
//!
//! A shared list node answers queries from one of two states:
//!
//! - **Immaterial**: holds the recipe (upstream handles, callbacks) and runs
//!   the computation on first demand.
//! - **Material**: holds the resolved value and answers from it; the recipe
//!   is dropped, releasing the upstream.
//!
//! The swap happens exactly once. Beginning the computation requires
//! winning a [`Claim`]: a second caller arriving while the first is still
//! computing (another thread, or the computation re-entering its own node)
//! fails immediately with [`SequenceError::ConcurrentModification`] instead
//! of waiting. A failed computation releases the claim and leaves the state
//! Immaterial, so a later non-overlapping call can still succeed.
//!
//! [`SlotCache`] applies the same rules independently per index.

use crate::config;
use crate::error::{Result, SequenceError};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{trace, warn};

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}

/// Single-winner claim over a one-time computation.
pub(crate) struct Claim {
    flag: AtomicBool,
    node: &'static str,
}

/// Releases its [`Claim`] when dropped.
pub(crate) struct ClaimGuard<'a> {
    flag: &'a AtomicBool,
}

impl Claim {
    pub(crate) const fn new(node: &'static str) -> Self {
        Self {
            flag: AtomicBool::new(false),
            node,
        }
    }

    pub(crate) fn node(&self) -> &'static str {
        self.node
    }

    /// Win the claim or fail fast.
    pub(crate) fn acquire(&self) -> Result<ClaimGuard<'_>> {
        if self
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(node = self.node, "rejected concurrent materialization");
            return Err(SequenceError::ConcurrentModification { node: self.node });
        }
        Ok(ClaimGuard { flag: &self.flag })
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub(crate) enum State<P, R> {
    Immaterial(P),
    Material(R),
}

/// A node state swapped from Immaterial to Material exactly once.
pub(crate) struct StateCell<P, R> {
    state: RwLock<State<P, R>>,
    claim: Claim,
}

impl<P: Clone, R: Clone> StateCell<P, R> {
    pub(crate) fn new(node: &'static str, recipe: P) -> Self {
        Self {
            state: RwLock::new(State::Immaterial(recipe)),
            claim: Claim::new(node),
        }
    }

    /// The resolved value, if the swap already happened.
    pub(crate) fn material(&self) -> Option<R> {
        match &*read(&self.state) {
            State::Material(r) => Some(r.clone()),
            State::Immaterial(_) => None,
        }
    }

    /// A copy of the recipe, if the swap has not happened yet.
    pub(crate) fn recipe(&self) -> Option<P> {
        match &*read(&self.state) {
            State::Immaterial(p) => Some(p.clone()),
            State::Material(_) => None,
        }
    }

    /// Answer from the Material state, or claim and run `compute` on the recipe.
    pub(crate) fn resolve<F>(&self, compute: F) -> Result<R>
    where
        F: FnOnce(P) -> Result<R>,
    {
        if let Some(resolved) = self.material() {
            return Ok(resolved);
        }
        let _guard = self.claim.acquire()?;
        let recipe = match &*read(&self.state) {
            State::Material(r) => return Ok(r.clone()),
            State::Immaterial(p) => p.clone(),
        };
        let resolved = compute(recipe)?;
        *write(&self.state) = State::Material(resolved.clone());
        trace!(node = self.claim.node(), "materialized");
        Ok(resolved)
    }
}

enum SlotStore<V> {
    Dense(Vec<Option<V>>),
    Sparse(HashMap<usize, V>),
}

struct Slots<V> {
    store: SlotStore<V>,
    in_flight: HashSet<usize>,
}

/// Per-index memo: each slot moves from Immaterial to Material independently.
///
/// Dense (array-backed) when the size is known and within
/// [`config::Config::map_array_threshold`], sparse (hash-backed) otherwise.
/// A sparse cache is promoted to dense once every slot of a known size is filled.
pub(crate) struct SlotCache<V> {
    slots: Mutex<Slots<V>>,
    node: &'static str,
}

impl<V: Clone> SlotCache<V> {
    pub(crate) fn new(node: &'static str, size: Option<usize>) -> Self {
        let store = match size {
            Some(n) if n <= config::current().map_array_threshold => SlotStore::Dense(Vec::new()),
            _ => SlotStore::Sparse(HashMap::new()),
        };
        Self {
            slots: Mutex::new(Slots {
                store,
                in_flight: HashSet::new(),
            }),
            node,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_dense(&self) -> bool {
        matches!(lock(&self.slots).store, SlotStore::Dense(_))
    }

    #[cfg(test)]
    pub(crate) fn get(&self, index: usize) -> Option<V> {
        match &lock(&self.slots).store {
            SlotStore::Dense(slots) => slots.get(index).cloned().flatten(),
            SlotStore::Sparse(map) => map.get(&index).cloned(),
        }
    }

    /// Answer slot `index` from the cache or claim it and run `compute`.
    ///
    /// `size` is the definite size of the indexed domain when known; it
    /// drives promotion of a sparse cache to dense.
    pub(crate) fn get_or_compute<F>(
        &self,
        index: usize,
        size: Option<usize>,
        compute: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        {
            let mut slots = lock(&self.slots);
            let cached = match &slots.store {
                SlotStore::Dense(slots) => slots.get(index).cloned().flatten(),
                SlotStore::Sparse(map) => map.get(&index).cloned(),
            };
            if let Some(v) = cached {
                return Ok(v);
            }
            if !slots.in_flight.insert(index) {
                warn!(node = self.node, index, "rejected concurrent slot materialization");
                return Err(SequenceError::ConcurrentModification { node: self.node });
            }
        }
        let computed = compute();
        let mut slots = lock(&self.slots);
        slots.in_flight.remove(&index);
        let value = computed?;
        slots.store.insert(index, value.clone());
        if let Some(n) = size {
            slots.store.promote_if_complete(n, self.node);
        }
        Ok(value)
    }
}

impl<V> SlotStore<V> {
    fn insert(&mut self, index: usize, value: V) {
        match self {
            SlotStore::Dense(slots) => {
                if slots.len() <= index {
                    slots.resize_with(index + 1, || None);
                }
                slots[index] = Some(value);
            }
            SlotStore::Sparse(map) => {
                map.insert(index, value);
            }
        }
    }

    fn promote_if_complete(&mut self, size: usize, node: &'static str) {
        let SlotStore::Sparse(map) = self else {
            return;
        };
        if map.len() != size || map.keys().any(|&k| k >= size) {
            return;
        }
        let mut slots: Vec<Option<V>> = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        for (k, v) in map.drain() {
            slots[k] = Some(v);
        }
        trace!(node, size, "promoted slot cache to array");
        *self = SlotStore::Dense(slots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn state_cell_resolves_once() -> Result<()> {
        let cell: StateCell<u32, u32> = StateCell::new("test", 20);
        let calls = Cell::new(0);
        let a = cell.resolve(|recipe| {
            calls.set(calls.get() + 1);
            Ok(recipe + 1)
        })?;
        let b = cell.resolve(|recipe| {
            calls.set(calls.get() + 1);
            Ok(recipe + 2)
        })?;
        assert_eq!((a, b), (21, 21));
        assert_eq!(calls.get(), 1);
        assert!(cell.recipe().is_none());
        Ok(())
    }

    #[test]
    fn reentrant_resolution_fails_fast() {
        let cell: StateCell<u32, u32> = StateCell::new("reentrant", 1);
        let outer = cell.resolve(|_| {
            let inner = cell.resolve(Ok);
            assert!(matches!(inner, Err(SequenceError::ConcurrentModification { .. })));
            Ok(7)
        });
        assert_eq!(outer.ok(), Some(7));
    }

    #[test]
    fn failed_resolution_leaves_state_unclaimed() -> Result<()> {
        let cell: StateCell<u32, u32> = StateCell::new("retry", 3);
        let failed = cell.resolve(|_| Err(SequenceError::Overflow));
        assert!(failed.is_err());
        assert!(cell.material().is_none());
        assert_eq!(cell.resolve(|r| Ok(r * 2))?, 6);
        Ok(())
    }

    #[test]
    fn slot_cache_promotes_sparse_to_dense() -> Result<()> {
        let cache: SlotCache<usize> = SlotCache::new("slots", None);
        assert!(!cache.is_dense());
        for i in (0..3).rev() {
            cache.get_or_compute(i, Some(3), || Ok(i * 10))?;
        }
        assert!(cache.is_dense());
        assert_eq!(cache.get(1), Some(10));
        Ok(())
    }

    #[test]
    fn slot_cache_rejects_reentrant_slot() -> Result<()> {
        let cache: SlotCache<usize> = SlotCache::new("slots", Some(2));
        let value = cache.get_or_compute(0, Some(2), || {
            let again = cache.get_or_compute(0, Some(2), || Ok(1));
            assert!(matches!(again, Err(SequenceError::ConcurrentModification { .. })));
            Ok(5)
        })?;
        assert_eq!(value, 5);
        assert_eq!(cache.get_or_compute(0, Some(2), || Ok(9))?, 5);
        Ok(())
    }
}
