//! # `IndexedMaxHeap`: binary max-heap with O(log n) delete-by-key.
//!
//! A standard binary heap where stale entries are filtered lazily on pop is
//! a valid alternative, but it pays for an always-growing heap and an
//! inaccurate `peek_max` between refreshes. This structure instead
//! pays O(log n) per key-based delete in exchange for an always-accurate
//! `peek_max`, at the cost of maintaining a `map_key -> heap index` index
//! alongside the heap array. The `swap` primitive is the single place that
//! index is kept consistent with the array.

use crate::error::{Error, Result};
use crate::types::CommonHashMap;
use core::hash::Hash;

/// An item storable in an [`IndexedMaxHeap`].
///
/// `Key` is the independent lookup key (`map_key`); `Priority`
/// is the ordering key (`heap_key`). No two items held by the same heap may
/// share a `Key` at the same time.
pub trait IndexedHeapItem {
    /// The independent lookup key used by `contains`/`delete_by_key`.
    type Key: Eq + Hash + Clone;
    /// The ordering key the heap is a max-heap over.
    type Priority: Ord;

    /// This item's lookup key.
    fn map_key(&self) -> Self::Key;

    /// This item's ordering key.
    fn heap_key(&self) -> Self::Priority;
}

/// A binary max-heap plus a `map_key -> index` lookup, supporting
/// `push`/`pop_max`/`contains`/`delete_by_key` in `O(log n)`.
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<I: IndexedHeapItem> {
    heap: Vec<I>,
    index: CommonHashMap<I::Key, usize>,
}

impl<I: IndexedHeapItem> Default for IndexedMaxHeap<I> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            index: CommonHashMap::default(),
        }
    }
}

impl<I: IndexedHeapItem> IndexedMaxHeap<I> {
    /// Construct an empty heap with capacity for `n` items.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            heap: Vec::with_capacity(n),
            index: CommonHashMap::with_capacity(n),
        }
    }

    /// The number of items currently held.
    ///
    /// ## Errors
    /// [`Error::InvariantViolation`] if the heap array and key-map
    /// disagree on size: this indicates a defect in the core.
    pub fn len(&self) -> Result<usize> {
        if self.heap.len() != self.index.len() {
            return Err(Error::InvariantViolation(
                "heap array and key-map sizes disagree",
            ));
        }
        Ok(self.heap.len())
    }

    /// Whether the heap holds no items.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The item with maximum `heap_key`.
    ///
    /// ## Errors
    /// [`Error::EmptyHeap`] if the heap is empty.
    pub fn peek_max(&self) -> Result<&I> {
        self.heap.first().ok_or(Error::EmptyHeap)
    }

    /// Whether an item with this `map_key` is currently present.
    pub fn contains(
        &self,
        key: &I::Key,
    ) -> bool {
        self.index.contains_key(key)
    }

    /// Insert an item.
    ///
    /// ## Errors
    /// [`Error::DuplicateKey`] if an item with the same `map_key` is already
    /// present.
    pub fn push(
        &mut self,
        item: I,
    ) -> Result<()> {
        let key = item.map_key();
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateKey);
        }
        let i = self.heap.len();
        self.heap.push(item);
        self.index.insert(key, i);
        self.sift_up(i);
        Ok(())
    }

    /// Remove and return the item with maximum `heap_key`.
    ///
    /// ## Errors
    /// [`Error::EmptyHeap`] if the heap is empty.
    pub fn pop_max(&mut self) -> Result<I> {
        if self.heap.is_empty() {
            return Err(Error::EmptyHeap);
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let item = self.heap.pop().expect("checked non-empty above");
        self.index.remove(&item.map_key());
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(item)
    }

    /// Remove and return the item with the given `map_key`.
    ///
    /// After swapping the target with the last item and dropping the tail,
    /// the replacement is sifted both up and down: only one direction can
    /// act, but both must be attempted since the replacement may violate
    /// either the parent or the children invariant.
    ///
    /// ## Errors
    /// [`Error::MissingKey`] if no item with this key is present.
    pub fn delete_by_key(
        &mut self,
        key: &I::Key,
    ) -> Result<I> {
        let i = *self.index.get(key).ok_or(Error::MissingKey)?;
        let last = self.heap.len() - 1;
        self.swap(i, last);
        let item = self.heap.pop().expect("index implies non-empty heap");
        self.index.remove(&item.map_key());
        if i < self.heap.len() {
            self.sift_down(i);
            self.sift_up(i);
        }
        Ok(item)
    }

    fn parent(i: usize) -> Option<usize> {
        if i == 0 { None } else { Some((i - 1) / 2) }
    }

    fn children(i: usize) -> (usize, usize) {
        (2 * i + 1, 2 * i + 2)
    }

    fn sift_up(
        &mut self,
        mut i: usize,
    ) {
        while let Some(p) = Self::parent(i) {
            if self.heap[i].heap_key() > self.heap[p].heap_key() {
                self.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(
        &mut self,
        mut i: usize,
    ) {
        loop {
            let (l, r) = Self::children(i);
            let mut largest = i;
            if l < self.heap.len() && self.heap[l].heap_key() > self.heap[largest].heap_key() {
                largest = l;
            }
            if r < self.heap.len() && self.heap[r].heap_key() > self.heap[largest].heap_key() {
                largest = r;
            }
            if largest == i {
                break;
            }
            self.swap(i, largest);
            i = largest;
        }
    }

    /// Swap two heap slots, keeping the key-index consistent with both.
    fn swap(
        &mut self,
        i: usize,
        j: usize,
    ) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.index.insert(self.heap[i].map_key(), i);
        self.index.insert(self.heap[j].map_key(), j);
    }

    /// Check the heap-order and index invariants hold at every slot.
    ///
    /// Intended for tests; `O(n)`.
    #[cfg(test)]
    fn check_invariants(&self) -> bool {
        for (i, item) in self.heap.iter().enumerate() {
            if self.index.get(&item.map_key()) != Some(&i) {
                return false;
            }
            let (l, r) = Self::children(i);
            if l < self.heap.len() && self.heap[l].heap_key() > item.heap_key() {
                return false;
            }
            if r < self.heap.len() && self.heap[r].heap_key() > item.heap_key() {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Entry {
        key: u32,
        count: u32,
    }

    impl IndexedHeapItem for Entry {
        type Key = u32;
        type Priority = u32;

        fn map_key(&self) -> u32 {
            self.key
        }

        fn heap_key(&self) -> u32 {
            self.count
        }
    }

    #[test]
    fn test_empty_heap_errors() {
        let heap: IndexedMaxHeap<Entry> = IndexedMaxHeap::default();
        assert!(matches!(heap.peek_max(), Err(Error::EmptyHeap)));
    }

    #[test]
    fn test_push_pop_orders_by_count() {
        let mut heap = IndexedMaxHeap::default();
        heap.push(Entry { key: 1, count: 3 }).unwrap();
        heap.push(Entry { key: 2, count: 7 }).unwrap();
        heap.push(Entry { key: 3, count: 5 }).unwrap();
        assert!(heap.check_invariants());

        assert_eq!(heap.pop_max().unwrap().key, 2);
        assert_eq!(heap.pop_max().unwrap().key, 3);
        assert_eq!(heap.pop_max().unwrap().key, 1);
        assert!(matches!(heap.pop_max(), Err(Error::EmptyHeap)));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut heap = IndexedMaxHeap::default();
        heap.push(Entry { key: 1, count: 3 }).unwrap();
        assert!(matches!(
            heap.push(Entry { key: 1, count: 9 }),
            Err(Error::DuplicateKey)
        ));
    }

    #[test]
    fn test_contains_and_missing_key() {
        let mut heap = IndexedMaxHeap::default();
        heap.push(Entry { key: 1, count: 3 }).unwrap();
        assert!(heap.contains(&1));
        assert!(!heap.contains(&2));
        assert!(matches!(heap.delete_by_key(&2), Err(Error::MissingKey)));
    }

    #[test]
    fn test_delete_by_key_middle_of_heap() {
        let mut heap = IndexedMaxHeap::default();
        for (key, count) in [(1, 10), (2, 9), (3, 8), (4, 1), (5, 2), (6, 7)] {
            heap.push(Entry { key, count }).unwrap();
        }
        assert!(heap.check_invariants());
        let removed = heap.delete_by_key(&3).unwrap();
        assert_eq!(removed.count, 8);
        assert!(heap.check_invariants());
        assert_eq!(heap.len().unwrap(), 5);

        let mut popped = Vec::new();
        while let Ok(item) = heap.pop_max() {
            popped.push(item.key);
        }
        assert_eq!(popped, vec![1, 2, 6, 5, 4]);
    }

    #[test]
    fn test_len_consistency_check() {
        let heap: IndexedMaxHeap<Entry> = IndexedMaxHeap::default();
        assert_eq!(heap.len().unwrap(), 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_heap_invariants_hold_after_random_ops(
            ops in proptest::collection::vec(0u8..3, 1..200),
            seed in 0u64..10_000,
        ) {
            let mut heap: IndexedMaxHeap<Entry> = IndexedMaxHeap::default();
            let mut live_keys: Vec<u32> = Vec::new();
            let mut rng = seed;
            let mut next_key = 0u32;

            let mut rand = || {
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
                (rng >> 33) as u32
            };

            for op in ops {
                match op {
                    0 => {
                        let key = next_key;
                        next_key += 1;
                        let count = rand() % 1000;
                        if heap.push(Entry { key, count }).is_ok() {
                            live_keys.push(key);
                        }
                    }
                    1 => {
                        let _ = heap.pop_max().map(|item| {
                            live_keys.retain(|&k| k != item.key);
                        });
                    }
                    _ => {
                        if !live_keys.is_empty() {
                            let idx = (rand() as usize) % live_keys.len();
                            let key = live_keys.swap_remove(idx);
                            heap.delete_by_key(&key).unwrap();
                        }
                    }
                }
                prop_assert!(heap.check_invariants());
                prop_assert_eq!(heap.len().unwrap(), live_keys.len());
            }
        }
    }
}
