//! # `LinkedSequence`: arena-backed doubly-linked sequence with stable indices.
//!
//! Random access by stable index is needed because [`crate::training::stats`]
//! stores `(sequence_index, position_index)` occurrences and must dereference
//! them after arbitrary intervening mutations. A plain linked list does not
//! provide O(1) addressing by original position; a plain array does not
//! permit O(1) pair-collapse. The hybrid here is an arena keyed by original
//! position, where `replace_pair` marks the absorbed slot dead without
//! compacting the array.
//!
//! Dead positions are never revived or garbage-collected; the backing
//! array's size is bounded by the sequence's original length and is
//! reclaimed whole when the `LinkedSequence` is dropped.

use crate::error::{Error, Result};
use crate::types::SymbolId;

#[derive(Debug, Clone)]
struct Node {
    value: SymbolId,
    prev: Option<usize>,
    next: Option<usize>,
    alive: bool,
}

/// A mutable doubly-linked view of one input as a sequence of symbol IDs,
/// with stable indices and O(1) pair-collapse.
///
/// See the module documentation for the rationale behind the arena design.
#[derive(Debug, Clone)]
pub struct LinkedSequence {
    arena: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LinkedSequence {
    /// Construct a sequence from an ordered list of symbols.
    ///
    /// Each item is assigned the stable index equal to its initial position
    /// (`0..items.len()`).
    pub fn new(items: &[SymbolId]) -> Self {
        let n = items.len();
        let mut arena = Vec::with_capacity(n);
        for (i, &value) in items.iter().enumerate() {
            arena.push(Node {
                value,
                prev: i.checked_sub(1),
                next: if i + 1 < n { Some(i + 1) } else { None },
                alive: true,
            });
        }
        let head = if n > 0 { Some(0) } else { None };
        let tail = if n > 0 { Some(n - 1) } else { None };
        Self { arena, head, tail }
    }

    fn node(
        &self,
        i: usize,
    ) -> Result<&Node> {
        self.arena
            .get(i)
            .filter(|n| n.alive)
            .ok_or(Error::InvalidIndex { index: i })
    }

    /// The original length `N` (not the live count).
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the sequence was constructed from zero items.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The current value at position `i`.
    ///
    /// ## Errors
    /// [`Error::InvalidIndex`] if `i` is dead or out of range.
    pub fn get(
        &self,
        i: usize,
    ) -> Result<SymbolId> {
        Ok(self.node(i)?.value)
    }

    /// The index of the previous live position, or `None` if `i` is the head.
    ///
    /// ## Errors
    /// [`Error::InvalidIndex`] if `i` is dead or out of range.
    pub fn prev(
        &self,
        i: usize,
    ) -> Result<Option<usize>> {
        Ok(self.node(i)?.prev)
    }

    /// The index of the next live position, or `None` if `i` is the tail.
    ///
    /// ## Errors
    /// [`Error::InvalidIndex`] if `i` is dead or out of range.
    pub fn next(
        &self,
        i: usize,
    ) -> Result<Option<usize>> {
        Ok(self.node(i)?.next)
    }

    /// The index of the live position two hops forward, or `None` if fewer
    /// than two successors exist.
    ///
    /// ## Errors
    /// [`Error::InvalidIndex`] if `i` is dead or out of range.
    pub fn second_next(
        &self,
        i: usize,
    ) -> Result<Option<usize>> {
        let Some(j) = self.node(i)?.next else {
            return Ok(None);
        };
        // `j` is guaranteed alive: it is only ever recorded as a `next`
        // pointer while live, and the chain is kept consistent by
        // `replace_pair`.
        Ok(self.arena[j].next)
    }

    /// Replace the pair at `(i, next(i))` with a single value `v` at `i`.
    ///
    /// Requires `i` live and `next(i)` defined. Position `i`'s value becomes
    /// `v`; position `next(i)` becomes dead; the chain skips the dead
    /// position. `prev(i)` is unchanged after the call; `next(i)` returns
    /// what was `second_next(i)` before the call, and that successor's
    /// `prev` becomes `i`.
    ///
    /// ## Errors
    /// [`Error::InvalidIndex`] if `i` is dead, out of range, or has no
    /// successor.
    pub fn replace_pair(
        &mut self,
        i: usize,
        v: SymbolId,
    ) -> Result<()> {
        let next_i = self.node(i)?.next.ok_or(Error::InvalidIndex { index: i })?;
        let after = self.arena[next_i].next;

        self.arena[i].value = v;
        self.arena[i].next = after;
        self.arena[next_i].alive = false;
        self.arena[next_i].prev = None;
        self.arena[next_i].next = None;

        if let Some(a) = after {
            self.arena[a].prev = Some(i);
        } else {
            self.tail = Some(i);
        }

        Ok(())
    }

    /// The first live index, or `None` if no positions remain live.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// The last live index, or `None` if no positions remain live.
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Walk the live chain head-to-tail, yielding values in current logical
    /// order.
    pub fn iter_live(&self) -> impl Iterator<Item = SymbolId> + '_ {
        let mut cur = self.head;
        core::iter::from_fn(move || {
            let i = cur?;
            cur = self.arena[i].next;
            Some(self.arena[i].value)
        })
    }

    /// Walk the live chain tail-to-head.
    pub fn iter_live_rev(&self) -> impl Iterator<Item = SymbolId> + '_ {
        let mut cur = self.tail;
        core::iter::from_fn(move || {
            let i = cur?;
            cur = self.arena[i].prev;
            Some(self.arena[i].value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_len() {
        let seq = LinkedSequence::new(&[10, 20, 30]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap(), 10);
        assert_eq!(seq.get(2).unwrap(), 30);
        assert_eq!(seq.prev(0).unwrap(), None);
        assert_eq!(seq.next(2).unwrap(), None);
        assert_eq!(seq.next(0).unwrap(), Some(1));
        assert_eq!(seq.second_next(0).unwrap(), Some(2));
        assert_eq!(seq.second_next(1).unwrap(), None);
    }

    #[test]
    fn test_dead_index_errors() {
        let mut seq = LinkedSequence::new(&[1, 2, 3]);
        seq.replace_pair(0, 99).unwrap();
        assert!(matches!(seq.get(1), Err(Error::InvalidIndex { index: 1 })));
        assert!(matches!(seq.prev(1), Err(Error::InvalidIndex { index: 1 })));
    }

    #[test]
    fn test_out_of_range_errors() {
        let seq = LinkedSequence::new(&[1, 2]);
        assert!(matches!(seq.get(5), Err(Error::InvalidIndex { index: 5 })));
    }

    #[test]
    fn test_replace_pair_collapses_middle() {
        // a b a b a b -> merge at index 0 of (a,b): [T, a, b, a, b]
        let mut seq = LinkedSequence::new(&[1, 2, 1, 2, 1, 2]);
        seq.replace_pair(0, 100).unwrap();
        assert_eq!(seq.len(), 6); // original length never changes
        assert_eq!(seq.iter_live().collect::<Vec<_>>(), vec![100, 1, 2, 1, 2]);
        assert_eq!(seq.prev(0).unwrap(), None);
        assert_eq!(seq.next(0).unwrap(), Some(2));
        assert_eq!(seq.prev(2).unwrap(), Some(0));
    }

    #[test]
    fn test_replace_pair_at_tail_updates_tail() {
        let mut seq = LinkedSequence::new(&[1, 2, 3, 4]);
        seq.replace_pair(2, 100).unwrap(); // merges (3,4) at index 2
        assert_eq!(seq.tail(), Some(2));
        assert_eq!(seq.next(2).unwrap(), None);
        assert_eq!(seq.iter_live().collect::<Vec<_>>(), vec![1, 2, 100]);
    }

    #[test]
    fn test_replace_pair_requires_successor() {
        let mut seq = LinkedSequence::new(&[1, 2]);
        seq.replace_pair(0, 100).unwrap(); // now index 0 is tail
        assert!(matches!(
            seq.replace_pair(0, 200),
            Err(Error::InvalidIndex { index: 0 })
        ));
    }

    #[test]
    fn test_forward_and_reverse_walks_agree() {
        let mut seq = LinkedSequence::new(&[1, 1, 1, 1, 1, 1]);
        seq.replace_pair(0, 10).unwrap(); // [10, 1, 1, 1, 1]
        seq.replace_pair(2, 20).unwrap(); // merges idx2(=1) with idx3(=1) -> [10,1,20,1]
        let fwd: Vec<_> = seq.iter_live().collect();
        let mut rev: Vec<_> = seq.iter_live_rev().collect();
        rev.reverse();
        assert_eq!(fwd, rev);
    }

    proptest::proptest! {
        #[test]
        fn prop_sequence_integrity_after_random_merges(
            n in 2usize..40,
            seed in 0u64..10_000,
        ) {
            let items: Vec<SymbolId> = (0..n as u32).collect();
            let mut seq = LinkedSequence::new(&items);
            let mut rng = seed;
            let mut next_symbol = n as u32;

            for _ in 0..(n / 2) {
                // Collect current live indices that have a successor.
                let live: Vec<usize> = {
                    let mut idx = Vec::new();
                    let mut cur = seq.head();
                    while let Some(i) = cur {
                        if seq.next(i).unwrap().is_some() {
                            idx.push(i);
                        }
                        cur = seq.next(i).unwrap();
                    }
                    idx
                };
                if live.is_empty() {
                    break;
                }
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
                let pick = live[(rng as usize) % live.len()];
                seq.replace_pair(pick, next_symbol).unwrap();
                next_symbol += 1;

                let fwd: Vec<_> = seq.iter_live().collect();
                let mut rev: Vec<_> = seq.iter_live_rev().collect();
                rev.reverse();
                prop_assert_eq!(&fwd, &rev);
                prop_assert_eq!(seq.len(), n);
            }
        }
    }
}
