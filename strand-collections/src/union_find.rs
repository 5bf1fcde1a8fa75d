//! Disjoint-set forest with union by rank and path compression.
//!
//! Elements are the indices `0..len`. Each set is a tree whose root is the
//! set's canonical representative. Union by rank keeps every tree
//! `O(log n)` tall on its own; path compression flattens the paths that
//! `find` walks, giving amortized near-constant operations.
//!
//! # Example
//!
//! ```
//! use strand_collections::DisjointSet;
//!
//! let mut sets = DisjointSet::new(5)?;
//!
//! assert!(sets.union(0, 1)?);
//! assert!(sets.union(2, 3)?);
//! assert!(!sets.connected(0, 2)?);
//!
//! assert!(sets.union(1, 2)?);
//! assert!(sets.connected(0, 3)?);
//! assert_eq!(sets.distinct_count(), 2);
//! # Ok::<(), strand_collections::Error>(())
//! ```
//!
//! # Persistence
//!
//! With the `serde` feature, the slots and the set counter are serialized.
//! The scratch buffer used by path compression is not; a restored instance
//! gets a fresh one. Restoring validates the forest and fails with
//! [`Error::Corrupt`] on malformed input.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Initial capacity of the path compression buffer.
const PATH_CAPACITY: usize = 32;

/// Per-element state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// Canonical root. `height` is an upper bound on the tree height, >= 1.
    Root {
        /// Upper bound on the height of the tree rooted here.
        height: u32,
    },
    /// Non-root element pointing at its parent.
    Child {
        /// Index of the parent element.
        parent: usize,
    },
}

/// A fixed universe of elements partitioned into disjoint sets.
///
/// Not thread-safe; wrap in a lock to share.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Persisted"))]
pub struct DisjointSet {
    slots: Box<[Slot]>,
    /// Number of `Slot::Root` entries.
    sets: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    path: Vec<usize>,
}

impl DisjointSet {
    /// Creates `len` elements, each in a set of its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroSize`] if `len` is zero.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::ZeroSize);
        }

        Ok(Self {
            slots: vec![Slot::Root { height: 1 }; len].into_boxed_slice(),
            sets: len,
            path: Vec::with_capacity(PATH_CAPACITY),
        })
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a disjoint set holds at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of disjoint sets, in `1..=len`.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.sets
    }

    /// Returns `true` if every element is in the same set.
    #[inline]
    pub fn all_connected(&self) -> bool {
        self.sets <= 1
    }

    /// Returns the state of an element without compressing anything.
    pub fn slot(&self, index: usize) -> Result<Slot> {
        self.check(index)?;
        Ok(self.slots[index])
    }

    /// Returns the canonical root of the set containing `index`.
    ///
    /// Every element visited on the way is re-pointed at the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= len`.
    pub fn find(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        Ok(self.find_root(index))
    }

    /// Returns `true` if `a` and `b` are in the same set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if either index is `>= len`. Both are
    /// checked before anything is compressed.
    pub fn connected(&mut self, a: usize, b: usize) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.find_root(a) == self.find_root(b))
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// Returns `true` if they were disjoint and are now one set, `false` if
    /// they already shared a set (nothing changes).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if either index is `>= len`.
    pub fn union(&mut self, a: usize, b: usize) -> Result<bool> {
        self.check(a)?;
        self.check(b)?;

        let x = self.find_root(a);
        let y = self.find_root(b);
        if x == y {
            return Ok(false);
        }

        let (hx, hy) = (self.height(x), self.height(y));

        // Shorter tree goes under the taller one. Ties go to `b`'s root.
        let (child, parent) = if hx > hy { (y, x) } else { (x, y) };
        if hx == hy {
            self.slots[parent] = Slot::Root { height: hy + 1 };
        }
        self.slots[child] = Slot::Child { parent };
        self.sets -= 1;

        Ok(true)
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index,
                len: self.slots.len(),
            })
        }
    }

    fn find_root(&mut self, mut index: usize) -> usize {
        while let Slot::Child { parent } = self.slots[index] {
            self.path.push(index);
            index = parent;
        }

        for visited in self.path.drain(..) {
            self.slots[visited] = Slot::Child { parent: index };
        }

        index
    }

    #[inline]
    fn height(&self, root: usize) -> u32 {
        match self.slots[root] {
            Slot::Root { height } => height,
            Slot::Child { .. } => unreachable!("element {root} is not a root"),
        }
    }
}

/// Wire form of [`DisjointSet`], validated before use.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct Persisted {
    slots: Box<[Slot]>,
    sets: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<Persisted> for DisjointSet {
    type Error = Error;

    fn try_from(persisted: Persisted) -> Result<Self> {
        let Persisted { slots, sets } = persisted;

        if let Err(err) = validate(&slots, sets) {
            log::debug!("rejecting persisted disjoint set of {} elements: {err}", slots.len());
            return Err(err);
        }

        log::trace!("restored disjoint set: {} elements, {sets} sets", slots.len());
        Ok(Self {
            slots,
            sets,
            path: Vec::with_capacity(PATH_CAPACITY),
        })
    }
}

#[cfg(feature = "serde")]
fn validate(slots: &[Slot], sets: usize) -> Result<()> {
    let len = slots.len();
    if len == 0 {
        return Err(Error::Corrupt("no elements"));
    }

    let mut roots = 0;
    for slot in slots {
        match *slot {
            Slot::Root { height: 0 } => return Err(Error::Corrupt("root with zero height")),
            Slot::Root { .. } => roots += 1,
            Slot::Child { parent } if parent >= len => {
                return Err(Error::Corrupt("parent index out of range"));
            }
            Slot::Child { .. } => {}
        }
    }
    if roots != sets {
        return Err(Error::Corrupt("set count does not match roots"));
    }

    // Every chain must reach a root. Each element is walked at most once:
    // a walk stops at a root or at an element whose root is already known.
    const UNKNOWN: usize = usize::MAX;
    let mut root_of = vec![UNKNOWN; len];
    let mut chain = Vec::new();
    for start in 0..len {
        let mut index = start;
        let root = loop {
            if root_of[index] != UNKNOWN {
                break root_of[index];
            }
            match slots[index] {
                Slot::Root { .. } => break index,
                Slot::Child { parent } => {
                    if chain.len() == len {
                        return Err(Error::Corrupt("parent chain contains a cycle"));
                    }
                    chain.push(index);
                    index = parent;
                }
            }
        };
        root_of[root] = root;
        for visited in chain.drain(..) {
            root_of[visited] = root;
        }
    }

    // Union by rank keeps at least 2^(height - 1) members under a root.
    let mut sizes = vec![0usize; len];
    for &root in &root_of {
        sizes[root] += 1;
    }
    for (index, slot) in slots.iter().enumerate() {
        if let Slot::Root { height } = *slot {
            let rank = height - 1;
            if rank >= usize::BITS || sizes[index] < 1usize << rank {
                return Err(Error::Corrupt("root height exceeds its set size"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_elements_rejected() {
        assert_eq!(DisjointSet::new(0).unwrap_err(), Error::ZeroSize);
    }

    #[test]
    fn starts_disjoint() {
        let mut sets = DisjointSet::new(4).unwrap();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets.distinct_count(), 4);
        assert!(!sets.all_connected());

        for i in 0..4 {
            assert_eq!(sets.find(i).unwrap(), i);
            assert!(sets.connected(i, i).unwrap());
        }
        assert!(!sets.connected(0, 3).unwrap());
    }

    #[test]
    fn single_element_is_all_connected() {
        let sets = DisjointSet::new(1).unwrap();
        assert!(sets.all_connected());
        assert_eq!(sets.distinct_count(), 1);
    }

    #[test]
    fn five_element_scenario() {
        let mut sets = DisjointSet::new(5).unwrap();

        assert!(sets.union(0, 1).unwrap());
        assert!(sets.union(2, 3).unwrap());
        assert!(!sets.connected(0, 2).unwrap());
        assert!(sets.union(1, 2).unwrap());
        assert!(sets.connected(0, 3).unwrap());
        assert_eq!(sets.distinct_count(), 2);
    }

    #[test]
    fn union_same_set_is_noop() {
        let mut sets = DisjointSet::new(3).unwrap();
        assert!(sets.union(0, 1).unwrap());
        assert!(!sets.union(1, 0).unwrap());
        assert!(!sets.union(2, 2).unwrap());
        assert_eq!(sets.distinct_count(), 2);
    }

    #[test]
    fn tie_goes_to_second_root() {
        let mut sets = DisjointSet::new(2).unwrap();
        sets.union(0, 1).unwrap();

        assert_eq!(sets.slot(0).unwrap(), Slot::Child { parent: 1 });
        assert_eq!(sets.slot(1).unwrap(), Slot::Root { height: 2 });
    }

    #[test]
    fn shorter_tree_goes_under_taller() {
        let mut sets = DisjointSet::new(3).unwrap();
        sets.union(0, 1).unwrap(); // root 1, height 2
        sets.union(1, 2).unwrap(); // 2 has height 1, goes under 1

        assert_eq!(sets.slot(2).unwrap(), Slot::Child { parent: 1 });
        assert_eq!(sets.slot(1).unwrap(), Slot::Root { height: 2 });
    }

    #[test]
    fn find_compresses_path() {
        let mut sets = DisjointSet::new(4).unwrap();
        sets.union(0, 1).unwrap(); // 0 -> 1
        sets.union(2, 3).unwrap(); // 2 -> 3
        sets.union(1, 3).unwrap(); // 1 -> 3, so 0 -> 1 -> 3

        assert_eq!(sets.slot(0).unwrap(), Slot::Child { parent: 1 });
        assert_eq!(sets.find(0).unwrap(), 3);
        assert_eq!(sets.slot(0).unwrap(), Slot::Child { parent: 3 });
        assert!(sets.path.is_empty());
    }

    #[test]
    fn out_of_bounds() {
        let mut sets = DisjointSet::new(3).unwrap();
        let err = Error::OutOfBounds { index: 3, len: 3 };

        assert_eq!(sets.find(3).unwrap_err(), err);
        assert_eq!(sets.connected(0, 3).unwrap_err(), err);
        assert_eq!(sets.union(3, 0).unwrap_err(), err);
        assert_eq!(sets.distinct_count(), 3);
    }

    #[test]
    fn failed_union_leaves_paths_alone() {
        let mut sets = DisjointSet::new(4).unwrap();
        sets.union(0, 1).unwrap();
        sets.union(2, 3).unwrap();
        sets.union(1, 3).unwrap();

        // 0 has a two-step path; a rejected call must not compress it.
        assert!(sets.union(0, 9).is_err());
        assert_eq!(sets.slot(0).unwrap(), Slot::Child { parent: 1 });
    }

    #[test]
    fn merge_all() {
        let mut sets = DisjointSet::new(100).unwrap();
        for i in 1..100 {
            assert!(sets.union(i - 1, i).unwrap());
            assert_eq!(sets.distinct_count(), 100 - i);
        }
        assert!(sets.all_connected());
        assert!(sets.connected(0, 99).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let mut sets = DisjointSet::new(6).unwrap();
        sets.union(0, 1).unwrap();
        sets.union(1, 2).unwrap();
        sets.union(4, 5).unwrap();

        let json = serde_json::to_string(&sets).unwrap();
        assert!(!json.contains("path"));

        let mut restored: DisjointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.distinct_count(), 3);
        assert!(restored.connected(0, 2).unwrap());
        assert!(!restored.connected(2, 3).unwrap());
        assert!(restored.path.capacity() >= PATH_CAPACITY);

        assert!(restored.union(3, 5).unwrap());
        assert_eq!(restored.distinct_count(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_rejects_corrupt_state() {
        let cycle = r#"{"slots":[{"Child":{"parent":1}},{"Child":{"parent":0}}],"sets":0}"#;
        assert!(serde_json::from_str::<DisjointSet>(cycle).is_err());

        let bad_count = r#"{"slots":[{"Root":{"height":1}}],"sets":2}"#;
        assert!(serde_json::from_str::<DisjointSet>(bad_count).is_err());

        let dangling = r#"{"slots":[{"Child":{"parent":4}}],"sets":0}"#;
        assert!(serde_json::from_str::<DisjointSet>(dangling).is_err());

        let tall = r#"{"slots":[{"Root":{"height":4294967295}},{"Root":{"height":4294967295}}],"sets":2}"#;
        assert!(serde_json::from_str::<DisjointSet>(tall).is_err());

        let looped_tail = r#"{"slots":[{"Child":{"parent":1}},{"Child":{"parent":2}},{"Child":{"parent":1}}],"sets":0}"#;
        assert!(serde_json::from_str::<DisjointSet>(looped_tail).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_checks_height_against_set_size() {
        let short = [Slot::Root { height: 2 }, Slot::Root { height: 1 }];
        assert_eq!(
            validate(&short, 2),
            Err(Error::Corrupt("root height exceeds its set size"))
        );

        let pair = [Slot::Child { parent: 1 }, Slot::Root { height: 2 }];
        assert_eq!(validate(&pair, 1), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_accepts_long_chain() {
        let len = 10_000;
        let mut slots: Vec<Slot> = (1..len).map(|parent| Slot::Child { parent }).collect();
        slots.push(Slot::Root { height: 1 });
        assert_eq!(validate(&slots, 1), Ok(()));

        // Closing the chain into a loop is caught.
        slots[len - 1] = Slot::Child { parent: 0 };
        assert_eq!(
            validate(&slots, 0),
            Err(Error::Corrupt("parent chain contains a cycle"))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_restored_union_round_trips() {
        let json = r#"{"slots":[{"Child":{"parent":1}},{"Root":{"height":2}},{"Child":{"parent":3}},{"Root":{"height":2}}],"sets":2}"#;
        let mut sets: DisjointSet = serde_json::from_str(json).unwrap();

        assert!(sets.union(0, 2).unwrap());
        assert_eq!(sets.slot(3).unwrap(), Slot::Root { height: 3 });
        assert!(sets.all_connected());

        let json = serde_json::to_string(&sets).unwrap();
        let restored: DisjointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.slot(3).unwrap(), Slot::Root { height: 3 });
    }
}
