//! Storage trait for caller-owned node containers with stable keys.
//!
//! Lists never allocate or free nodes. The caller keeps them in some
//! container that hands out stable keys, and passes that container to every
//! list operation. This module abstracts over such containers.
//!
//! # Implementations
//!
//! | Storage | Key | Notes |
//! |---------|-----|-------|
//! | `Vec<T>` | `usize` | Fixed set of nodes, index = key |
//! | `HashMap<K, T>` | `K` | When keys are external ids |
//! | `slab::Slab<T>` | `usize` | Growable with slot reuse (feature `slab`) |

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::Key;

/// Keyed access to caller-owned nodes.
///
/// # Requirements
///
/// A key must keep resolving to the same node for as long as that node is
/// linked into any list. Removing a linked node from storage corrupts the
/// list it belongs to; unlink it first.
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Returns a reference to the node at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the node at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;
}

impl<T> Storage<T> for Vec<T> {
    type Key = usize;

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.as_slice().get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(key)
    }
}

impl<K, T, H> Storage<T> for HashMap<K, T, H>
where
    K: Key + Hash,
    H: BuildHasher,
{
    type Key = K;

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        HashMap::get(self, &key)
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        HashMap::get_mut(self, &key)
    }
}

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_storage() {
        let mut storage = vec![10u64, 20, 30];
        assert_eq!(Storage::get(&storage, 1), Some(&20));
        assert_eq!(Storage::get(&storage, 3), None);

        *Storage::get_mut(&mut storage, 2).unwrap() = 31;
        assert_eq!(storage[2], 31);
    }

    #[test]
    fn hashmap_storage() {
        let mut storage: HashMap<u32, &str> = HashMap::new();
        storage.insert(7, "seven");

        assert_eq!(Storage::get(&storage, 7), Some(&"seven"));
        assert_eq!(Storage::get(&storage, 8), None);
        assert!(Storage::get_mut(&mut storage, 7).is_some());
    }

    #[cfg(feature = "slab")]
    #[test]
    fn slab_storage() {
        let mut storage = slab::Slab::new();
        let key = storage.insert(5u8);

        assert_eq!(Storage::get(&storage, key), Some(&5));
        storage.remove(key);
        assert_eq!(Storage::get(&storage, key), None);
    }
}
