//! Bidirectional, fail-fast cursor over a [`List`].
//!
//! A [`Cursor`] is a detached position: it does not borrow the list, and
//! every call takes the list and its storage explicitly. That lets several
//! cursors coexist over one list. The price is staleness, which each cursor
//! detects by remembering the list's generation at its last sync point.
//!
//! A cursor sits *between* nodes. Positions run from `0` (before the head) to
//! `len` (after the tail). `next` crosses the node after the cursor,
//! `previous` the node before it; both return the crossed node's key.
//!
//! # Fail-fast detection
//!
//! Any structural change not made through this cursor (a push, a removal
//! through another cursor, a `clear`) makes the cursor's next checked call
//! fail with [`Error::ConcurrentModification`]. This is a diagnostic for
//! single-threaded misuse such as editing a list while walking it. It is not
//! a synchronization primitive and catches nothing across threads.
//!
//! # Example
//!
//! ```
//! use strand_collections::{Link, List};
//!
//! let mut nodes: Vec<Link<usize>> = (0..4).map(|_| Link::new()).collect();
//! let mut list = List::new();
//! for key in 0..4 {
//!     list.push_back(&mut nodes, key)?;
//! }
//!
//! // Drop every odd key while walking.
//! let mut cursor = list.cursor(&nodes, 0)?;
//! while cursor.has_next(&list) {
//!     let key = cursor.next(&list, &nodes)?;
//!     if key % 2 == 1 {
//!         cursor.remove(&mut list, &mut nodes)?;
//!     }
//! }
//!
//! assert_eq!(list.to_vec(&nodes), [0, 2]);
//! # Ok::<(), strand_collections::Error>(())
//! ```

use crate::{Error, Key, Linked, List, ListId, Result, Storage};

/// A position in a [`List`] with list-iterator semantics.
#[derive(Debug)]
pub struct Cursor<K: Key> {
    list: ListId,
    /// Node after the cursor; `NONE` is the header.
    next: K,
    next_index: usize,
    /// Node crossed by the last `next`/`previous`; `NONE` when there is none.
    last: K,
    expected: u64,
}

impl<K: Key> List<K> {
    /// Returns a cursor positioned before the node at `index`.
    ///
    /// Walks from whichever end is closer: O(min(index, len - index)).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index > len`.
    pub fn cursor<T, S>(&self, storage: &S, index: usize) -> Result<Cursor<K>>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if index > self.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut next;
        if index < self.len() / 2 {
            next = self.next_of(storage, K::NONE)?;
            for _ in 0..index {
                next = self.next_of(storage, next)?;
            }
        } else {
            next = K::NONE;
            for _ in index..self.len() {
                next = self.prev_of(storage, next)?;
            }
        }

        Ok(self.cursor_at(next, index))
    }

    /// Returns a cursor positioned before the head.
    #[inline]
    pub fn cursor_front(&self) -> Cursor<K> {
        self.cursor_at(self.front().unwrap_or(K::NONE), 0)
    }

    /// Returns a cursor positioned after the tail.
    #[inline]
    pub fn cursor_back(&self) -> Cursor<K> {
        self.cursor_at(K::NONE, self.len())
    }

    /// Returns a cursor walking from the tail to the head.
    #[inline]
    pub fn descending(&self) -> Descending<K> {
        Descending {
            cursor: self.cursor_back(),
        }
    }

    #[inline]
    fn cursor_at(&self, next: K, next_index: usize) -> Cursor<K> {
        Cursor {
            list: self.id(),
            next,
            next_index,
            last: K::NONE,
            expected: self.generation(),
        }
    }
}

impl<K: Key> Cursor<K> {
    /// Returns `true` if there is a node after the cursor.
    #[inline]
    pub fn has_next(&self, list: &List<K>) -> bool {
        self.next_index < list.len()
    }

    /// Returns `true` if there is a node before the cursor.
    #[inline]
    pub fn has_previous(&self) -> bool {
        self.next_index > 0
    }

    /// Position of the node `next` would return.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Position of the node `previous` would return, `None` at the start.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.next_index.checked_sub(1)
    }

    /// Moves past the next node and returns its key.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSuchElement`] if the cursor is after the tail.
    /// - [`Error::ConcurrentModification`] / [`Error::ForeignList`] if the
    ///   cursor is stale or belongs to another list.
    pub fn next<T, S>(&mut self, list: &List<K>, storage: &S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.sync(list)?;
        if self.next_index >= list.len() {
            return Err(Error::NoSuchElement);
        }

        let key = self.next;
        self.next = list.next_of(storage, key)?;
        self.last = key;
        self.next_index += 1;
        Ok(key)
    }

    /// Moves back past the previous node and returns its key.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSuchElement`] if the cursor is before the head.
    /// - [`Error::ConcurrentModification`] / [`Error::ForeignList`] as for
    ///   [`next`](Self::next).
    pub fn previous<T, S>(&mut self, list: &List<K>, storage: &S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.sync(list)?;
        if self.next_index == 0 {
            return Err(Error::NoSuchElement);
        }

        let key = list.prev_of(storage, self.next)?;
        self.next = key;
        self.last = key;
        self.next_index -= 1;
        Ok(key)
    }

    /// Removes the node returned by the last `next`/`previous`.
    ///
    /// Returns the removed key. The node stays in storage, unlinked.
    ///
    /// # Errors
    ///
    /// - [`Error::NoCurrent`] if nothing was returned since the cursor was
    ///   created or since its last `remove`/`add`.
    /// - [`Error::ConcurrentModification`] / [`Error::ForeignList`].
    pub fn remove<T, S>(&mut self, list: &mut List<K>, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let last = self.last.get().ok_or(Error::NoCurrent)?;
        self.sync(list)?;

        let after = list.next_of(storage, last)?;
        list.remove(storage, last)?;

        if self.next == last {
            // Last move was `previous`: the cursor stays put, its next shifts.
            self.next = after;
        } else {
            self.next_index -= 1;
        }
        self.last = K::NONE;
        self.expected = list.generation();
        Ok(last)
    }

    /// Replaces the node returned by the last `next`/`previous` with `key`.
    ///
    /// Returns the replaced key, now unlinked. The replacement becomes the
    /// last returned node, so `remove` or `set` may follow.
    ///
    /// # Errors
    ///
    /// - [`Error::NoCurrent`] as for [`remove`](Self::remove).
    /// - [`Error::AlreadyLinked`] if `key` is a member of any list.
    /// - [`Error::ConcurrentModification`] / [`Error::ForeignList`].
    pub fn set<T, S>(&mut self, list: &mut List<K>, storage: &mut S, key: K) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let last = self.last.get().ok_or(Error::NoCurrent)?;
        self.sync(list)?;

        list.insert_before(storage, last, key)?;
        list.remove(storage, last)?;

        if self.next == last {
            self.next = key;
        }
        self.last = key;
        self.expected = list.generation();
        Ok(last)
    }

    /// Links `key` at the cursor position; the cursor ends up after it.
    ///
    /// A following `previous` returns `key`. Clears the last returned node.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyLinked`] if `key` is a member of any list.
    /// - [`Error::ConcurrentModification`] / [`Error::ForeignList`].
    pub fn add<T, S>(&mut self, list: &mut List<K>, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.sync(list)?;
        list.link_before(storage, self.next, key)?;

        self.last = K::NONE;
        self.next_index += 1;
        self.expected = list.generation();
        Ok(())
    }

    fn sync(&self, list: &List<K>) -> Result<()> {
        if self.list != list.id() {
            log::debug!("cursor for {} driven with {}", self.list, list.id());
            return Err(Error::ForeignList);
        }

        let actual = list.generation();
        if self.expected != actual {
            log::debug!(
                "{}: modified outside cursor (generation {} -> {actual})",
                self.list,
                self.expected
            );
            return Err(Error::ConcurrentModification {
                expected: self.expected,
                actual,
            });
        }

        Ok(())
    }
}

/// Reverse cursor: walks from the tail to the head.
///
/// Drives a [`Cursor`] backwards, so `next` here is the inner `previous`.
#[derive(Debug)]
pub struct Descending<K: Key> {
    cursor: Cursor<K>,
}

impl<K: Key> Descending<K> {
    /// Returns `true` if there is a node closer to the head.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor.has_previous()
    }

    /// Moves one node towards the head and returns its key.
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::previous`].
    #[inline]
    pub fn next<T, S>(&mut self, list: &List<K>, storage: &S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.cursor.previous(list, storage)
    }

    /// Removes the node returned by the last `next`.
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::remove`].
    #[inline]
    pub fn remove<T, S>(&mut self, list: &mut List<K>, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.cursor.remove(list, storage)
    }
}
