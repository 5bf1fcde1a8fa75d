//! Intrusive doubly-linked list over caller-owned storage.
//!
//! Nodes embed their own links (a [`Link`]) and live in storage the caller
//! owns. The list only holds the header: its head and tail keys. Because a
//! node carries its own links and the id of the list that owns it, removal
//! and relocation are O(1) given just the node's key, with no scan.
//!
//! # Ring layout
//!
//! The header closes the ring. A member node whose `prev` or `next` is
//! `K::NONE` points at the header, so the header's `next` is the head and its
//! `prev` is the tail. An empty list has both set to `K::NONE`.
//!
//! # Ownership
//!
//! Every list gets a process-unique [`ListId`]. Linking a node stamps it with
//! that id; unlinking clears it. A node stamped by any list is rejected by
//! every insert, and a node stamped by another list is rejected by every
//! removal. Nodes still linked when a list is dropped keep the dead id and
//! can never be linked again, so [`clear`](List::clear) a list whose nodes
//! outlive it. Dropping a non-empty list logs a warning.
//!
//! # Storage Invariant
//!
//! A list instance must always be used with the same storage instance, and a
//! linked node must stay in storage until it is unlinked. This is the
//! caller's responsibility (same discipline as the `slab` crate).
//!
//! # Example
//!
//! ```
//! use strand_collections::{Link, Linked, List};
//!
//! struct Job {
//!     id: u64,
//!     link: Link<usize>,
//! }
//!
//! impl Linked<usize> for Job {
//!     fn link(&self) -> &Link<usize> { &self.link }
//!     fn link_mut(&mut self) -> &mut Link<usize> { &mut self.link }
//! }
//!
//! let mut jobs: Vec<Job> = (0..3).map(|id| Job { id, link: Link::new() }).collect();
//! let mut queue: List<usize> = List::new();
//!
//! queue.push_back(&mut jobs, 0)?;
//! queue.push_back(&mut jobs, 1)?;
//! queue.push_front(&mut jobs, 2)?;
//!
//! // Remove from the middle - O(1)
//! queue.remove(&mut jobs, 0)?;
//! assert!(!jobs[0].is_linked());
//!
//! let ids: Vec<u64> = queue.iter(&jobs).map(|job| job.id).collect();
//! assert_eq!(ids, [2, 1]);
//! # Ok::<(), strand_collections::Error>(())
//! ```

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Error, Key, Result, Storage};

/// Identity of a [`List`] instance, stamped on every node it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(NonZeroU64);

impl ListId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ListId(NonZeroU64::MIN.saturating_add(NEXT.fetch_add(1, Ordering::Relaxed)))
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

/// Link fields embedded in every node.
///
/// Not `Clone`: a link belongs to exactly one node.
#[derive(Debug)]
pub struct Link<K: Key> {
    prev: K,
    next: K,
    owner: Option<ListId>,
}

impl<K: Key> Default for Link<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> Link<K> {
    /// Creates an unlinked link.
    #[inline]
    pub const fn new() -> Self {
        Self {
            prev: K::NONE,
            next: K::NONE,
            owner: None,
        }
    }

    /// Returns `true` if the node is a member of some list.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns the id of the owning list.
    #[inline]
    pub fn owner(&self) -> Option<ListId> {
        self.owner
    }

    /// Returns the previous node's key, or `None` at the head (or unlinked).
    #[inline]
    pub fn prev(&self) -> Option<K> {
        self.prev.get()
    }

    /// Returns the next node's key, or `None` at the tail (or unlinked).
    #[inline]
    pub fn next(&self) -> Option<K> {
        self.next.get()
    }

    #[inline]
    fn clear(&mut self) {
        self.prev = K::NONE;
        self.next = K::NONE;
        self.owner = None;
    }
}

/// Trait for types that can be linked into a [`List`].
///
/// Implementors embed a [`Link`] next to their own payload.
///
/// # Example
///
/// ```
/// use strand_collections::{Link, Linked};
///
/// struct Order {
///     id: u64,
///     qty: u64,
///     link: Link<u32>,
/// }
///
/// impl Linked<u32> for Order {
///     fn link(&self) -> &Link<u32> { &self.link }
///     fn link_mut(&mut self) -> &mut Link<u32> { &mut self.link }
/// }
///
/// let order = Order { id: 1, qty: 10, link: Link::new() };
/// assert!(!order.is_linked());
/// ```
pub trait Linked<K: Key> {
    /// Returns the embedded link.
    fn link(&self) -> &Link<K>;

    /// Returns the embedded link mutably.
    ///
    /// Only lists should write through this.
    fn link_mut(&mut self) -> &mut Link<K>;

    /// Returns `true` if this node is a member of some list.
    #[inline]
    fn is_linked(&self) -> bool {
        self.link().is_linked()
    }
}

impl<K: Key> Linked<K> for Link<K> {
    #[inline]
    fn link(&self) -> &Link<K> {
        self
    }

    #[inline]
    fn link_mut(&mut self) -> &mut Link<K> {
        self
    }
}

/// `K::NONE` names the header, never a node, so it is rejected like a
/// missing key.
#[inline]
fn link<'a, T: 'a, S>(storage: &'a S, key: S::Key) -> Result<&'a Link<S::Key>>
where
    T: Linked<S::Key>,
    S: Storage<T>,
{
    let missing = Error::InvalidKey {
        index: key.as_usize(),
    };
    if key.is_none() {
        return Err(missing);
    }
    storage.get(key).map(|node| node.link()).ok_or(missing)
}

#[inline]
fn link_mut<'a, T: 'a, S>(storage: &'a mut S, key: S::Key) -> Result<&'a mut Link<S::Key>>
where
    T: Linked<S::Key>,
    S: Storage<T>,
{
    let missing = Error::InvalidKey {
        index: key.as_usize(),
    };
    if key.is_none() {
        return Err(missing);
    }
    storage.get_mut(key).map(|node| node.link_mut()).ok_or(missing)
}

/// An intrusive doubly-linked list over external storage.
///
/// The list stores only the header (head, tail), its length, its identity
/// and a generation counter. The generation increments on every structural
/// change and lets [`Cursor`](crate::Cursor)s detect edits made behind their
/// back.
///
/// Not thread-safe; wrap in a lock to share.
#[derive(Debug)]
pub struct List<K: Key> {
    id: ListId,
    head: K,
    tail: K,
    len: usize,
    generation: u64,
}

impl<K: Key> Default for List<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> Drop for List<K> {
    fn drop(&mut self) {
        if self.len != 0 {
            log::warn!(
                "{} dropped with {} linked nodes; they can no longer be relinked",
                self.id,
                self.len
            );
        }
    }
}

impl<K: Key> List<K> {
    /// Creates an empty list with a fresh identity.
    #[inline]
    pub fn new() -> Self {
        Self {
            id: ListId::next(),
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            generation: 0,
        }
    }

    /// Returns this list's identity.
    #[inline]
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Returns the number of linked nodes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the structural modification counter.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn front(&self) -> Option<K> {
        self.head.get()
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub fn back(&self) -> Option<K> {
        self.tail.get()
    }

    /// Returns the head node's key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the list is empty.
    #[inline]
    pub fn first(&self) -> Result<K> {
        self.front().ok_or(Error::NoSuchElement)
    }

    /// Returns the tail node's key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the list is empty.
    #[inline]
    pub fn last(&self) -> Result<K> {
        self.back().ok_or(Error::NoSuchElement)
    }

    /// Returns `true` if `key` is a member of this list. O(1).
    #[inline]
    pub fn contains<T, S>(&self, storage: &S, key: K) -> bool
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.member(storage, key).is_ok()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Links a node at the front of the list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] if `key` is not in storage.
    /// - [`Error::AlreadyLinked`] if the node is a member of any list.
    #[inline]
    pub fn push_front<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let head = self.head;
        self.link_before(storage, head, key)
    }

    /// Links a node at the back of the list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] if `key` is not in storage.
    /// - [`Error::AlreadyLinked`] if the node is a member of any list.
    #[inline]
    pub fn push_back<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.link_before(storage, K::NONE, key)
    }

    /// Links a node directly before `before`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] if either key is not in storage.
    /// - [`Error::AlreadyLinked`] if `key` is a member of any list.
    /// - [`Error::NotLinked`] if `before` is not a member of this list.
    #[inline]
    pub fn insert_before<T, S>(&mut self, storage: &mut S, before: K, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.member(storage, before)?;
        self.link_before(storage, before, key)
    }

    /// Links a node directly after `after`.
    ///
    /// # Errors
    ///
    /// Same as [`insert_before`](Self::insert_before).
    #[inline]
    pub fn insert_after<T, S>(&mut self, storage: &mut S, after: K, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let next = self.member(storage, after)?.next;
        self.link_before(storage, next, key)
    }

    /// Links `key` before `at`, where `K::NONE` means the header.
    ///
    /// `at` must be the header or a member of this list.
    pub(crate) fn link_before<T, S>(&mut self, storage: &mut S, at: K, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if link(storage, key)?.is_linked() {
            return Err(Error::AlreadyLinked);
        }
        let prev = self.prev_of(storage, at)?;

        {
            let node = link_mut(storage, key)?;
            node.prev = prev;
            node.next = at;
            node.owner = Some(self.id);
        }
        self.set_next(storage, prev, key)?;
        self.set_prev(storage, at, key)?;

        self.len += 1;
        self.generation += 1;
        Ok(())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Unlinks a node from the list in O(1).
    ///
    /// The node stays in storage with its links and owner cleared.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidKey`] if `key` is not in storage.
    /// - [`Error::NotLinked`] if the node is not a member of this list.
    pub fn remove<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let (prev, next) = {
            let node = self.member(storage, key)?;
            (node.prev, node.next)
        };

        self.set_next(storage, prev, next)?;
        self.set_prev(storage, next, prev)?;
        link_mut(storage, key)?.clear();

        self.len -= 1;
        self.generation += 1;
        Ok(())
    }

    /// Unlinks and returns the head node, or `None` if empty.
    #[inline]
    pub fn pop_front<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let key = self.head.get()?;
        self.remove(storage, key).ok()?;
        Some(key)
    }

    /// Unlinks and returns the tail node, or `None` if empty.
    #[inline]
    pub fn pop_back<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let key = self.tail.get()?;
        self.remove(storage, key).ok()?;
        Some(key)
    }

    /// Unlinks and returns the head node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the list is empty.
    #[inline]
    pub fn remove_first<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let key = self.first()?;
        self.remove(storage, key)?;
        Ok(key)
    }

    /// Unlinks and returns the tail node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchElement`] if the list is empty.
    #[inline]
    pub fn remove_last<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let key = self.last()?;
        self.remove(storage, key)?;
        Ok(key)
    }

    /// Unlinks the first node, scanning from the head, whose value equals
    /// `value`. O(n).
    ///
    /// Returns the removed key, or `None` (list untouched) if nothing matched.
    pub fn remove_first_occurrence<T, S, Q>(&mut self, storage: &mut S, value: &Q) -> Option<K>
    where
        T: Linked<K> + PartialEq<Q>,
        S: Storage<T, Key = K>,
        Q: ?Sized,
    {
        let found = self.keys(storage).find(|&key| Self::matches(storage, key, value))?;
        self.remove(storage, found).ok()?;
        Some(found)
    }

    /// Unlinks the first node, scanning from the tail, whose value equals
    /// `value`. O(n).
    ///
    /// Returns the removed key, or `None` (list untouched) if nothing matched.
    pub fn remove_last_occurrence<T, S, Q>(&mut self, storage: &mut S, value: &Q) -> Option<K>
    where
        T: Linked<K> + PartialEq<Q>,
        S: Storage<T, Key = K>,
        Q: ?Sized,
    {
        let found = self
            .keys(storage)
            .rev()
            .find(|&key| Self::matches(storage, key, value))?;
        self.remove(storage, found).ok()?;
        Some(found)
    }

    #[inline]
    fn matches<T, S, Q>(storage: &S, key: K, value: &Q) -> bool
    where
        T: PartialEq<Q>,
        S: Storage<T, Key = K>,
        Q: ?Sized,
    {
        storage.get(key).is_some_and(|node| node == value)
    }

    /// Unlinks every node, clearing their links and owner. O(n).
    pub fn clear<T, S>(&mut self, storage: &mut S)
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let mut key = self.head;
        let mut released = 0usize;
        while key.is_some() {
            let Some(node) = storage.get_mut(key) else {
                break;
            };
            let link = node.link_mut();
            key = link.next;
            link.clear();
            released += 1;
        }

        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
        self.generation += 1;
        log::trace!("{}: cleared, released {released} nodes", self.id);
    }

    // ========================================================================
    // Relocation
    // ========================================================================

    /// Moves a member node to the front. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLinked`] if the node is not a member of this list.
    pub fn move_to_front<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.member(storage, key)?;
        if self.head == key {
            return Ok(());
        }
        self.remove(storage, key)?;
        let head = self.head;
        self.link_before(storage, head, key)
    }

    /// Moves a member node to the back. O(1).
    ///
    /// Useful for LRU caches: touch an entry by moving it to the back, evict
    /// from the front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLinked`] if the node is not a member of this list.
    pub fn move_to_back<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.member(storage, key)?;
        if self.tail == key {
            return Ok(());
        }
        self.remove(storage, key)?;
        self.link_before(storage, K::NONE, key)
    }

    // ========================================================================
    // Iteration and snapshots
    // ========================================================================

    /// Returns an iterator over member keys, head to tail.
    #[inline]
    pub fn keys<'a, T, S>(&self, storage: &'a S) -> Keys<'a, T, S, K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        Keys {
            storage,
            front: self.head,
            back: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over member nodes, head to tail.
    #[inline]
    pub fn iter<'a, T, S>(&self, storage: &'a S) -> Iter<'a, T, S, K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        Iter {
            keys: self.keys(storage),
        }
    }

    /// Returns the member keys, head to tail. O(n).
    pub fn to_vec<T, S>(&self, storage: &S) -> Vec<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.keys(storage).collect()
    }

    /// Replaces the contents of `out` with the member keys, head to tail,
    /// reusing its allocation. O(n).
    pub fn snapshot_into<T, S>(&self, storage: &S, out: &mut Vec<K>)
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        out.clear();
        out.extend(self.keys(storage));
    }

    // ========================================================================
    // Internals shared with the cursor
    // ========================================================================

    /// Returns the link of `key`, requiring membership in this list.
    pub(crate) fn member<'a, T: 'a, S>(&self, storage: &'a S, key: K) -> Result<&'a Link<K>>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        let node = link(storage, key)?;
        if node.owner == Some(self.id) {
            Ok(node)
        } else {
            Err(Error::NotLinked)
        }
    }

    /// Successor of `key` in the ring; the header's successor is the head.
    #[inline]
    pub(crate) fn next_of<T, S>(&self, storage: &S, key: K) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if key.is_none() {
            Ok(self.head)
        } else {
            Ok(link(storage, key)?.next)
        }
    }

    /// Predecessor of `key` in the ring; the header's predecessor is the tail.
    #[inline]
    pub(crate) fn prev_of<T, S>(&self, storage: &S, key: K) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if key.is_none() {
            Ok(self.tail)
        } else {
            Ok(link(storage, key)?.prev)
        }
    }

    #[inline]
    fn set_next<T, S>(&mut self, storage: &mut S, at: K, to: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if at.is_none() {
            self.head = to;
        } else {
            link_mut(storage, at)?.next = to;
        }
        Ok(())
    }

    #[inline]
    fn set_prev<T, S>(&mut self, storage: &mut S, at: K, to: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        if at.is_none() {
            self.tail = to;
        } else {
            link_mut(storage, at)?.prev = to;
        }
        Ok(())
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over member keys.
pub struct Keys<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S, K> Iterator for Keys<'_, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }

        let key = self.front;
        self.front = link(self.storage, key).ok()?.next;
        self.remaining -= 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S, K> DoubleEndedIterator for Keys<'_, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
    #[inline]
    fn next_back(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }

        let key = self.back;
        self.back = link(self.storage, key).ok()?.prev;
        self.remaining -= 1;
        Some(key)
    }
}

impl<T, S, K> ExactSizeIterator for Keys<'_, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
}

impl<T, S, K> FusedIterator for Keys<'_, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
}

/// Iterator over references to member nodes.
pub struct Iter<'a, T, S, K: Key> {
    keys: Keys<'a, T, S, K>,
}

impl<'a, T: 'a, S, K> Iterator for Iter<'a, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let key = self.keys.next()?;
        let storage = self.keys.storage;
        storage.get(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, T: 'a, S, K> DoubleEndedIterator for Iter<'a, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let key = self.keys.next_back()?;
        let storage = self.keys.storage;
        storage.get(key)
    }
}

impl<'a, T: 'a, S, K> ExactSizeIterator for Iter<'a, T, S, K>
where
    T: Linked<K>,
    S: Storage<T, Key = K>,
    K: Key,
{
}
