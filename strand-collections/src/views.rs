//! Queue, deque and stack views over a [`List`].
//!
//! Generic code that needs one of these capabilities can take any
//! implementor; [`List`] implements all three by delegating to its own
//! methods, so no state is duplicated.
//!
//! ```
//! use strand_collections::{Link, List, Queue, Stack};
//!
//! fn drain<Q: Queue<usize>>(queue: &mut Q, nodes: &mut Vec<Link<usize>>) -> Vec<usize> {
//!     let mut out = Vec::new();
//!     while let Some(key) = queue.poll(nodes) {
//!         out.push(key);
//!     }
//!     out
//! }
//!
//! let mut nodes: Vec<Link<usize>> = (0..3).map(|_| Link::new()).collect();
//! let mut list = List::new();
//!
//! Stack::push(&mut list, &mut nodes, 0)?;
//! Stack::push(&mut list, &mut nodes, 1)?;
//! Queue::offer(&mut list, &mut nodes, 2)?;
//!
//! assert_eq!(drain(&mut list, &mut nodes), [1, 0, 2]);
//! # Ok::<(), strand_collections::Error>(())
//! ```

use crate::{Key, Linked, List, Result, Storage};

/// First-in, first-out access.
pub trait Queue<K: Key> {
    /// Adds a node at the tail.
    fn offer<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Removes the head, or `None` if empty.
    fn poll<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Removes the head, failing if empty.
    fn dequeue<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Returns the head, or `None` if empty.
    fn peek(&self) -> Option<K>;

    /// Returns the head, failing if empty.
    fn element(&self) -> Result<K>;
}

/// Double-ended access.
pub trait Deque<K: Key>: Queue<K> {
    /// Adds a node at the head.
    fn offer_first<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Adds a node at the tail.
    fn offer_last<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Removes the head, or `None` if empty.
    fn poll_first<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Removes the tail, or `None` if empty.
    fn poll_last<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Returns the head, or `None` if empty.
    fn peek_first(&self) -> Option<K>;

    /// Returns the tail, or `None` if empty.
    fn peek_last(&self) -> Option<K>;
}

/// Last-in, first-out access at the head.
pub trait Stack<K: Key> {
    /// Pushes a node onto the top.
    fn push<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Pops the top node, failing if empty.
    fn pop<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>;

    /// Returns the top node, or `None` if empty.
    fn top(&self) -> Option<K>;
}

impl<K: Key> Queue<K> for List<K> {
    #[inline]
    fn offer<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.push_back(storage, key)
    }

    #[inline]
    fn poll<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.pop_front(storage)
    }

    #[inline]
    fn dequeue<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.remove_first(storage)
    }

    #[inline]
    fn peek(&self) -> Option<K> {
        self.front()
    }

    #[inline]
    fn element(&self) -> Result<K> {
        self.first()
    }
}

impl<K: Key> Deque<K> for List<K> {
    #[inline]
    fn offer_first<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.push_front(storage, key)
    }

    #[inline]
    fn offer_last<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.push_back(storage, key)
    }

    #[inline]
    fn poll_first<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.pop_front(storage)
    }

    #[inline]
    fn poll_last<T, S>(&mut self, storage: &mut S) -> Option<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.pop_back(storage)
    }

    #[inline]
    fn peek_first(&self) -> Option<K> {
        self.front()
    }

    #[inline]
    fn peek_last(&self) -> Option<K> {
        self.back()
    }
}

impl<K: Key> Stack<K> for List<K> {
    #[inline]
    fn push<T, S>(&mut self, storage: &mut S, key: K) -> Result<()>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.push_front(storage, key)
    }

    #[inline]
    fn pop<T, S>(&mut self, storage: &mut S) -> Result<K>
    where
        T: Linked<K>,
        S: Storage<T, Key = K>,
    {
        self.remove_first(storage)
    }

    #[inline]
    fn top(&self) -> Option<K> {
        self.front()
    }
}
