//! Union-find and intrusive linked lists for building larger algorithms.
//!
//! Two independent structures:
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`DisjointSet`] | Connectivity, Kruskal, clustering | near-O(1) `union` / `connected` |
//! | [`List`] | LRU queues, O(1)-removal work queues | O(1) push/pop/remove/relocate |
//!
//! # Storage is the caller's
//!
//! [`List`] follows the "separate storage from structure" model:
//!
//! ```text
//! Storage (Vec, HashMap, Slab) - owns nodes, provides stable keys
//! List                          - links keys, never allocates or frees
//! ```
//!
//! A node embeds a [`Link`] and implements [`Linked`]. The link records the
//! node's neighbours and which list owns it, so a node is in at most one list
//! and can be removed or moved in O(1) from just its key.
//!
//! ```
//! use strand_collections::{Link, Linked, List};
//!
//! struct Page {
//!     addr: u64,
//!     lru: Link<usize>,
//! }
//!
//! impl Linked<usize> for Page {
//!     fn link(&self) -> &Link<usize> { &self.lru }
//!     fn link_mut(&mut self) -> &mut Link<usize> { &mut self.lru }
//! }
//!
//! let mut pages: Vec<Page> = (0..3)
//!     .map(|i| Page { addr: i * 4096, lru: Link::new() })
//!     .collect();
//! let mut lru = List::new();
//!
//! for key in 0..3 {
//!     lru.push_back(&mut pages, key)?;
//! }
//!
//! // Touch page 0, then evict the coldest.
//! lru.move_to_back(&mut pages, 0)?;
//! let victim = lru.pop_front(&mut pages).unwrap();
//! assert_eq!(pages[victim].addr, 4096);
//! # Ok::<(), strand_collections::Error>(())
//! ```
//!
//! # Errors
//!
//! Every contract violation comes back as an [`Error`]; nothing panics on
//! bad input and a failing call changes nothing.
//!
//! # Thread safety
//!
//! None. Both structures are single-threaded; share them behind a lock.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`
//! - `serde` - Enable `Serialize`/`Deserialize` for [`DisjointSet`]

#![warn(missing_docs)]

pub mod cursor;
pub mod error;
pub mod key;
pub mod linked;
pub mod storage;
pub mod union_find;
pub mod views;

pub use cursor::{Cursor, Descending};
pub use error::{Error, ErrorKind, Result};
pub use key::Key;
pub use linked::{Iter, Keys, Link, Linked, List, ListId};
pub use storage::Storage;
pub use union_find::{DisjointSet, Slot};
pub use views::{Deque, Queue, Stack};
