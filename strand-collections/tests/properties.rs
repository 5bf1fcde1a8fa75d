//! Randomized checks against simple reference models.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use strand_collections::{DisjointSet, Error, Link, List};

const SEEDS: [u64; 4] = [1, 7, 12345, 0xdead_beef];

/// Naive partition: one label per element, relabel on merge.
struct Labels(Vec<usize>);

impl Labels {
    fn new(n: usize) -> Self {
        Self((0..n).collect())
    }

    fn connected(&self, a: usize, b: usize) -> bool {
        self.0[a] == self.0[b]
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (from, to) = (self.0[a], self.0[b]);
        if from == to {
            return false;
        }
        for label in &mut self.0 {
            if *label == from {
                *label = to;
            }
        }
        true
    }
}

#[test]
fn union_find_matches_model() {
    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = rng.gen_range(1..200);
        let mut sets = DisjointSet::new(n).unwrap();
        let mut model = Labels::new(n);

        for _ in 0..n * 2 {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            let before = sets.distinct_count();

            let merged = sets.union(a, b).unwrap();
            assert_eq!(merged, model.union(a, b));
            assert!(sets.connected(a, b).unwrap());

            let after = sets.distinct_count();
            if merged {
                assert_eq!(after, before - 1);
            } else {
                assert_eq!(after, before);
            }
            assert!((1..=n).contains(&after));
            assert_eq!(sets.all_connected(), after == 1);

            let x = rng.gen_range(0..n);
            let y = rng.gen_range(0..n);
            assert_eq!(sets.connected(x, y).unwrap(), model.connected(x, y));
        }
    }
}

#[test]
fn connectivity_is_an_equivalence() {
    let mut rng = SmallRng::seed_from_u64(99);
    let n = 40;
    let mut sets = DisjointSet::new(n).unwrap();
    for _ in 0..30 {
        sets.union(rng.gen_range(0..n), rng.gen_range(0..n)).unwrap();
    }

    for a in 0..n {
        assert!(sets.connected(a, a).unwrap());
        for b in 0..n {
            let ab = sets.connected(a, b).unwrap();
            assert_eq!(ab, sets.connected(b, a).unwrap());
            if !ab {
                continue;
            }
            for c in 0..n {
                if sets.connected(b, c).unwrap() {
                    assert!(sets.connected(a, c).unwrap());
                }
            }
        }
    }

    // Queries do not change the answer.
    let snapshot: Vec<usize> = (0..n).map(|i| sets.find(i).unwrap()).collect();
    let again: Vec<usize> = (0..n).map(|i| sets.find(i).unwrap()).collect();
    assert_eq!(snapshot, again);
}

#[test]
fn union_find_bounds() {
    let mut sets = DisjointSet::new(5).unwrap();
    assert_eq!(
        sets.connected(5, 0),
        Err(Error::OutOfBounds { index: 5, len: 5 })
    );
    assert_eq!(DisjointSet::new(0).unwrap_err(), Error::ZeroSize);
}

#[test]
fn list_matches_model() {
    const NODES: usize = 64;

    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut storage: Vec<Link<usize>> = (0..NODES).map(|_| Link::new()).collect();
        let mut list = List::new();
        let mut model: VecDeque<usize> = VecDeque::new();
        let (mut inserted, mut removed) = (0usize, 0usize);

        for _ in 0..2_000 {
            let key = rng.gen_range(0..NODES);
            match rng.gen_range(0..6) {
                0 => {
                    let result = list.push_back(&mut storage, key);
                    if model.contains(&key) {
                        assert_eq!(result, Err(Error::AlreadyLinked));
                    } else {
                        result.unwrap();
                        model.push_back(key);
                        inserted += 1;
                    }
                }
                1 => {
                    let result = list.push_front(&mut storage, key);
                    if model.contains(&key) {
                        assert_eq!(result, Err(Error::AlreadyLinked));
                    } else {
                        result.unwrap();
                        model.push_front(key);
                        inserted += 1;
                    }
                }
                2 => {
                    let result = list.remove(&mut storage, key);
                    if let Some(pos) = model.iter().position(|&k| k == key) {
                        result.unwrap();
                        model.remove(pos);
                        removed += 1;
                        assert!(!storage[key].is_linked());
                    } else {
                        assert_eq!(result, Err(Error::NotLinked));
                    }
                }
                3 => {
                    let popped = list.pop_front(&mut storage);
                    assert_eq!(popped, model.pop_front());
                    removed += usize::from(popped.is_some());
                }
                4 => {
                    let popped = list.pop_back(&mut storage);
                    assert_eq!(popped, model.pop_back());
                    removed += usize::from(popped.is_some());
                }
                _ => {
                    if let Some(pos) = model.iter().position(|&k| k == key) {
                        list.move_to_back(&mut storage, key).unwrap();
                        model.remove(pos);
                        model.push_back(key);
                    } else {
                        assert_eq!(list.move_to_back(&mut storage, key), Err(Error::NotLinked));
                    }
                }
            }

            assert_eq!(list.len(), inserted - removed);
            assert_eq!(list.len(), model.len());
            assert_eq!(list.front(), model.front().copied());
            assert_eq!(list.back(), model.back().copied());
        }

        assert!(list.keys(&storage).eq(model.iter().copied()));
        assert!(list.keys(&storage).rev().eq(model.iter().rev().copied()));

        for (key, node) in storage.iter().enumerate() {
            assert_eq!(node.is_linked(), model.contains(&key));
        }
    }
}

#[test]
fn cursor_removal_matches_model() {
    for seed in SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = rng.gen_range(1..50);
        let mut storage: Vec<Link<usize>> = (0..n).map(|_| Link::new()).collect();
        let mut list = List::new();
        for key in 0..n {
            list.push_back(&mut storage, key).unwrap();
        }

        let start = rng.gen_range(0..=n);
        let mut cursor = list.cursor(&storage, start).unwrap();
        let mut expected: Vec<usize> = (0..n).collect();

        // Walk to the end removing at random, then back to the start.
        while cursor.has_next(&list) {
            let key = cursor.next(&list, &storage).unwrap();
            if rng.gen_bool(0.3) {
                assert_eq!(cursor.remove(&mut list, &mut storage), Ok(key));
                expected.retain(|&k| k != key);
            }
        }
        while cursor.has_previous() {
            let key = cursor.previous(&list, &storage).unwrap();
            if rng.gen_bool(0.3) {
                assert_eq!(cursor.remove(&mut list, &mut storage), Ok(key));
                expected.retain(|&k| k != key);
            }
        }

        assert_eq!(cursor.next_index(), 0);
        assert_eq!(list.to_vec(&storage), expected);
    }
}

#[test]
fn independent_cursors_fail_fast() {
    let mut storage: Vec<Link<usize>> = (0..5).map(|_| Link::new()).collect();
    let mut list = List::new();
    for key in 0..5 {
        list.push_back(&mut storage, key).unwrap();
    }

    let mut walker = list.cursor(&storage, 0).unwrap();
    let mut remover = list.cursor(&storage, 2).unwrap();

    walker.next(&list, &storage).unwrap();
    remover.next(&list, &storage).unwrap();
    remover.remove(&mut list, &mut storage).unwrap();

    let err = walker.next(&list, &storage).unwrap_err();
    assert!(matches!(err, Error::ConcurrentModification { .. }));
}
