//! Violation heap.
//!
//! A forest where each node's rank is derived from its two most
//! recently attached ("active") children: `rank = ceil((r1+r2)/2)+1`
//! with an absent child contributing -1. At most two roots share a
//! rank after `fix_roots`, which three-way-joins any rank collision
//! instead of the pairwise link Fibonacci/rank-pairing heaps use.
//!
//! A node's parent and active-child status could be derived implicitly
//! by walking ring position, but this implementation keeps an explicit
//! `parent: Option<Handle>` field per node instead (see DESIGN.md) —
//! the externally observable rank and at-most-two-roots-per-rank
//! invariants are unaffected.

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct VNode {
    item: Item,
    key: Key,
    rank: i32,
    parent: Option<Handle>,
    first_child: Option<Handle>,
    next_sibling: Handle,
    prev_sibling: Handle,
}

/// Violation heap.
pub struct ViolationHeap {
    minimum: Option<Handle>,
    size: usize,
    nodes: Slab<VNode>,
}

impl ViolationHeap {
    fn collect_ring(&self, start: Handle) -> Vec<Handle> {
        let mut out = vec![start];
        let mut current = self.nodes.get(start).next_sibling;
        while current != start {
            out.push(current);
            current = self.nodes.get(current).next_sibling;
        }
        out
    }

    fn ring_remove(&mut self, n: Handle) -> Option<Handle> {
        let next = self.nodes.get(n).next_sibling;
        let prev = self.nodes.get(n).prev_sibling;
        self.nodes.get_mut(n).next_sibling = n;
        self.nodes.get_mut(n).prev_sibling = n;
        if next == n {
            None
        } else {
            self.nodes.get_mut(prev).next_sibling = next;
            self.nodes.get_mut(next).prev_sibling = prev;
            Some(next)
        }
    }

    fn ring_insert(&mut self, anchor: Handle, n: Handle) {
        let next = self.nodes.get(anchor).next_sibling;
        self.nodes.get_mut(anchor).next_sibling = n;
        self.nodes.get_mut(n).prev_sibling = anchor;
        self.nodes.get_mut(n).next_sibling = next;
        self.nodes.get_mut(next).prev_sibling = n;
    }

    fn push_root(&mut self, n: Handle) {
        self.nodes.get_mut(n).parent = None;
        self.nodes.get_mut(n).next_sibling = n;
        self.nodes.get_mut(n).prev_sibling = n;
        match self.minimum {
            None => self.minimum = Some(n),
            Some(min) => {
                self.ring_insert(min, n);
                if self.nodes.get(n).key < self.nodes.get(min).key {
                    self.minimum = Some(n);
                }
            }
        }
    }

    /// Makes `child` the most recently attached child of `parent`.
    fn add_child(&mut self, parent: Handle, child: Handle) {
        self.nodes.get_mut(child).parent = Some(parent);
        match self.nodes.get(parent).first_child {
            None => {
                self.nodes.get_mut(child).next_sibling = child;
                self.nodes.get_mut(child).prev_sibling = child;
            }
            Some(first) => self.ring_insert(first, child),
        }
        self.nodes.get_mut(parent).first_child = Some(child);
    }

    /// Splices `old` out of `owner`'s child ring, putting `new` (if
    /// any) into the same ring slot.
    fn replace_child(&mut self, owner: Handle, old: Handle, new: Option<Handle>) {
        let next = self.nodes.get(old).next_sibling;
        let prev = self.nodes.get(old).prev_sibling;
        let was_only = next == old;

        match new {
            None => {
                if was_only {
                    self.nodes.get_mut(owner).first_child = None;
                } else {
                    self.nodes.get_mut(prev).next_sibling = next;
                    self.nodes.get_mut(next).prev_sibling = prev;
                    if self.nodes.get(owner).first_child == Some(old) {
                        self.nodes.get_mut(owner).first_child = Some(next);
                    }
                }
            }
            Some(new) => {
                if was_only {
                    self.nodes.get_mut(new).next_sibling = new;
                    self.nodes.get_mut(new).prev_sibling = new;
                } else {
                    self.nodes.get_mut(prev).next_sibling = new;
                    self.nodes.get_mut(next).prev_sibling = new;
                    self.nodes.get_mut(new).next_sibling = next;
                    self.nodes.get_mut(new).prev_sibling = prev;
                }
                if self.nodes.get(owner).first_child == Some(old) {
                    self.nodes.get_mut(owner).first_child = Some(new);
                }
            }
        }
        self.nodes.get_mut(old).next_sibling = old;
        self.nodes.get_mut(old).prev_sibling = old;
    }

    fn active_children(&self, node: Handle) -> (Option<Handle>, Option<Handle>) {
        match self.nodes.get(node).first_child {
            None => (None, None),
            Some(first) => {
                let next = self.nodes.get(first).next_sibling;
                if next == first {
                    (Some(first), None)
                } else {
                    (Some(first), Some(next))
                }
            }
        }
    }

    fn recompute_rank(&self, node: Handle) -> i32 {
        let (c1, c2) = self.active_children(node);
        let r1 = c1.map(|h| self.nodes.get(h).rank).unwrap_or(-1);
        let r2 = c2.map(|h| self.nodes.get(h).rank).unwrap_or(-1);
        (((r1 + r2) as f64) / 2.0).ceil() as i32 + 1
    }

    fn propagate_ranks(&mut self, mut node: Handle) {
        loop {
            let new_rank = self.recompute_rank(node);
            if new_rank == self.nodes.get(node).rank {
                break;
            }
            self.nodes.get_mut(node).rank = new_rank;
            match self.nodes.get(node).parent {
                Some(p) => node = p,
                None => break,
            }
        }
    }

    /// Detaches `n` from its parent, splicing in `n`'s own
    /// higher-ranked active child in its place, and pushes `n` to the
    /// root list.
    fn cut(&mut self, n: Handle) {
        let parent = self.nodes.get(n).parent.expect("cut called on a root");
        let (c1, c2) = self.active_children(n);
        let replacement = match (c1, c2) {
            (Some(a), Some(b)) => Some(if self.nodes.get(a).rank >= self.nodes.get(b).rank { a } else { b }),
            (Some(a), None) => Some(a),
            _ => None,
        };
        if let Some(r) = replacement {
            self.replace_child(n, r, None);
        }
        self.replace_child(parent, n, replacement);
        if let Some(r) = replacement {
            self.nodes.get_mut(r).parent = Some(parent);
        }
        self.push_root(n);
        let rank = self.recompute_rank(n);
        self.nodes.get_mut(n).rank = rank;
        self.propagate_ranks(parent);
    }

    /// Joins three equal-ranked roots: the smallest-keyed (ties
    /// favor the earliest argument) becomes the parent of the other
    /// two.
    fn triple_join(&mut self, a: Handle, b: Handle, c: Handle) -> Handle {
        let mut parent = a;
        if self.nodes.get(b).key < self.nodes.get(parent).key {
            parent = b;
        }
        if self.nodes.get(c).key < self.nodes.get(parent).key {
            parent = c;
        }
        let mut others: Vec<Handle> = [a, b, c].into_iter().filter(|&h| h != parent).collect();
        others.sort_by_key(|&h| std::cmp::Reverse(self.nodes.get(h).rank));
        self.add_child(parent, others[0]);
        self.add_child(parent, others[1]);
        let rank = self.recompute_rank(parent);
        self.nodes.get_mut(parent).rank = rank;
        parent
    }

    fn consolidate(&mut self, roots: Vec<Handle>) {
        self.minimum = None;
        if roots.is_empty() {
            return;
        }
        let mut bucket: Vec<Option<(Handle, Option<Handle>)>> = Vec::new();
        for root in roots {
            let mut current = root;
            loop {
                let rank = self.nodes.get(current).rank.max(0) as usize;
                if bucket.len() <= rank {
                    bucket.resize(rank + 1, None);
                }
                match bucket[rank].take() {
                    None => {
                        bucket[rank] = Some((current, None));
                        break;
                    }
                    Some((a, None)) => {
                        bucket[rank] = Some((a, Some(current)));
                        break;
                    }
                    Some((a, Some(b))) => current = self.triple_join(a, b, current),
                }
            }
        }
        for slot in bucket.into_iter().flatten() {
            self.push_root(slot.0);
            if let Some(b) = slot.1 {
                self.push_root(b);
            }
        }
    }
}

impl AddressableHeap for ViolationHeap {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            minimum: None,
            size: 0,
            nodes: Slab::with_capacity(capacity),
        }
    }

    fn clear(&mut self) {
        self.minimum = None;
        self.size = 0;
        self.nodes.clear();
    }

    fn insert(&mut self, item: Item, key: Key) -> Result<Handle> {
        let handle = self.nodes.alloc(VNode {
            item,
            key,
            rank: 0,
            parent: None,
            first_child: None,
            next_sibling: Handle::default(),
            prev_sibling: Handle::default(),
        })?;
        self.push_root(handle);
        self.size += 1;
        Ok(handle)
    }

    fn find_min(&self) -> Option<Handle> {
        self.minimum
    }

    fn delete_min(&mut self) -> Option<Key> {
        self.minimum.map(|m| self.delete(m))
    }

    fn delete(&mut self, node: Handle) -> Key {
        let key = self.nodes.get(node).key;
        if self.nodes.get(node).parent.is_some() {
            self.cut(node);
        }

        let children = match self.nodes.get(node).first_child {
            Some(fc) => self.collect_ring(fc),
            None => Vec::new(),
        };
        let remaining = self.ring_remove(node);
        let mut roots = match remaining {
            Some(r) => self.collect_ring(r),
            None => Vec::new(),
        };
        for &c in &children {
            self.nodes.get_mut(c).parent = None;
        }
        roots.extend(children);

        self.consolidate(roots);
        self.nodes.free(node);
        self.size -= 1;
        key
    }

    fn decrease_key(&mut self, node: Handle, new_key: Key) {
        let current = self.nodes.get(node).key;
        debug_assert!(new_key <= current, "decrease_key called with a greater key");
        self.nodes.get_mut(node).key = new_key;

        match self.nodes.get(node).parent {
            None => {
                if let Some(min) = self.minimum {
                    if new_key < self.nodes.get(min).key {
                        self.minimum = Some(node);
                    }
                }
            }
            Some(parent) => {
                if new_key < self.nodes.get(parent).key {
                    self.cut(node);
                }
            }
        }
    }

    fn key_of(&self, node: Handle) -> Key {
        self.nodes.get(node).key
    }

    fn item_of(&self, node: Handle) -> Item {
        self.nodes.get(node).item
    }

    fn len(&self) -> usize {
        self.size
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        fn check(heap: &ViolationHeap, node: Handle) -> bool {
            let Some(first) = heap.nodes.get(node).first_child else {
                return true;
            };
            let mut current = first;
            loop {
                if heap.nodes.get(current).key < heap.nodes.get(node).key {
                    return false;
                }
                if heap.nodes.get(current).parent != Some(node) || !check(heap, current) {
                    return false;
                }
                current = heap.nodes.get(current).next_sibling;
                if current == first {
                    break;
                }
            }
            true
        }
        match self.minimum {
            Some(min) => {
                let roots = self.collect_ring(min);
                let mut counts = std::collections::HashMap::new();
                for &r in &roots {
                    *counts.entry(self.nodes.get(r).rank).or_insert(0) += 1;
                    if !check(self, r) {
                        return false;
                    }
                }
                counts.values().all(|&c| c <= 2)
            }
            None => self.size == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut heap = ViolationHeap::with_capacity(16);
        for k in [5, 3, 8, 1, 4, 7, 2, 6] {
            heap.insert(k, k).unwrap();
        }
        let mut drained = Vec::new();
        while let Some(k) = heap.delete_min() {
            drained.push(k);
        }
        assert_eq!(drained, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn decrease_to_new_min() {
        let mut heap = ViolationHeap::with_capacity(8);
        let handles: Vec<_> = [10, 20, 30].into_iter().map(|k| heap.insert(k, k).unwrap()).collect();
        heap.decrease_key(handles[2], 5);
        assert_eq!(heap.key_of(heap.find_min().unwrap()), 5);
    }

    #[test]
    fn delete_middle_node() {
        let mut heap = ViolationHeap::with_capacity(8);
        let handles: Vec<_> = [5, 2, 8, 1, 9, 3].into_iter().map(|k| heap.insert(k, k).unwrap()).collect();
        heap.delete(handles[2]);
        let mut drained = Vec::new();
        while let Some(k) = heap.delete_min() {
            drained.push(k);
        }
        assert_eq!(drained, vec![1, 2, 3, 5, 9]);
    }

    #[test]
    fn clear_then_reuse() {
        let mut heap = ViolationHeap::with_capacity(4);
        heap.insert(1, 1).unwrap();
        heap.insert(2, 2).unwrap();
        heap.clear();
        assert!(heap.is_empty());
        heap.insert(7, 7).unwrap();
        assert_eq!(heap.delete_min(), Some(7));
    }
}
