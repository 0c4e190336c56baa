//! Rank-pairing heap (type-1).
//!
//! A forest of half trees: every root has a left child only. The
//! `right` field on a node is reused — for a non-root it is a real
//! right child, for a root it instead links the circular root list.
//! This overload is kept literally (unlike the explicit/violation/
//! quake variants) since it is exactly the structural invariant this
//! variant is documented to hold.
//!
//! Deletion here promotes a deleted node's children to roots and
//! recursively flattens any right-child chain it exposes, rather than
//! the paper's one-pass/multi-pass two-phase root-merge, which gives
//! up some of the amortized bound in exchange for a much simpler,
//! still-correct reconsolidation — see DESIGN.md.

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct RpNode {
    item: Item,
    key: Key,
    rank: u32,
    parent: Option<Handle>,
    left: Option<Handle>,
    /// Right child when `parent.is_some()`; next root in the circular
    /// root list when this node is itself a root.
    right: Option<Handle>,
}

/// Rank-pairing heap.
pub struct RankPairingHeap {
    minimum: Option<Handle>,
    size: usize,
    nodes: Slab<RpNode>,
}

impl RankPairingHeap {
    fn rank_of(&self, node: Option<Handle>) -> i64 {
        match node {
            Some(h) => self.nodes.get(h).rank as i64,
            None => -1,
        }
    }

    fn right_child_rank(&self, node: Handle) -> i64 {
        if self.nodes.get(node).parent.is_none() {
            -1
        } else {
            self.rank_of(self.nodes.get(node).right)
        }
    }

    fn propagate_ranks(&mut self, mut node: Handle) {
        loop {
            let rl = self.rank_of(self.nodes.get(node).left);
            let rr = self.right_child_rank(node);
            let new_rank = if (rl - rr).abs() <= 1 {
                rl.max(rr) + 1
            } else {
                rl.min(rr) + 1
            }
            .max(0) as u32;

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

    fn push_root(&mut self, n: Handle) {
        self.nodes.get_mut(n).parent = None;
        match self.minimum {
            None => {
                self.nodes.get_mut(n).right = Some(n);
                self.minimum = Some(n);
            }
            Some(min) => {
                self.nodes.get_mut(n).right = self.nodes.get(min).right;
                self.nodes.get_mut(min).right = Some(n);
                if self.nodes.get(n).key < self.nodes.get(min).key {
                    self.minimum = Some(n);
                }
            }
        }
    }

    fn root_ring(&self) -> Vec<Handle> {
        let Some(start) = self.minimum else {
            return Vec::new();
        };
        let mut out = vec![start];
        let mut current = self.nodes.get(start).right.unwrap();
        while current != start {
            out.push(current);
            current = self.nodes.get(current).right.unwrap();
        }
        out
    }

    fn remove_root(&mut self, target: Handle) {
        let Some(only) = self.nodes.get(target).right else {
            return;
        };
        if only == target {
            self.minimum = None;
            return;
        }
        let mut pred = only;
        while self.nodes.get(pred).right != Some(target) {
            pred = self.nodes.get(pred).right.unwrap();
        }
        let after = self.nodes.get(target).right.unwrap();
        self.nodes.get_mut(pred).right = Some(after);
        if self.minimum == Some(target) {
            self.minimum = Some(after);
        }
    }

    /// Makes the higher-keyed of `a`/`b` the left child of the
    /// other, preserving the loser's old left subtree as the new
    /// child's right attachment.
    fn join(&mut self, a: Handle, b: Handle) -> Handle {
        let (parent, child) = if self.nodes.get(a).key <= self.nodes.get(b).key {
            (a, b)
        } else {
            (b, a)
        };
        let old_left = self.nodes.get(parent).left;
        self.nodes.get_mut(child).right = old_left;
        if let Some(ol) = old_left {
            self.nodes.get_mut(ol).parent = Some(child);
        }
        self.nodes.get_mut(child).parent = Some(parent);
        self.nodes.get_mut(parent).left = Some(child);
        self.nodes.get_mut(parent).rank += 1;
        parent
    }

    fn consolidate(&mut self, roots: Vec<Handle>) {
        self.minimum = None;
        if roots.is_empty() {
            return;
        }
        let mut rank_table: Vec<Option<Handle>> = Vec::new();
        for root in roots {
            let mut current = root;
            loop {
                let rank = self.nodes.get(current).rank as usize;
                if rank_table.len() <= rank {
                    rank_table.resize(rank + 1, None);
                }
                match rank_table[rank].take() {
                    None => {
                        rank_table[rank] = Some(current);
                        break;
                    }
                    Some(other) => current = self.join(current, other),
                }
            }
        }
        for h in rank_table.into_iter().flatten() {
            self.push_root(h);
        }
    }

    /// Recursively detaches `x` (currently a non-root child) and any
    /// right-child chain it exposes, pushing each onto the root list.
    fn promote_subtree(&mut self, x: Handle) {
        let right = self.nodes.get(x).right;
        self.push_root(x);
        if let Some(r) = right {
            self.promote_subtree(r);
        }
    }
}

impl AddressableHeap for RankPairingHeap {
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
        let handle = self.nodes.alloc(RpNode {
            item,
            key,
            rank: 0,
            parent: None,
            left: None,
            right: None,
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
        let was_root = self.nodes.get(node).parent.is_none();

        if was_root {
            self.remove_root(node);
        } else {
            let parent = self.nodes.get(node).parent.unwrap();
            if self.nodes.get(parent).left == Some(node) {
                self.nodes.get_mut(parent).left = None;
            } else {
                self.nodes.get_mut(parent).right = None;
            }
            self.propagate_ranks(parent);
        }

        let left = self.nodes.get(node).left;
        let right = self.nodes.get(node).right;

        if let Some(l) = left {
            self.promote_subtree(l);
        }
        if !was_root {
            if let Some(r) = right {
                self.promote_subtree(r);
            }
        }

        let roots = self.root_ring();
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
                let replacement = self.nodes.get(node).right;
                if self.nodes.get(parent).left == Some(node) {
                    self.nodes.get_mut(parent).left = replacement;
                } else {
                    self.nodes.get_mut(parent).right = replacement;
                }
                if let Some(r) = replacement {
                    self.nodes.get_mut(r).parent = Some(parent);
                }
                self.push_root(node);
                self.propagate_ranks(parent);
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
        fn check(heap: &RankPairingHeap, node: Handle, is_root: bool) -> bool {
            if let Some(l) = heap.nodes.get(node).left {
                if heap.nodes.get(l).key < heap.nodes.get(node).key {
                    return false;
                }
                if !check(heap, l, false) {
                    return false;
                }
            }
            if !is_root {
                if let Some(r) = heap.nodes.get(node).right {
                    if heap.nodes.get(r).key < heap.nodes.get(node).key {
                        return false;
                    }
                    if !check(heap, r, false) {
                        return false;
                    }
                }
            }
            true
        }
        for r in self.root_ring() {
            if !check(self, r, true) {
                return false;
            }
        }
        self.minimum.is_some() || self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut heap = RankPairingHeap::with_capacity(16);
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
        let mut heap = RankPairingHeap::with_capacity(8);
        let handles: Vec<_> = [10, 20, 30].into_iter().map(|k| heap.insert(k, k).unwrap()).collect();
        heap.decrease_key(handles[2], 5);
        assert_eq!(heap.key_of(heap.find_min().unwrap()), 5);
    }

    #[test]
    fn delete_middle_node() {
        let mut heap = RankPairingHeap::with_capacity(8);
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
        let mut heap = RankPairingHeap::with_capacity(4);
        heap.insert(1, 1).unwrap();
        heap.insert(2, 2).unwrap();
        heap.clear();
        assert!(heap.is_empty());
        heap.insert(7, 7).unwrap();
        assert_eq!(heap.delete_min(), Some(7));
    }
}
