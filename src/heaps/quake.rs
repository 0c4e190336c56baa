//! Quake heap.
//!
//! A forest of multiway trees indexed by height rather than rank, in
//! which joining two equal-height trees keeps a record of the
//! join: the winner's pre-join state is cloned into a fresh duplicate
//! node that becomes its new left child, while the loser becomes its
//! right child. Deleting a node discards its whole duplicate chain
//! (the join history that only ever pointed at earlier versions of
//! itself) and scatters every right child along that chain back out
//! as an independent root, since each one is a real, still-live
//! subtree. `decrease_key` stays a plain O(1) detach-to-root with no
//! cascading cut.
//!
//! Height imbalance from repeated deletions is caught after the fact
//! by a decay check: if the population at some height `h` exceeds
//! `ALPHA` times the population at `h - 1`, every root at or above `h`
//! is pruned — unwound one duplicate at a time, each unwinding
//! dropping the node back to its pre-join state and re-pruning the
//! subtree that join had absorbed — until its height falls below `h`.

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

/// A root whose height exceeds `ALPHA` times the population one level down is pruned.
const ALPHA: f64 = 0.75;

struct QNode {
    item: Item,
    key: Key,
    height: u32,
    parent: Option<Handle>,
    /// Join-history duplicate, present whenever `height > 0`.
    left: Option<Handle>,
    /// The subtree absorbed by the most recent join at this node.
    right: Option<Handle>,
    next_root: Handle,
    prev_root: Handle,
}

/// Quake heap. Every join clones the winning node, so the allocator
/// backing a quake heap is sized at twice the expected live-item
/// count: each live item can have at most one duplicate outstanding
/// at a time.
pub struct QuakeHeap {
    minimum: Option<Handle>,
    size: usize,
    nodes: Slab<QNode>,
}

impl QuakeHeap {
    fn push_root(&mut self, n: Handle) {
        self.nodes.get_mut(n).parent = None;
        match self.minimum {
            None => {
                self.nodes.get_mut(n).next_root = n;
                self.nodes.get_mut(n).prev_root = n;
                self.minimum = Some(n);
            }
            Some(min) => {
                let next = self.nodes.get(min).next_root;
                self.nodes.get_mut(min).next_root = n;
                self.nodes.get_mut(n).prev_root = min;
                self.nodes.get_mut(n).next_root = next;
                self.nodes.get_mut(next).prev_root = n;
                if self.nodes.get(n).key < self.nodes.get(min).key {
                    self.minimum = Some(n);
                }
            }
        }
    }

    fn remove_root(&mut self, n: Handle) {
        let next = self.nodes.get(n).next_root;
        let prev = self.nodes.get(n).prev_root;
        if next == n {
            self.minimum = None;
        } else {
            self.nodes.get_mut(prev).next_root = next;
            self.nodes.get_mut(next).prev_root = prev;
            if self.minimum == Some(n) {
                self.minimum = Some(next);
            }
        }
    }

    fn root_ring(&self) -> Vec<Handle> {
        let Some(start) = self.minimum else {
            return Vec::new();
        };
        let mut out = vec![start];
        let mut current = self.nodes.get(start).next_root;
        while current != start {
            out.push(current);
            current = self.nodes.get(current).next_root;
        }
        out
    }

    /// Joins two equal-height roots: the smaller-keyed becomes the
    /// parent, its pre-join state is cloned into a new left child, and
    /// the other root becomes its right child.
    fn join(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        let (parent, child) = if self.nodes.get(a).key <= self.nodes.get(b).key {
            (a, b)
        } else {
            (b, a)
        };

        let (old_left, old_right, height, item, key) = {
            let p = self.nodes.get(parent);
            (p.left, p.right, p.height, p.item, p.key)
        };
        let duplicate = self.nodes.alloc(QNode {
            item,
            key,
            height,
            parent: Some(parent),
            left: old_left,
            right: old_right,
            next_root: Handle::default(),
            prev_root: Handle::default(),
        })?;
        if let Some(l) = old_left {
            self.nodes.get_mut(l).parent = Some(duplicate);
        }
        if let Some(r) = old_right {
            self.nodes.get_mut(r).parent = Some(duplicate);
        }

        self.nodes.get_mut(child).parent = Some(parent);
        self.nodes.get_mut(parent).parent = None;
        self.nodes.get_mut(parent).left = Some(duplicate);
        self.nodes.get_mut(parent).right = Some(child);
        self.nodes.get_mut(parent).height = height + 1;

        Ok(parent)
    }

    fn consolidate(&mut self, roots: Vec<Handle>) {
        self.minimum = None;
        if roots.is_empty() {
            return;
        }
        let mut height_table: Vec<Option<Handle>> = Vec::new();
        for root in roots {
            let mut current = root;
            loop {
                let height = self.nodes.get(current).height as usize;
                if height_table.len() <= height {
                    height_table.resize(height + 1, None);
                }
                match height_table[height].take() {
                    None => {
                        height_table[height] = Some(current);
                        break;
                    }
                    Some(other) => {
                        current = self
                            .join(current, other)
                            .expect("quake heap exceeded its reserved clone capacity");
                    }
                }
            }
        }
        for h in height_table.into_iter().flatten() {
            self.push_root(h);
        }
    }

    /// Counts live nodes (real and duplicate alike) by height, walking
    /// every root's full `left`/`right` structure.
    fn census(&self) -> Vec<Vec<Handle>> {
        let mut by_height: Vec<Vec<Handle>> = Vec::new();
        let mut stack = self.root_ring();
        while let Some(node) = stack.pop() {
            let height = self.nodes.get(node).height as usize;
            if by_height.len() <= height {
                by_height.resize(height + 1, Vec::new());
            }
            by_height[height].push(node);
            if let Some(l) = self.nodes.get(node).left {
                stack.push(l);
            }
            if let Some(r) = self.nodes.get(node).right {
                stack.push(r);
            }
        }
        by_height
    }

    /// Finds the smallest height whose population exceeds `ALPHA`
    /// times the population one level below, and prunes every root at
    /// or above that height back under it.
    fn fix_decay(&mut self) {
        if self.size == 0 {
            return;
        }
        let by_height = self.census();
        let violation =
            (1..by_height.len()).find(|&i| (by_height[i].len() as f64) > ALPHA * (by_height[i - 1].len() as f64));
        let Some(h) = violation else {
            return;
        };
        let h = h as u32;
        for root in self.root_ring() {
            if self.nodes.get(root).height >= h {
                self.prune(root, h);
            }
        }
    }

    /// Unwinds `node`'s join history one duplicate at a time until its
    /// height drops below `violation_height`. At each step the
    /// current right child (the subtree absorbed by that join) is
    /// itself pruned before being discarded, and the duplicate's own
    /// children are adopted back into `node` in its place.
    fn prune(&mut self, node: Handle, violation_height: u32) {
        if self.nodes.get(node).height < violation_height {
            if self.nodes.get(node).parent.is_some() {
                self.push_root(node);
            }
            return;
        }

        let duplicate = self
            .nodes
            .get(node)
            .left
            .expect("a node at or above the violation height always carries a join duplicate");
        if let Some(child) = self.nodes.get(node).right {
            self.prune(child, violation_height);
        }

        let dup_left = self.nodes.get(duplicate).left;
        let dup_right = self.nodes.get(duplicate).right;
        self.nodes.get_mut(node).left = dup_left;
        if let Some(l) = dup_left {
            self.nodes.get_mut(l).parent = Some(node);
        }
        self.nodes.get_mut(node).right = dup_right;
        if let Some(r) = dup_right {
            self.nodes.get_mut(r).parent = Some(node);
        }
        self.nodes.free(duplicate);
        self.nodes.get_mut(node).height -= 1;

        self.prune(node, violation_height);
    }

    /// Detaches `node` from wherever it sits, frees its whole
    /// duplicate (`left`) chain, and re-roots the real subtree
    /// (`right`) it was most recently joined with.
    fn cut(&mut self, node: Handle) {
        match self.nodes.get(node).parent {
            Some(p) => {
                if self.nodes.get(p).left == Some(node) {
                    self.nodes.get_mut(p).left = None;
                } else {
                    self.nodes.get_mut(p).right = None;
                }
            }
            None => self.remove_root(node),
        }

        let left = self.nodes.get(node).left;
        let right = self.nodes.get(node).right;
        if let Some(l) = left {
            self.cut(l);
        }
        if let Some(r) = right {
            self.push_root(r);
        }
        self.nodes.free(node);
    }
}

impl AddressableHeap for QuakeHeap {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            minimum: None,
            size: 0,
            nodes: Slab::with_capacity(capacity * 2),
        }
    }

    fn clear(&mut self) {
        self.minimum = None;
        self.size = 0;
        self.nodes.clear();
    }

    fn insert(&mut self, item: Item, key: Key) -> Result<Handle> {
        let handle = self.nodes.alloc(QNode {
            item,
            key,
            height: 0,
            parent: None,
            left: None,
            right: None,
            next_root: Handle::default(),
            prev_root: Handle::default(),
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
        self.cut(node);
        self.size -= 1;

        let roots = self.root_ring();
        self.consolidate(roots);
        self.fix_decay();
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
                if self.nodes.get(parent).left == Some(node) {
                    self.nodes.get_mut(parent).left = None;
                } else {
                    self.nodes.get_mut(parent).right = None;
                }
                self.push_root(node);
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
        fn check(heap: &QuakeHeap, node: Handle) -> bool {
            let mut ok = true;
            if let Some(l) = heap.nodes.get(node).left {
                if heap.nodes.get(l).key < heap.nodes.get(node).key {
                    ok = false;
                }
                if heap.nodes.get(l).parent != Some(node) || !check(heap, l) {
                    ok = false;
                }
            }
            if let Some(r) = heap.nodes.get(node).right {
                if heap.nodes.get(r).key < heap.nodes.get(node).key {
                    ok = false;
                }
                if heap.nodes.get(r).parent != Some(node) || !check(heap, r) {
                    ok = false;
                }
            }
            ok
        }

        let structure_ok = match self.minimum {
            Some(_) => self.root_ring().iter().all(|&r| check(self, r)),
            None => self.size == 0,
        };
        if !structure_ok {
            return false;
        }

        let by_height = self.census();
        (1..by_height.len()).all(|i| (by_height[i].len() as f64) <= ALPHA * (by_height[i - 1].len() as f64))
    }
}
