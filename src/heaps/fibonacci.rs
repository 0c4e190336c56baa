//! Fibonacci heap.
//!
//! A circular root list of heap-ordered trees; `decrease_key` cuts a
//! node out to the root list and cascades the cut upward through
//! marked ancestors; `delete_min`/`delete` promote children to roots
//! and then consolidate by rank so at most one root survives per
//! rank.
//!
//! The classic fixed `MAXRANK`-sized consolidation array becomes a
//! `Vec` sized to the current consolidation's actual maximum rank.

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct FibNode {
    item: Item,
    key: Key,
    rank: u32,
    marked: bool,
    parent: Option<Handle>,
    first_child: Option<Handle>,
    next_sibling: Handle,
    prev_sibling: Handle,
}

/// Fibonacci heap.
pub struct FibonacciHeap {
    minimum: Option<Handle>,
    size: usize,
    nodes: Slab<FibNode>,
}

impl FibonacciHeap {
    fn collect_ring(&self, start: Handle) -> Vec<Handle> {
        let mut out = vec![start];
        let mut current = self.nodes.get(start).next_sibling;
        while current != start {
            out.push(current);
            current = self.nodes.get(current).next_sibling;
        }
        out
    }

    /// Removes `n` from whatever ring it currently sits in, resetting
    /// it to a self-ring. Returns a surviving ring member, or `None`
    /// if `n` was alone.
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

    fn splice_into_root_list(&mut self, n: Handle) {
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

    fn add_child(&mut self, parent: Handle, child: Handle) {
        self.nodes.get_mut(child).parent = Some(parent);
        self.nodes.get_mut(child).marked = false;
        match self.nodes.get(parent).first_child {
            None => {
                self.nodes.get_mut(child).next_sibling = child;
                self.nodes.get_mut(child).prev_sibling = child;
                self.nodes.get_mut(parent).first_child = Some(child);
            }
            Some(first) => self.ring_insert(first, child),
        }
        self.nodes.get_mut(parent).rank += 1;
    }

    fn remove_child(&mut self, parent: Handle, child: Handle) {
        let remaining = self.ring_remove(child);
        if self.nodes.get(parent).first_child == Some(child) {
            self.nodes.get_mut(parent).first_child = remaining;
        }
        self.nodes.get_mut(parent).rank -= 1;
    }

    /// Detaches `n` from its parent and cascades the cut upward
    /// through marked ancestors.
    fn cut(&mut self, n: Handle) {
        let Some(parent) = self.nodes.get(n).parent else {
            return;
        };
        self.remove_child(parent, n);
        self.splice_into_root_list(n);

        if self.nodes.get(parent).parent.is_some() {
            if !self.nodes.get(parent).marked {
                self.nodes.get_mut(parent).marked = true;
            } else {
                self.cut(parent);
            }
        }
    }

    /// Makes the larger-keyed of `a`/`b` a child of the other; returns the winner.
    fn link(&mut self, a: Handle, b: Handle) -> Handle {
        let (parent, child) = if self.nodes.get(a).key <= self.nodes.get(b).key {
            (a, b)
        } else {
            (b, a)
        };
        self.add_child(parent, child);
        parent
    }

    fn consolidate(&mut self, roots: Vec<Handle>) {
        if roots.is_empty() {
            self.minimum = None;
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
                    Some(other) => {
                        current = self.link(current, other);
                    }
                }
            }
        }

        let finalists: Vec<Handle> = rank_table.into_iter().flatten().collect();
        let n = finalists.len();
        let mut min = finalists[0];
        for (i, &h) in finalists.iter().enumerate() {
            let next = finalists[(i + 1) % n];
            let prev = finalists[(i + n - 1) % n];
            let node = self.nodes.get_mut(h);
            node.next_sibling = next;
            node.prev_sibling = prev;
            node.parent = None;
            if self.nodes.get(h).key < self.nodes.get(min).key {
                min = h;
            }
        }
        self.minimum = Some(min);
    }
}

impl AddressableHeap for FibonacciHeap {
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
        let handle = self.nodes.alloc(FibNode {
            item,
            key,
            rank: 0,
            marked: false,
            parent: None,
            first_child: None,
            next_sibling: Handle::default(),
            prev_sibling: Handle::default(),
        })?;
        self.splice_into_root_list(handle);
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
        let remaining_roots = self.ring_remove(node);
        let mut roots = match remaining_roots {
            Some(r) => self.collect_ring(r),
            None => Vec::new(),
        };
        for &c in &children {
            self.nodes.get_mut(c).parent = None;
            self.nodes.get_mut(c).marked = false;
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
            Some(parent) if new_key < self.nodes.get(parent).key => self.cut(node),
            Some(_) => {}
            None => {
                if let Some(min) = self.minimum {
                    if new_key < self.nodes.get(min).key {
                        self.minimum = Some(node);
                    }
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
        fn check(heap: &FibonacciHeap, node: Handle) -> bool {
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
                let mut ranks = std::collections::HashSet::new();
                for r in heap_roots(self, min) {
                    if !ranks.insert(self.nodes.get(r).rank) {
                        return false;
                    }
                    if !check(self, r) {
                        return false;
                    }
                }
                true
            }
            None => self.size == 0,
        }
    }
}

#[cfg(test)]
fn heap_roots(heap: &FibonacciHeap, min: Handle) -> Vec<Handle> {
    heap.collect_ring(min)
}
