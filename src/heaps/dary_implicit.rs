//! Implicit d-ary heap: a complete d-ary tree packed into an array,
//! with each node's current array position cached alongside it so
//! `decrease_key`/`delete` can locate it without a scan.
//!
//! A sift chain overwrites slots with the moving element's future
//! neighbors and only writes the moving element once, at its final
//! resting place. The root sits at index 0 for every `D` rather than
//! at a power-of-two offset; an offset trick that packs a complete
//! binary tree with its root at a computed power-of-two position
//! relies on leaving uninitialized padding slots ahead of the root,
//! which doesn't mesh with handle-based node storage.

use super::dary_common::{left_child_of, parent_of};
use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct DaryNode {
    item: Item,
    key: Key,
    index: usize,
}

/// Implicit d-ary heap, `D` one of `2, 4, 8, 16`.
pub struct DaryImplicitHeap<const D: usize> {
    tree: Vec<Handle>,
    nodes: Slab<DaryNode>,
}

impl<const D: usize> DaryImplicitHeap<D> {
    fn heapify_up(&mut self, start: usize) {
        if start == 0 {
            return;
        }
        let mut child = start;
        let mut parent = parent_of::<D>(child);
        let child_handle = self.tree[child];
        let key = self.nodes.get(child_handle).key;

        if key >= self.nodes.get(self.tree[parent]).key {
            return;
        }

        loop {
            let parent_handle = self.tree[parent];
            self.tree[child] = parent_handle;
            self.nodes.get_mut(parent_handle).index = child;
            child = parent;
            if child == 0 || key >= self.nodes.get(self.tree[parent_of::<D>(child)]).key {
                break;
            }
            parent = parent_of::<D>(child);
        }

        self.tree[child] = child_handle;
        self.nodes.get_mut(child_handle).index = child;
    }

    fn heapify_down(&mut self, start: usize) {
        let len = self.tree.len();
        let mut parent = start;
        let parent_handle = self.tree[parent];
        let key = self.nodes.get(parent_handle).key;

        loop {
            let first_child = left_child_of::<D>(parent);
            if first_child >= len {
                break;
            }
            let mut best = first_child;
            let mut best_key = self.nodes.get(self.tree[best]).key;
            for i in 1..D {
                let candidate = first_child + i;
                if candidate >= len {
                    break;
                }
                let candidate_key = self.nodes.get(self.tree[candidate]).key;
                if candidate_key < best_key {
                    best = candidate;
                    best_key = candidate_key;
                }
            }
            if best_key >= key {
                break;
            }
            let best_handle = self.tree[best];
            self.tree[parent] = best_handle;
            self.nodes.get_mut(best_handle).index = parent;
            parent = best;
        }

        self.tree[parent] = parent_handle;
        self.nodes.get_mut(parent_handle).index = parent;
    }

    fn remove_at(&mut self, position: usize) -> Key {
        let handle = self.tree[position];
        let key = self.nodes.get(handle).key;
        let last = self.tree.len() - 1;

        if position == last {
            self.tree.truncate(last);
        } else {
            let moved = self.tree[last];
            self.tree[position] = moved;
            self.nodes.get_mut(moved).index = position;
            self.tree.truncate(last);

            if position > 0
                && self.nodes.get(moved).key < self.nodes.get(self.tree[parent_of::<D>(position)]).key
            {
                self.heapify_up(position);
            } else {
                self.heapify_down(position);
            }
        }

        self.nodes.free(handle);
        key
    }
}

impl<const D: usize> AddressableHeap for DaryImplicitHeap<D> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: Vec::with_capacity(capacity),
            nodes: Slab::with_capacity(capacity),
        }
    }

    fn clear(&mut self) {
        self.tree.clear();
        self.nodes.clear();
    }

    fn insert(&mut self, item: Item, key: Key) -> Result<Handle> {
        let position = self.tree.len();
        let handle = self.nodes.alloc(DaryNode { item, key, index: position })?;
        self.tree.push(handle);
        self.heapify_up(position);
        Ok(handle)
    }

    fn find_min(&self) -> Option<Handle> {
        self.tree.first().copied()
    }

    fn delete_min(&mut self) -> Option<Key> {
        if self.tree.is_empty() {
            None
        } else {
            Some(self.remove_at(0))
        }
    }

    fn delete(&mut self, node: Handle) -> Key {
        let position = self.nodes.get(node).index;
        self.remove_at(position)
    }

    fn decrease_key(&mut self, node: Handle, new_key: Key) {
        let current = self.nodes.get(node).key;
        debug_assert!(new_key <= current, "decrease_key called with a greater key");
        self.nodes.get_mut(node).key = new_key;
        self.heapify_up(self.nodes.get(node).index);
    }

    fn key_of(&self, node: Handle) -> Key {
        self.nodes.get(node).key
    }

    fn item_of(&self, node: Handle) -> Item {
        self.nodes.get(node).item
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        fn check<const D: usize>(heap: &DaryImplicitHeap<D>, parent: usize) -> bool {
            for i in 0..D {
                let child = left_child_of::<D>(parent) + i;
                if child >= heap.tree.len() {
                    return true;
                }
                let parent_key = heap.nodes.get(heap.tree[parent]).key;
                let child_key = heap.nodes.get(heap.tree[child]).key;
                if child_key < parent_key || !check(heap, child) {
                    return false;
                }
            }
            true
        }
        for (pos, handle) in self.tree.iter().enumerate() {
            if self.nodes.get(*handle).index != pos {
                return false;
            }
        }
        self.tree.is_empty() || check(self, 0)
    }
}
