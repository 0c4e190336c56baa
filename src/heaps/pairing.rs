//! Pairing heap.
//!
//! A single multiway tree, heap-ordered, with lazy merging: `insert`
//! and `decrease_key` just splice a subtree onto the root; the real
//! work happens in `collapse`, the two-pass child-list reduction run
//! on `delete`/`delete_min`.
//!
//! A child list is doubly linked via `next`/`prev`, the last child's
//! `next` is `None`, and the *first* child's `prev` points back to the
//! parent rather than to a (nonexistent) previous sibling —
//! disambiguated by checking whether `prev.first_child == Some(self)`.

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct PairingNode {
    item: Item,
    key: Key,
    first_child: Option<Handle>,
    next_sibling: Option<Handle>,
    /// Parent, if this is the first child; otherwise the previous sibling.
    prev: Option<Handle>,
}

/// Pairing heap.
pub struct PairingHeap {
    root: Option<Handle>,
    size: usize,
    nodes: Slab<PairingNode>,
}

impl PairingHeap {
    fn is_first_child(&self, node: Handle) -> bool {
        match self.nodes.get(node).prev {
            Some(p) => self.nodes.get(p).first_child == Some(node),
            None => false,
        }
    }

    /// Merges two root-level trees, returning the new root. `None`
    /// inputs are treated as the identity for merge.
    fn merge(&mut self, a: Option<Handle>, b: Option<Handle>) -> Option<Handle> {
        match (a, b) {
            (None, x) | (x, None) => x,
            (Some(a), Some(b)) => {
                let (parent, child) = if self.nodes.get(a).key <= self.nodes.get(b).key {
                    (a, b)
                } else {
                    (b, a)
                };
                let old_first = self.nodes.get(parent).first_child;
                self.nodes.get_mut(child).next_sibling = old_first;
                self.nodes.get_mut(child).prev = Some(parent);
                if let Some(old_first) = old_first {
                    self.nodes.get_mut(old_first).prev = Some(child);
                }
                self.nodes.get_mut(parent).first_child = Some(child);
                self.nodes.get_mut(parent).next_sibling = None;
                self.nodes.get_mut(parent).prev = None;
                Some(parent)
            }
        }
    }

    /// Two-pass collapse of a sibling list (given as its first
    /// element) into a single tree.
    fn collapse(&mut self, first: Option<Handle>) -> Option<Handle> {
        let mut first = first?;
        // detach the whole list from its old parent/sibling context
        self.nodes.get_mut(first).prev = None;

        // pass 1: merge consecutive pairs left to right, building a
        // `prev`-linked stack of partial results.
        let mut stack: Vec<Handle> = Vec::new();
        loop {
            let next = self.nodes.get(first).next_sibling;
            self.nodes.get_mut(first).next_sibling = None;
            match next {
                None => {
                    stack.push(first);
                    break;
                }
                Some(second) => {
                    let after = self.nodes.get(second).next_sibling;
                    self.nodes.get_mut(second).next_sibling = None;
                    let merged = self.merge(Some(first), Some(second)).unwrap();
                    stack.push(merged);
                    match after {
                        None => break,
                        Some(next_first) => first = next_first,
                    }
                }
            }
        }

        // pass 2: fold right to left.
        let mut result = stack.pop();
        while let Some(top) = stack.pop() {
            result = self.merge(Some(top), result);
        }
        result
    }

    fn detach(&mut self, node: Handle) {
        let prev = self.nodes.get(node).prev;
        let next = self.nodes.get(node).next_sibling;
        if self.is_first_child(node) {
            let parent = prev.unwrap();
            self.nodes.get_mut(parent).first_child = next;
        } else if let Some(prev) = prev {
            self.nodes.get_mut(prev).next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes.get_mut(next).prev = prev;
        }
        self.nodes.get_mut(node).next_sibling = None;
        self.nodes.get_mut(node).prev = None;
    }
}

impl AddressableHeap for PairingHeap {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            root: None,
            size: 0,
            nodes: Slab::with_capacity(capacity),
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.size = 0;
        self.nodes.clear();
    }

    fn insert(&mut self, item: Item, key: Key) -> Result<Handle> {
        let handle = self.nodes.alloc(PairingNode {
            item,
            key,
            first_child: None,
            next_sibling: None,
            prev: None,
        })?;
        self.root = self.merge(self.root, Some(handle));
        self.size += 1;
        Ok(handle)
    }

    fn find_min(&self) -> Option<Handle> {
        self.root
    }

    fn delete_min(&mut self) -> Option<Key> {
        self.root.map(|r| self.delete(r))
    }

    fn delete(&mut self, node: Handle) -> Key {
        let key = self.nodes.get(node).key;
        let children = self.nodes.get(node).first_child;

        if self.root == Some(node) {
            self.root = self.collapse(children);
        } else {
            self.detach(node);
            let collapsed = self.collapse(children);
            self.root = self.merge(self.root, collapsed);
        }

        self.nodes.free(node);
        self.size -= 1;
        key
    }

    fn decrease_key(&mut self, node: Handle, new_key: Key) {
        let current = self.nodes.get(node).key;
        debug_assert!(new_key <= current, "decrease_key called with a greater key");
        self.nodes.get_mut(node).key = new_key;

        if self.root != Some(node) {
            self.detach(node);
            self.root = self.merge(self.root, Some(node));
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
        fn check(heap: &PairingHeap, node: Handle) -> bool {
            let mut child = heap.nodes.get(node).first_child;
            while let Some(c) = child {
                if heap.nodes.get(c).key < heap.nodes.get(node).key {
                    return false;
                }
                if !check(heap, c) {
                    return false;
                }
                child = heap.nodes.get(c).next_sibling;
            }
            true
        }
        match self.root {
            Some(r) => check(self, r),
            None => self.size == 0,
        }
    }
}
