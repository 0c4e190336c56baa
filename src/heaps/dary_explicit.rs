//! Explicit (pointer-linked) d-ary heap.
//!
//! Same complete-tree shape and heap-order invariant as the implicit
//! array heap, but nodes are linked by handles instead of packed into
//! a `Vec`: each node carries a `parent` handle, a `first_child`
//! handle, and sits in a circular sibling ring with its neighbors.
//! Finding the insertion point / the last node by shape position is
//! done by descending the tree from the root, peeling base-`D` digits
//! off the target position — the pointer-based analogue of the
//! bit-peeling `find_node` in a binary pointer heap, generalized to
//! arbitrary arity.
//!
//! Relinking two tree positions swaps pointers rather than moving
//! values, so a handle keeps naming the same logical node no matter
//! how the tree reshapes around it (`swap_connected`/
//! `swap_disconnected`). A pointer-heap implementation could overload
//! one field to mean "parent" for most nodes and "previous sibling"
//! for others; this implementation keeps a separate, explicit
//! `parent` field instead (see DESIGN.md).

use crate::alloc::{Handle, Slab};
use crate::error::Result;
use crate::queue::{AddressableHeap, Item, Key};

struct DaryNode {
    item: Item,
    key: Key,
    shape_index: usize,
    parent: Option<Handle>,
    first_child: Option<Handle>,
    next_sibling: Handle,
    prev_sibling: Handle,
}

/// Explicit pointer-linked d-ary heap, `D` one of `2, 4, 8, 16`.
pub struct DaryExplicitHeap<const D: usize> {
    root: Option<Handle>,
    size: usize,
    nodes: Slab<DaryNode>,
}

impl<const D: usize> DaryExplicitHeap<D> {
    fn children_vec(&self, owner: Handle) -> Vec<Handle> {
        let mut out = Vec::new();
        if let Some(first) = self.nodes.get(owner).first_child {
            let mut current = first;
            loop {
                out.push(current);
                current = self.nodes.get(current).next_sibling;
                if current == first {
                    break;
                }
            }
        }
        out
    }

    fn set_children(&mut self, owner: Handle, children: &[Handle]) {
        if children.is_empty() {
            self.nodes.get_mut(owner).first_child = None;
            return;
        }
        for (i, &h) in children.iter().enumerate() {
            let next = children[(i + 1) % children.len()];
            let prev = children[(i + children.len() - 1) % children.len()];
            let node = self.nodes.get_mut(h);
            node.next_sibling = next;
            node.prev_sibling = prev;
            node.parent = Some(owner);
        }
        self.nodes.get_mut(owner).first_child = Some(children[0]);
    }

    /// Path of child-ring indices (most significant digit first) from
    /// the root down to 0-indexed shape position `target`.
    fn path_to(mut target: usize) -> Vec<usize> {
        let mut digits = Vec::new();
        while target != 0 {
            digits.push((target - 1) % D);
            target = (target - 1) / D;
        }
        digits.reverse();
        digits
    }

    fn find_by_shape_index(&self, target: usize) -> Handle {
        let mut current = self.root.expect("shape index lookup on empty heap");
        for digit in Self::path_to(target) {
            let first = self.nodes.get(current).first_child.expect("missing child on complete path");
            let mut h = first;
            for _ in 0..digit {
                h = self.nodes.get(h).next_sibling;
            }
            current = h;
        }
        current
    }

    fn swap_connected(&mut self, parent: Handle, child: Handle) {
        let gp = self.nodes.get(parent).parent;
        let parent_children = self.children_vec(parent);
        let child_children = self.children_vec(child);

        let new_child_children: Vec<Handle> = parent_children
            .iter()
            .map(|&h| if h == child { parent } else { h })
            .collect();

        self.set_children(child, &new_child_children);
        self.set_children(parent, &child_children);
        self.nodes.get_mut(parent).parent = Some(child);

        match gp {
            Some(gp) => {
                let gp_children = self.children_vec(gp);
                let new_gp_children: Vec<Handle> = gp_children
                    .iter()
                    .map(|&h| if h == parent { child } else { h })
                    .collect();
                self.set_children(gp, &new_gp_children);
            }
            None => {
                self.root = Some(child);
                self.nodes.get_mut(child).parent = None;
            }
        }

        let si_parent = self.nodes.get(parent).shape_index;
        let si_child = self.nodes.get(child).shape_index;
        self.nodes.get_mut(parent).shape_index = si_child;
        self.nodes.get_mut(child).shape_index = si_parent;
    }

    fn swap_disconnected(&mut self, a: Handle, b: Handle) {
        let a_parent = self.nodes.get(a).parent;
        let b_parent = self.nodes.get(b).parent;
        let a_children = self.children_vec(a);
        let b_children = self.children_vec(b);

        self.set_children(a, &b_children);
        self.set_children(b, &a_children);

        match a_parent {
            Some(gp) => {
                let children = self.children_vec(gp);
                let replaced: Vec<Handle> = children.iter().map(|&h| if h == a { b } else { h }).collect();
                self.set_children(gp, &replaced);
            }
            None => {
                self.root = Some(b);
                self.nodes.get_mut(b).parent = None;
            }
        }
        match b_parent {
            Some(gp) => {
                let children = self.children_vec(gp);
                let replaced: Vec<Handle> = children.iter().map(|&h| if h == b { a } else { h }).collect();
                self.set_children(gp, &replaced);
            }
            None => {
                self.root = Some(a);
                self.nodes.get_mut(a).parent = None;
            }
        }

        let si_a = self.nodes.get(a).shape_index;
        let si_b = self.nodes.get(b).shape_index;
        self.nodes.get_mut(a).shape_index = si_b;
        self.nodes.get_mut(b).shape_index = si_a;
    }

    fn detach_leaf(&mut self, leaf: Handle) {
        match self.nodes.get(leaf).parent {
            Some(parent) => {
                let children = self.children_vec(parent);
                let remaining: Vec<Handle> = children.into_iter().filter(|&h| h != leaf).collect();
                self.set_children(parent, &remaining);
            }
            None => self.root = None,
        }
    }

    fn sift_up(&mut self, mut node: Handle) {
        while let Some(parent) = self.nodes.get(node).parent {
            if self.nodes.get(node).key < self.nodes.get(parent).key {
                self.swap_connected(parent, node);
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut node: Handle) {
        loop {
            let children = self.children_vec(node);
            if children.is_empty() {
                break;
            }
            let mut best = children[0];
            for &c in &children[1..] {
                if self.nodes.get(c).key < self.nodes.get(best).key {
                    best = c;
                }
            }
            if self.nodes.get(best).key < self.nodes.get(node).key {
                self.swap_connected(node, best);
            } else {
                break;
            }
        }
    }
}

impl<const D: usize> AddressableHeap for DaryExplicitHeap<D> {
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
        let position = self.size;
        let handle = self.nodes.alloc(DaryNode {
            item,
            key,
            shape_index: position,
            parent: None,
            first_child: None,
            next_sibling: Handle::default(),
            prev_sibling: Handle::default(),
        })?;
        self.nodes.get_mut(handle).next_sibling = handle;
        self.nodes.get_mut(handle).prev_sibling = handle;

        if position == 0 {
            self.root = Some(handle);
        } else {
            let parent_pos = (position - 1) / D;
            let parent = self.find_by_shape_index(parent_pos);
            let mut children = self.children_vec(parent);
            children.push(handle);
            self.set_children(parent, &children);
        }
        self.size += 1;
        self.sift_up(handle);
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
        let last_position = self.size - 1;
        let last = self.find_by_shape_index(last_position);

        if last == node {
            self.detach_leaf(node);
        } else {
            self.swap_disconnected(node, last);
            self.detach_leaf(node);
            let parent_key_ok = match self.nodes.get(last).parent {
                Some(p) => self.nodes.get(last).key >= self.nodes.get(p).key,
                None => true,
            };
            if !parent_key_ok {
                self.sift_up(last);
            } else {
                self.sift_down(last);
            }
        }

        self.nodes.free(node);
        self.size -= 1;
        key
    }

    fn decrease_key(&mut self, node: Handle, new_key: Key) {
        let current = self.nodes.get(node).key;
        debug_assert!(new_key <= current, "decrease_key called with a greater key");
        self.nodes.get_mut(node).key = new_key;
        self.sift_up(node);
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
        fn check<const D: usize>(heap: &DaryExplicitHeap<D>, node: Handle) -> bool {
            for child in heap.children_vec(node) {
                if heap.nodes.get(child).key < heap.nodes.get(node).key {
                    return false;
                }
                if heap.nodes.get(child).parent != Some(node) {
                    return false;
                }
                if !check(heap, child) {
                    return false;
                }
            }
            true
        }
        match self.root {
            Some(r) => self.nodes.get(r).shape_index == 0 && check(self, r),
            None => self.size == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut heap: DaryExplicitHeap<4> = DaryExplicitHeap::with_capacity(8);
        for k in [5, 3, 8, 1, 4, 7, 2, 6] {
            heap.insert(k, k).unwrap();
        }
        assert!(heap.is_valid());
        let mut drained = Vec::new();
        while let Some(k) = heap.delete_min() {
            drained.push(k);
        }
        assert_eq!(drained, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn decrease_key_then_delete() {
        let mut heap: DaryExplicitHeap<3> = DaryExplicitHeap::with_capacity(8);
        let handles: Vec<_> = [100, 90, 80, 70, 60, 50]
            .into_iter()
            .map(|k| heap.insert(k, k).unwrap())
            .collect();
        heap.decrease_key(handles[0], 1);
        assert_eq!(heap.key_of(heap.find_min().unwrap()), 1);
        heap.delete(handles[0]);
        assert_eq!(heap.delete_min(), Some(50));
    }

    #[test]
    fn arbitrary_delete_mid_heap() {
        let mut heap: DaryExplicitHeap<2> = DaryExplicitHeap::with_capacity(8);
        let handles: Vec<_> = [5, 2, 8, 1, 9, 3]
            .into_iter()
            .map(|k| heap.insert(k, k).unwrap())
            .collect();
        heap.delete(handles[2]);
        let mut drained = Vec::new();
        while let Some(k) = heap.delete_min() {
            drained.push(k);
        }
        assert_eq!(drained, vec![1, 2, 3, 5, 9]);
    }
}
