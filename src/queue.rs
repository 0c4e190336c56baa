//! The capability set shared by every heap variant.

use crate::alloc::Handle;
use crate::error::Result;

/// Key type stored by every heap variant. Smaller sorts first.
pub type Key = u32;

/// Opaque satellite value attached to a node at `insert` time.
pub type Item = u32;

/// Uniform operation set implemented by every heap variant.
///
/// A [`Handle`] returned by [`insert`](AddressableHeap::insert) stays
/// valid until it is passed to [`delete`](AddressableHeap::delete),
/// consumed by [`delete_min`](AddressableHeap::delete_min), or the
/// heap is [`clear`](AddressableHeap::clear)ed/dropped. Using a handle
/// afterwards is a precondition violation; debug builds assert
/// against the common cases inside the node allocator.
pub trait AddressableHeap {
    /// Creates an empty heap sized for `capacity` concurrently live
    /// nodes.
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Removes every node. O(1): the underlying allocator is cleared
    /// rather than walked.
    fn clear(&mut self);

    /// Inserts `item` with priority `key`, returning a handle that
    /// names the new node.
    fn insert(&mut self, item: Item, key: Key) -> Result<Handle>;

    /// Returns the handle with the minimum key, or `None` if empty.
    /// Does not change heap state.
    fn find_min(&self) -> Option<Handle>;

    /// Removes and returns the key of the minimum handle, or `None`
    /// if empty.
    fn delete_min(&mut self) -> Option<Key>;

    /// Removes `node`, returning its key. `node` must be live.
    fn delete(&mut self, node: Handle) -> Key;

    /// Lowers `node`'s key to `new_key`. `new_key` must be less than
    /// or equal to the node's current key; violating this is a
    /// precondition error, debug-asserted where checking is cheap.
    fn decrease_key(&mut self, node: Handle, new_key: Key);

    /// Returns `node`'s current key. `node` must be live.
    fn key_of(&self, node: Handle) -> Key;

    /// Returns `node`'s item. `node` must be live.
    fn item_of(&self, node: Handle) -> Item;

    /// Number of live nodes.
    fn len(&self) -> usize;

    /// Equivalent to `len() == 0`.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walks the heap's structural invariants. Test-only: production
    /// builds never pay for this.
    #[cfg(test)]
    fn is_valid(&self) -> bool;
}
