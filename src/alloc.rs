//! Fixed-capacity slab allocator shared by every heap variant.
//!
//! Each heap owns one [`Slab<T>`] of its own record type. Handles are
//! generational indices: a [`Handle`] names a slot and the generation
//! it was issued with, so a stale handle that outlives a `free` can be
//! caught by a debug assertion instead of silently aliasing a reused
//! slot.

use crate::error::ReplayError;

/// Stable reference to a slot in a [`Slab`].
///
/// Valid from the `insert`/`alloc` that produced it until the node it
/// names is freed (by `delete`, `delete_min`, or the heap being
/// cleared/dropped). Using a handle afterwards is undefined behavior;
/// debug builds catch the common case via the generation check in
/// [`Slab::get`]/[`Slab::get_mut`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot as usize
    }
}

struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// Fixed-capacity pool of uniformly sized records with O(1)
/// alloc/free and an O(1) bulk `clear`.
pub struct Slab<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    bump: u32,
    capacity: u32,
}

impl<T> Slab<T> {
    /// Reserves `capacity` records. O(capacity).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot {
            value: None,
            generation: 0,
        });
        log::debug!("allocated slab with capacity {capacity}");
        Self {
            slots,
            free: Vec::new(),
            bump: 0,
            capacity: capacity as u32,
        }
    }

    /// Number of records this slab can hold at once.
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Inserts `value`, returning a fresh handle. Pops from the free
    /// list if non-empty, otherwise bumps the unused-slot pointer.
    pub fn alloc(&mut self, value: T) -> crate::error::Result<Handle> {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.value = Some(value);
            return Ok(Handle::new(slot, entry.generation));
        }

        if self.bump >= self.capacity {
            return Err(ReplayError::AllocatorExhausted {
                requested: self.bump as usize + 1,
                available: self.capacity as usize,
            });
        }

        let slot = self.bump;
        self.bump += 1;
        let entry = &mut self.slots[slot as usize];
        entry.value = Some(value);
        Ok(Handle::new(slot, entry.generation))
    }

    /// Releases the slot named by `handle` and bumps its generation
    /// so later use of the same handle value is detectable.
    pub fn free(&mut self, handle: Handle) -> T {
        let entry = &mut self.slots[handle.slot()];
        debug_assert_eq!(
            entry.generation, handle.generation,
            "freeing a handle whose generation is stale"
        );
        entry.generation = entry.generation.wrapping_add(1);
        let value = entry
            .value
            .take()
            .expect("freeing a handle whose slot is already empty");
        self.free.push(handle.slot);
        value
    }

    /// Resets the free list and bump pointer in O(1). Every handle
    /// issued before this call becomes invalid; generations are
    /// intentionally *not* bumped here, so this stays O(1) regardless
    /// of how many slots are live.
    pub fn clear(&mut self) {
        self.free.clear();
        self.bump = 0;
    }

    /// Borrows the record named by `handle`.
    pub fn get(&self, handle: Handle) -> &T {
        let entry = &self.slots[handle.slot()];
        debug_assert_eq!(
            entry.generation, handle.generation,
            "accessing a stale handle"
        );
        entry.value.as_ref().expect("accessing a freed handle")
    }

    /// Mutably borrows the record named by `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> &mut T {
        let entry = &mut self.slots[handle.slot()];
        debug_assert_eq!(
            entry.generation, handle.generation,
            "accessing a stale handle"
        );
        entry.value.as_mut().expect("accessing a freed handle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free_round_trip() {
        let mut slab: Slab<u32> = Slab::with_capacity(4);
        let a = slab.alloc(10).unwrap();
        let b = slab.alloc(20).unwrap();
        assert_eq!(*slab.get(a), 10);
        assert_eq!(*slab.get(b), 20);
        slab.free(a);
        let c = slab.alloc(30).unwrap();
        assert_eq!(*slab.get(c), 30);
    }

    #[test]
    fn exhaustion_reports_requested_and_available() {
        let mut slab: Slab<u32> = Slab::with_capacity(1);
        slab.alloc(1).unwrap();
        let err = slab.alloc(2).unwrap_err();
        match err {
            ReplayError::AllocatorExhausted { available, .. } => assert_eq!(available, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn clear_resets_capacity_in_o1() {
        let mut slab: Slab<u32> = Slab::with_capacity(2);
        slab.alloc(1).unwrap();
        slab.alloc(2).unwrap();
        slab.clear();
        let h = slab.alloc(99).unwrap();
        assert_eq!(*slab.get(h), 99);
    }
}
