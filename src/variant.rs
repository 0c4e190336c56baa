//! Enum dispatch over the thirteen concrete heap configurations.
//!
//! The algorithm layer never needs dynamic dispatch (§9 of the design
//! notes); only the measurement driver, which picks a variant from a
//! CLI flag at run time, needs indirection. `AnyHeap` is that one
//! seam: a closed `match` over concrete types rather than a trait
//! object, so every variant still monomorphizes normally.

use crate::alloc::Handle;
use crate::error::Result;
use crate::heaps::{DaryExplicitHeap, DaryImplicitHeap, FibonacciHeap, PairingHeap, QuakeHeap, RankPairingHeap, ViolationHeap};
use crate::queue::{AddressableHeap, Item, Key};

/// Every heap configuration the driver can select via `--variant`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantKind {
    /// Implicit array-backed d-ary heap, d=2.
    Implicit2,
    /// Implicit array-backed d-ary heap, d=4.
    Implicit4,
    /// Implicit array-backed d-ary heap, d=8.
    Implicit8,
    /// Implicit array-backed d-ary heap, d=16.
    Implicit16,
    /// Pointer-linked d-ary heap, d=2.
    Explicit2,
    /// Pointer-linked d-ary heap, d=4.
    Explicit4,
    /// Pointer-linked d-ary heap, d=8.
    Explicit8,
    /// Pointer-linked d-ary heap, d=16.
    Explicit16,
    /// Pairing heap.
    Pairing,
    /// Fibonacci heap.
    Fibonacci,
    /// Rank-pairing heap.
    RankPairing,
    /// Violation heap.
    Violation,
    /// Quake heap.
    Quake,
}

impl clap::builder::ValueParserFactory for VariantKind {
    type Parser = clap::builder::ValueParser;

    fn value_parser() -> Self::Parser {
        clap::builder::ValueParser::new(|s: &str| s.parse::<VariantKind>())
    }
}

impl std::str::FromStr for VariantKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "implicit2" => Ok(Self::Implicit2),
            "implicit4" => Ok(Self::Implicit4),
            "implicit8" => Ok(Self::Implicit8),
            "implicit16" => Ok(Self::Implicit16),
            "explicit2" => Ok(Self::Explicit2),
            "explicit4" => Ok(Self::Explicit4),
            "explicit8" => Ok(Self::Explicit8),
            "explicit16" => Ok(Self::Explicit16),
            "pairing" => Ok(Self::Pairing),
            "fibonacci" => Ok(Self::Fibonacci),
            "rank-pairing" => Ok(Self::RankPairing),
            "violation" => Ok(Self::Violation),
            "quake" => Ok(Self::Quake),
            other => Err(format!("unknown heap variant: {other}")),
        }
    }
}

/// Owned heap of a variant chosen at run time.
pub enum AnyHeap {
    /// See [`VariantKind::Implicit2`].
    Implicit2(DaryImplicitHeap<2>),
    /// See [`VariantKind::Implicit4`].
    Implicit4(DaryImplicitHeap<4>),
    /// See [`VariantKind::Implicit8`].
    Implicit8(DaryImplicitHeap<8>),
    /// See [`VariantKind::Implicit16`].
    Implicit16(DaryImplicitHeap<16>),
    /// See [`VariantKind::Explicit2`].
    Explicit2(DaryExplicitHeap<2>),
    /// See [`VariantKind::Explicit4`].
    Explicit4(DaryExplicitHeap<4>),
    /// See [`VariantKind::Explicit8`].
    Explicit8(DaryExplicitHeap<8>),
    /// See [`VariantKind::Explicit16`].
    Explicit16(DaryExplicitHeap<16>),
    /// See [`VariantKind::Pairing`].
    Pairing(PairingHeap),
    /// See [`VariantKind::Fibonacci`].
    Fibonacci(FibonacciHeap),
    /// See [`VariantKind::RankPairing`].
    RankPairing(RankPairingHeap),
    /// See [`VariantKind::Violation`].
    Violation(ViolationHeap),
    /// See [`VariantKind::Quake`].
    Quake(QuakeHeap),
}

impl AnyHeap {
    /// Builds the heap named by `kind`, sized for `capacity` concurrently live nodes.
    pub fn new(kind: VariantKind, capacity: usize) -> Self {
        match kind {
            VariantKind::Implicit2 => Self::Implicit2(DaryImplicitHeap::with_capacity(capacity)),
            VariantKind::Implicit4 => Self::Implicit4(DaryImplicitHeap::with_capacity(capacity)),
            VariantKind::Implicit8 => Self::Implicit8(DaryImplicitHeap::with_capacity(capacity)),
            VariantKind::Implicit16 => Self::Implicit16(DaryImplicitHeap::with_capacity(capacity)),
            VariantKind::Explicit2 => Self::Explicit2(DaryExplicitHeap::with_capacity(capacity)),
            VariantKind::Explicit4 => Self::Explicit4(DaryExplicitHeap::with_capacity(capacity)),
            VariantKind::Explicit8 => Self::Explicit8(DaryExplicitHeap::with_capacity(capacity)),
            VariantKind::Explicit16 => Self::Explicit16(DaryExplicitHeap::with_capacity(capacity)),
            VariantKind::Pairing => Self::Pairing(PairingHeap::with_capacity(capacity)),
            VariantKind::Fibonacci => Self::Fibonacci(FibonacciHeap::with_capacity(capacity)),
            VariantKind::RankPairing => Self::RankPairing(RankPairingHeap::with_capacity(capacity)),
            VariantKind::Violation => Self::Violation(ViolationHeap::with_capacity(capacity)),
            VariantKind::Quake => Self::Quake(QuakeHeap::with_capacity(capacity)),
        }
    }

    /// Clears the heap in place, keeping its variant.
    pub fn clear(&mut self) {
        match self {
            Self::Implicit2(h) => h.clear(),
            Self::Implicit4(h) => h.clear(),
            Self::Implicit8(h) => h.clear(),
            Self::Implicit16(h) => h.clear(),
            Self::Explicit2(h) => h.clear(),
            Self::Explicit4(h) => h.clear(),
            Self::Explicit8(h) => h.clear(),
            Self::Explicit16(h) => h.clear(),
            Self::Pairing(h) => h.clear(),
            Self::Fibonacci(h) => h.clear(),
            Self::RankPairing(h) => h.clear(),
            Self::Violation(h) => h.clear(),
            Self::Quake(h) => h.clear(),
        }
    }

    /// Inserts `item` at `key`.
    pub fn insert(&mut self, item: Item, key: Key) -> Result<Handle> {
        match self {
            Self::Implicit2(h) => h.insert(item, key),
            Self::Implicit4(h) => h.insert(item, key),
            Self::Implicit8(h) => h.insert(item, key),
            Self::Implicit16(h) => h.insert(item, key),
            Self::Explicit2(h) => h.insert(item, key),
            Self::Explicit4(h) => h.insert(item, key),
            Self::Explicit8(h) => h.insert(item, key),
            Self::Explicit16(h) => h.insert(item, key),
            Self::Pairing(h) => h.insert(item, key),
            Self::Fibonacci(h) => h.insert(item, key),
            Self::RankPairing(h) => h.insert(item, key),
            Self::Violation(h) => h.insert(item, key),
            Self::Quake(h) => h.insert(item, key),
        }
    }

    /// Handle with the minimum key, if any.
    pub fn find_min(&self) -> Option<Handle> {
        match self {
            Self::Implicit2(h) => h.find_min(),
            Self::Implicit4(h) => h.find_min(),
            Self::Implicit8(h) => h.find_min(),
            Self::Implicit16(h) => h.find_min(),
            Self::Explicit2(h) => h.find_min(),
            Self::Explicit4(h) => h.find_min(),
            Self::Explicit8(h) => h.find_min(),
            Self::Explicit16(h) => h.find_min(),
            Self::Pairing(h) => h.find_min(),
            Self::Fibonacci(h) => h.find_min(),
            Self::RankPairing(h) => h.find_min(),
            Self::Violation(h) => h.find_min(),
            Self::Quake(h) => h.find_min(),
        }
    }

    /// Removes and returns the minimum key, if any.
    pub fn delete_min(&mut self) -> Option<Key> {
        match self {
            Self::Implicit2(h) => h.delete_min(),
            Self::Implicit4(h) => h.delete_min(),
            Self::Implicit8(h) => h.delete_min(),
            Self::Implicit16(h) => h.delete_min(),
            Self::Explicit2(h) => h.delete_min(),
            Self::Explicit4(h) => h.delete_min(),
            Self::Explicit8(h) => h.delete_min(),
            Self::Explicit16(h) => h.delete_min(),
            Self::Pairing(h) => h.delete_min(),
            Self::Fibonacci(h) => h.delete_min(),
            Self::RankPairing(h) => h.delete_min(),
            Self::Violation(h) => h.delete_min(),
            Self::Quake(h) => h.delete_min(),
        }
    }

    /// Removes `node`, returning its key.
    pub fn delete(&mut self, node: Handle) -> Key {
        match self {
            Self::Implicit2(h) => h.delete(node),
            Self::Implicit4(h) => h.delete(node),
            Self::Implicit8(h) => h.delete(node),
            Self::Implicit16(h) => h.delete(node),
            Self::Explicit2(h) => h.delete(node),
            Self::Explicit4(h) => h.delete(node),
            Self::Explicit8(h) => h.delete(node),
            Self::Explicit16(h) => h.delete(node),
            Self::Pairing(h) => h.delete(node),
            Self::Fibonacci(h) => h.delete(node),
            Self::RankPairing(h) => h.delete(node),
            Self::Violation(h) => h.delete(node),
            Self::Quake(h) => h.delete(node),
        }
    }

    /// Lowers `node`'s key to `new_key`.
    pub fn decrease_key(&mut self, node: Handle, new_key: Key) {
        match self {
            Self::Implicit2(h) => h.decrease_key(node, new_key),
            Self::Implicit4(h) => h.decrease_key(node, new_key),
            Self::Implicit8(h) => h.decrease_key(node, new_key),
            Self::Implicit16(h) => h.decrease_key(node, new_key),
            Self::Explicit2(h) => h.decrease_key(node, new_key),
            Self::Explicit4(h) => h.decrease_key(node, new_key),
            Self::Explicit8(h) => h.decrease_key(node, new_key),
            Self::Explicit16(h) => h.decrease_key(node, new_key),
            Self::Pairing(h) => h.decrease_key(node, new_key),
            Self::Fibonacci(h) => h.decrease_key(node, new_key),
            Self::RankPairing(h) => h.decrease_key(node, new_key),
            Self::Violation(h) => h.decrease_key(node, new_key),
            Self::Quake(h) => h.decrease_key(node, new_key),
        }
    }

    /// `node`'s current key.
    pub fn key_of(&self, node: Handle) -> Key {
        match self {
            Self::Implicit2(h) => h.key_of(node),
            Self::Implicit4(h) => h.key_of(node),
            Self::Implicit8(h) => h.key_of(node),
            Self::Implicit16(h) => h.key_of(node),
            Self::Explicit2(h) => h.key_of(node),
            Self::Explicit4(h) => h.key_of(node),
            Self::Explicit8(h) => h.key_of(node),
            Self::Explicit16(h) => h.key_of(node),
            Self::Pairing(h) => h.key_of(node),
            Self::Fibonacci(h) => h.key_of(node),
            Self::RankPairing(h) => h.key_of(node),
            Self::Violation(h) => h.key_of(node),
            Self::Quake(h) => h.key_of(node),
        }
    }

    /// `node`'s client item.
    pub fn item_of(&self, node: Handle) -> Item {
        match self {
            Self::Implicit2(h) => h.item_of(node),
            Self::Implicit4(h) => h.item_of(node),
            Self::Implicit8(h) => h.item_of(node),
            Self::Implicit16(h) => h.item_of(node),
            Self::Explicit2(h) => h.item_of(node),
            Self::Explicit4(h) => h.item_of(node),
            Self::Explicit8(h) => h.item_of(node),
            Self::Explicit16(h) => h.item_of(node),
            Self::Pairing(h) => h.item_of(node),
            Self::Fibonacci(h) => h.item_of(node),
            Self::RankPairing(h) => h.item_of(node),
            Self::Violation(h) => h.item_of(node),
            Self::Quake(h) => h.item_of(node),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        match self {
            Self::Implicit2(h) => h.len(),
            Self::Implicit4(h) => h.len(),
            Self::Implicit8(h) => h.len(),
            Self::Implicit16(h) => h.len(),
            Self::Explicit2(h) => h.len(),
            Self::Explicit4(h) => h.len(),
            Self::Explicit8(h) => h.len(),
            Self::Explicit16(h) => h.len(),
            Self::Pairing(h) => h.len(),
            Self::Fibonacci(h) => h.len(),
            Self::RankPairing(h) => h.len(),
            Self::Violation(h) => h.len(),
            Self::Quake(h) => h.len(),
        }
    }

    /// Equivalent to `len() == 0`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_flag_value() {
        for name in [
            "implicit2",
            "implicit4",
            "implicit8",
            "implicit16",
            "explicit2",
            "explicit4",
            "explicit8",
            "explicit16",
            "pairing",
            "fibonacci",
            "rank-pairing",
            "violation",
            "quake",
        ] {
            assert!(name.parse::<VariantKind>().is_ok(), "failed to parse {name}");
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!("bogus".parse::<VariantKind>().is_err());
    }

    #[test]
    fn dispatches_basic_operations() {
        let mut heap = AnyHeap::new(VariantKind::Fibonacci, 8);
        let handles: Vec<_> = [5, 3, 8].into_iter().map(|k| heap.insert(k, k).unwrap()).collect();
        heap.decrease_key(handles[2], 1);
        assert_eq!(heap.key_of(heap.find_min().unwrap()), 1);
        assert_eq!(heap.len(), 3);
        heap.delete_min();
        assert_eq!(heap.len(), 2);
    }
}
