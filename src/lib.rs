#![doc = include_str!("../README.md")]
#![warn(
    missing_docs,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::float_cmp,
    clippy::float_cmp_const,
    clippy::missing_panics_doc,
    clippy::todo
)]

//! Addressable priority queue implementations and a binary-trace
//! replay harness for comparing them. See [`queue::AddressableHeap`]
//! for the shared operation set, [`heaps`] for the seven variants,
//! and [`trace`] for the replay engine driving the `driver` binary.

pub mod alloc;
pub mod error;
pub mod heaps;
pub mod queue;
pub mod trace;
pub mod variant;

pub use alloc::{Handle, Slab};
pub use error::{ReplayError, Result};
pub use heaps::{DaryExplicitHeap, DaryImplicitHeap, FibonacciHeap, PairingHeap, QuakeHeap, RankPairingHeap, ViolationHeap};
pub use queue::{AddressableHeap, Item, Key};
pub use variant::{AnyHeap, VariantKind};
