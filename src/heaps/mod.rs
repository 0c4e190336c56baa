//! The seven addressable heap variants, all implementing [`crate::queue::AddressableHeap`].

mod dary_common;
mod dary_explicit;
mod dary_implicit;
mod fibonacci;
mod pairing;
mod quake;
mod rank_pairing;
mod violation;

pub use dary_explicit::DaryExplicitHeap;
pub use dary_implicit::DaryImplicitHeap;
pub use fibonacci::FibonacciHeap;
pub use pairing::PairingHeap;
pub use quake::QuakeHeap;
pub use rank_pairing::RankPairingHeap;
pub use violation::ViolationHeap;
