//! Binary trace format and the replay engine that drives a heap under test.

pub mod format;
pub mod replay;

pub use format::{Op, TraceHeader};
pub use replay::{replay_file, ReplayConfig, ReplaySummary, PQ_MIN_USEC};
