//! Corpus builder for ALE.
//!
//! Reads the reasoning event log, groups events by context tag and writes
//! the per-tag learning corpus consumed by the ALE service.

pub mod aggregator;
pub mod pipeline;
pub mod reader;

pub use aggregator::build_corpus;
pub use ale_core as core;
