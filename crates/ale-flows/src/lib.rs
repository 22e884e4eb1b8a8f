//! Flow normalizer for ALE.
//!
//! Turns a Datadog service export into directional integration flows,
//! snapshots them locally and seeds (or rolls back) the ALE flow store.

pub mod client;
pub mod delimiter;
pub mod ingest;
pub mod normalizer;

pub use ale_core as core;
pub use client::{AleClient, Delivery, HttpTransport, ReqwestTransport};
pub use ingest::{ingest, rollback, IngestReport};
