//! Shared building blocks for the ALE tools.
//!
//! Holds the error type, the output data model written for the ALE service
//! and the command-line settings of both binaries.

pub mod error;
pub mod models;
pub mod persist;
pub mod settings;

pub use error::{AleError, Result};
