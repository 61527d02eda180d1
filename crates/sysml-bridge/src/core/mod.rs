//! Core abstractions for model conversion
//!
//! This module defines the vocabulary shared by both pipelines: host graph
//! traits, the per-diagram exporter trait, meta-types, configuration and
//! errors.

mod config;
mod error;
mod exporter;
mod host;
pub mod logging;
mod memory;
mod types;

pub use config::*;
pub use error::*;
pub use exporter::*;
pub use host::*;
pub use logging::*;
pub use memory::*;
pub use types::*;
