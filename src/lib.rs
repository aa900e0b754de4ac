//! Synthetic Transaction Graph Generator
//!
//! Builds a labeled wallet population, injects canonical laundering
//! topologies (fan-out smurfing, multi-hop layering, fan-in aggregation)
//! plus uncorrelated background traffic, and persists the resulting wallet
//! and transaction tables for downstream fraud-model training.

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod rng;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use graph::{GenerationSummary, Orchestrator};
pub use rng::GeneratorRng;
