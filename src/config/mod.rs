//! Configuration management for the rating engine
//!
//! This module consolidates every tunable constant of the rating model into
//! one explicit configuration struct, with validation and environment
//! variable loading.

pub mod engine;

// Re-export commonly used types
pub use engine::{EngineConfig, KFactorPolicy};
