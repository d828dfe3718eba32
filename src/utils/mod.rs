//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random short code generation and shape checks

pub mod code_generator;
