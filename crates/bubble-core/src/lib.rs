//! Bubble Core - Foundational types for the bubble animation engine
//!
//! This crate provides the types that all other bubble crates depend on:
//! - `Point`, `Size` - Integer pixel-space types
//! - Error types and Result alias

mod error;
mod types;

pub use error::{BubbleError, Result};
pub use types::{Point, Size};
