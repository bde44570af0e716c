//! Optimized allocation and collection types for drawlist.
//!
//! This module provides:
//! - Re-exports of optimized hash collections using AHash
//! - [`BoundedVec`], a fixed-capacity vector for per-frame tables

pub mod bounded;

pub use bounded::BoundedVec;

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
