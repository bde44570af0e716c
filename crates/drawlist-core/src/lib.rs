//! Drawlist Core
//!
//! Shared utilities for the drawlist render-list engine: logging, profiling,
//! collections, name hashing, math and configuration.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod hash;
pub mod logging;
pub mod math;
pub mod profiling;
