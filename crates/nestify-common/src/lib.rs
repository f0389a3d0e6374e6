//! Common utilities for the nestify converter.
//!
//! This crate provides shared infrastructure used by the converter front-ends:
//! - **Logger** - colored terminal output with verbosity levels and warning deduplication

pub mod logger;

pub use logger::{Logger, Verbosity};
