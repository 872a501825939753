//! Common utilities for the Koala inline layout crates.
//!
//! This crate provides shared infrastructure used by all layout components:
//! - **Warning System** - deduplicated, colored terminal output for
//!   degraded layout (accepted overflow, floats that could not be sized)

pub mod warning;
