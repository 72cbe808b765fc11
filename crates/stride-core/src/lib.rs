//! # stride-core
//!
//! Core types, traits, and abstractions for the stride task tracker.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the stride-db and stride-api crates depend on.

pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{EventBus, ServerEvent};
pub use models::*;
pub use traits::*;
