//! CLI command handlers.
//!
//! Handlers hold the logic behind `main.rs` so it can be tested without a
//! process boundary.

mod gather;

pub use gather::{run_gather, run_gather_with, GatherConfig};
