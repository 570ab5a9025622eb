//! Data model shared by every stage of the pipeline.
//!
//! Every errata source is normalized into [`Advisory`] records tagged with a
//! [`Distribution`] and a [`Release`].

mod advisory;
mod distribution;

pub use advisory::Advisory;
pub use distribution::{Distribution, Release};
