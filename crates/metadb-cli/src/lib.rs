//! Orchestration for the MetaDB generator binary.

pub mod pipeline;

pub use pipeline::{run, RunConfig};
