//! Core transform for payloadforge.
//!
//! This crate ties together upstream text selection, JSON extraction, and
//! schema normalization into the end-to-end [`pipeline::run`].

pub mod input;
pub mod normalize;
pub mod pipeline;

pub use normalize::{ValidationError, is_truthy, normalize};
pub use pipeline::{PipelineConfig, run, run_parsed, run_text, to_output};
