//! Optimization: LLM-backed rewriting of resume sections and the overlay
//! merge that applies the result to a parsed resume.

pub mod merge;
pub mod optimizer;
pub mod prompts;

pub use merge::apply_overlay;
pub use optimizer::{LlmOptimizer, Optimizer};
