//! Summarization-and-tagging pipeline

pub mod chunker;
pub mod orchestrator;

pub use chunker::{Chunk, chunk};
pub use orchestrator::Pipeline;
