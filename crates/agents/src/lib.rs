//! Question answering over retrieved document chunks.

pub mod model;
pub mod prompt;
pub mod providers;
pub mod runner;

pub use {
    model::LlmProvider,
    runner::{Answer, RagRunner},
};
