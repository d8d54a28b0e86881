//! Clients for hosted model providers.

pub mod gemini;

pub use gemini::{GeminiClient, ModelInfo};
