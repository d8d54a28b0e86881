//! HTTP gateway: upload, question, and raw retrieval endpoints.
//!
//! Lifecycle:
//! 1. Load config (file + env overrides)
//! 2. Wire embedder, vector store, and generator into [`services::RagServices`]
//! 3. Bind and serve the axum router from [`server::build_gateway_app`]

pub mod error;
pub mod server;
pub mod services;
