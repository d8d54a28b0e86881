//! Configuration: schema, file discovery, `${VAR}` substitution and
//! environment overrides for provider credentials.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config},
    schema::{
        ChunkingConfig, GeminiConfig, PdfqaConfig, PineconeConfig, RetrievalConfig, ServerConfig,
        StoreBackend, StoreConfig,
    },
};
