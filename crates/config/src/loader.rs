use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::PdfqaConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["pdfqa.toml", "pdfqa.yaml", "pdfqa.yml", "pdfqa.json"];

/// Load config from the given path (any supported format), then apply
/// environment overrides.
pub fn load_config(path: &Path) -> anyhow::Result<PdfqaConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let mut config = parse_config(&raw, path)?;
    config.chunking.validate()?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./pdfqa.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/pdfqa/pdfqa.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to defaults (plus environment overrides) when no file is
/// found or the file cannot be parsed.
pub fn discover_and_load() -> PdfqaConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    let mut config = PdfqaConfig::default();
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Overlay credentials and endpoints from the environment. Non-empty
/// variables win over values from the config file.
pub fn apply_env_overrides(config: &mut PdfqaConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = var("GEMINI_API_KEY") {
        config.gemini.api_key = Some(key);
    }
    if let Some(url) = var("GEMINI_BASE_URL") {
        config.gemini.base_url = url;
    }
    if let Some(key) = var("PINECONE_API_KEY") {
        config.store.pinecone.api_key = Some(key);
    }
    if let Some(host) = var("PINECONE_INDEX_HOST") {
        config.store.pinecone.index_host = Some(host);
    }
    if let Some(ns) = var("PINECONE_NAMESPACE") {
        config.store.pinecone.namespace = Some(ns);
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory, `~/.config/pdfqa/`.
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("pdfqa"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<PdfqaConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
