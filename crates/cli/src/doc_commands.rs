use std::path::Path;

use {
    anyhow::{Context, Result},
    pdfqa_config::{PdfqaConfig, StoreBackend},
    pdfqa_gateway::services::RagServices,
    pdfqa_memory::{Document, PDF_CONTENT_TYPE},
    tracing::warn,
};

pub async fn ingest(config: &PdfqaConfig, file: &Path) -> Result<()> {
    let services = services(config)?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let report = services.ingestor.ingest(document(file, bytes)).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn ask(config: &PdfqaConfig, question: &str) -> Result<()> {
    let services = services(config)?;
    let answer = services.runner.answer(question).await?;
    println!("{}", answer.answer);
    Ok(())
}

pub async fn search(config: &PdfqaConfig, query: &str, top_k: Option<usize>) -> Result<()> {
    let services = services(config)?;
    let top_k = top_k.unwrap_or(services.runner.top_k()).max(1);
    let matches = services.runner.retrieve(query, top_k).await?;
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn services(config: &PdfqaConfig) -> Result<RagServices> {
    if config.store.backend == StoreBackend::Memory {
        warn!("memory store does not persist between commands, use the gateway or pinecone");
    }
    RagServices::from_config(config)
}

/// Uploads from disk carry no content type, so it is inferred from the
/// extension.
fn document(path: &Path, bytes: Vec<u8>) -> Document {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Document {
        filename,
        content_type: if is_pdf {
            PDF_CONTENT_TYPE.to_string()
        } else {
            "application/octet-stream".to_string()
        },
        bytes,
    }
}
