use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Json, Router,
        extract::{
            DefaultBodyLimit, Multipart, State,
            multipart::MultipartRejection,
            rejection::JsonRejection,
        },
        response::IntoResponse,
        routing::{get, post},
    },
    serde::{Deserialize, Serialize},
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{debug, info},
};

use {
    pdfqa_agents::Answer,
    pdfqa_common::Error,
    pdfqa_config::PdfqaConfig,
    pdfqa_memory::{Document, IngestReport, RetrievalMatch},
};

use crate::{error::ApiError, services::RagServices};

const UPLOAD_FAILED: &str = "Failed to process PDF";
const QUERY_FAILED: &str = "Failed to query documents";
const ANSWER_FAILED: &str = "Failed to answer question";

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct AppState {
    services: Arc<RagServices>,
    version: &'static str,
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(services: Arc<RagServices>, max_upload_bytes: usize) -> Router {
    let state = AppState {
        services,
        version: env!("CARGO_PKG_VERSION"),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/ask", post(ask_handler))
        .route("/api/query", post(query_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire services from `config` and serve until the listener fails.
pub async fn start_gateway(config: &PdfqaConfig) -> anyhow::Result<()> {
    let services = Arc::new(RagServices::from_config(config)?);
    let app = build_gateway_app(Arc::clone(&services), config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let generation = config
        .gemini
        .generation_model
        .as_deref()
        .unwrap_or("auto (first gemini model in catalog)");
    let lines = [
        format!("pdfqa gateway v{}", env!("CARGO_PKG_VERSION")),
        format!("listening on {addr}"),
        format!("store: {}", services.store_backend),
        format!(
            "chunking: {} chars, {} overlap",
            config.chunking.chunk_size, config.chunking.overlap
        ),
        format!("generation: {generation}"),
    ];
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}

// ── API Types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct UploadResponse {
    message: &'static str,
    #[serde(flatten)]
    report: IngestReport,
}

#[derive(Debug, Default, Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: String,
}

#[derive(Debug, Default, Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    query: String,
    results: Vec<RetrievalMatch>,
    total_results: usize,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "store": state.services.store_backend,
    }))
}

async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let no_file = || ApiError::message(&Error::invalid_input("No file uploaded"), UPLOAD_FAILED);
    let mut multipart = multipart.map_err(|_| no_file())?;

    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        debug!(%filename, %content_type, bytes = bytes.len(), "received upload");
        document = Some(Document {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let document = document.ok_or_else(no_file)?;
    let report = state
        .services
        .ingestor
        .ingest(document)
        .await
        .map_err(|e| ApiError::message(&e, UPLOAD_FAILED))?;

    Ok(Json(UploadResponse {
        message: "PDF processed and stored successfully",
        report,
    }))
}

async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let question = payload.map(|Json(req)| req.question).unwrap_or_default();
    state
        .services
        .runner
        .answer(&question)
        .await
        .map(Json)
        .map_err(|e| ApiError::error(&e, ANSWER_FAILED))
}

async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = payload.map(|Json(req)| req.query).unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::message(
            &Error::invalid_input("Query is required"),
            QUERY_FAILED,
        ));
    }

    let runner = &state.services.runner;
    let results = runner
        .retrieve(query, runner.top_k())
        .await
        .map_err(|e| ApiError::message(&e, QUERY_FAILED))?;

    Ok(Json(QueryResponse {
        query: query.to_string(),
        total_results: results.len(),
        results,
    }))
}
