mod doc_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    pdfqa_config::PdfqaConfig,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "pdfqa", about = "pdfqa: ask questions about your PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to pdfqa.{toml,yaml,yml,json} in ./ or ~/.config/pdfqa/).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway.
    Gateway {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Extract, chunk, embed, and store a PDF.
    Ingest { file: PathBuf },
    /// Answer a question from the stored documents.
    Ask { question: String },
    /// Show the stored chunks closest to a query.
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PdfqaConfig> {
    match path {
        Some(path) => pdfqa_config::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(pdfqa_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "pdfqa starting");
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Gateway { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            pdfqa_gateway::server::start_gateway(&config).await
        },
        Commands::Ingest { file } => doc_commands::ingest(&config, &file).await,
        Commands::Ask { question } => doc_commands::ask(&config, &question).await,
        Commands::Search { query, top_k } => doc_commands::search(&config, &query, top_k).await,
    }
}
