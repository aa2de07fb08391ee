//! pdf-chat server binary
//!
//! Run with: cargo run -p pdf-chat --bin pdf-chat-server

use clap::Parser;
use pdf_chat::{config::ChatConfig, server::ChatServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chat with PDF documents using Gemini
#[derive(Debug, Parser)]
#[command(name = "pdf-chat-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind (overrides config and environment)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config and environment)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         PDF Chat                          ║
║             Ask questions about your PDFs                 ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = ChatConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.gemini.embed_model);
    tracing::info!("  - LLM model: {}", config.gemini.generate_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Index path: {}", config.index.path.display());

    if config.gemini.api_key.is_none() {
        tracing::warn!(
            "{} is not set; processing and questions will fail until it is",
            pdf_chat::config::API_KEY_ENV
        );
        tracing::warn!("Set it in the environment or in a .env file");
    }

    // Create and start server
    let server = ChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  UI: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/process - Upload PDFs and build the index");
    println!("  POST /api/ask     - Ask a question");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
