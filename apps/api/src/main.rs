//! resume-forge: resume parsing, keyword matching, LLM-backed tailoring and
//! DOCX template export.
//!
//! Usage:
//!   resume-forge [serve]                              Run the HTTP API
//!   resume-forge build-template <source> <out>       Turn a finished resume into a template

mod config;
mod docx;
mod errors;
mod llm_client;
mod matching;
mod models;
mod optimize;
mod parsing;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::docx::{build_template, document_to_markup, DocxPackage};
use crate::llm_client::LlmClient;
use crate::optimize::{LlmOptimizer, Optimizer};
use crate::parsing::parse_resume_markup;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MemoryStore;

#[derive(Parser)]
#[command(name = "resume-forge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Replace a finished resume's field values with {{placeholders}}
    BuildTemplate {
        /// Finished .docx resume
        source: PathBuf,
        /// Where to write the template
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::BuildTemplate { source, out } => write_template(&source, &out),
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting resume-forge API v{}", env!("CARGO_PKG_VERSION"));

    let optimizer: Option<Arc<dyn Optimizer>> = match config.llm.clone() {
        Some(provider) => {
            let llm = LlmClient::new(provider).context("Failed to build LLM client")?;
            info!(
                "LLM client initialized (provider: {:?}, model: {})",
                llm.provider(),
                llm.model()
            );
            Some(Arc::new(LlmOptimizer::new(llm)))
        }
        None => {
            warn!("No LLM provider key set; keyword extraction and optimize are disabled");
            None
        }
    };

    if !config.template_path.exists() {
        warn!(
            "Template {} not found; export will generate fresh documents",
            config.template_path.display()
        );
    }

    let state = AppState {
        config: config.clone(),
        optimizer,
        store: Arc::new(MemoryStore::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn write_template(source: &Path, out: &Path) -> Result<()> {
    let package = DocxPackage::load(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let resume = parse_resume_markup(&document_to_markup(package.document_xml())?);

    let (template, report) = build_template(package.into_bytes(), &resume)?;
    std::fs::write(out, template).with_context(|| format!("Failed to write {}", out.display()))?;

    info!(
        "Wrote template {} ({} placeholders, {} skipped)",
        out.display(),
        report.injected.len(),
        report.skipped.len()
    );
    for key in &report.skipped {
        warn!("No literal value found for {key}");
    }
    Ok(())
}
