use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vera::utils::config::Config;
use vera::utils::{generate_file_id, normalize_text};
use vera::{average_similarity, build_context, HttpEmbedder, Retriever, TextChunker, VectorStore};

#[derive(Parser)]
#[command(name = "vera", version, about = "Semantic document retrieval over a local vector index")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk, embed, and index a text file
    Ingest {
        /// Path to the document
        path: PathBuf,
    },
    /// Search the index and print a ranked context block
    Query {
        /// Query text
        text: String,
        /// Number of chunks to retrieve
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Remove every chunk ingested under a file id
    Remove {
        /// File id as printed by `ingest`
        file_id: String,
    },
    /// Print index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let embedder = Arc::new(HttpEmbedder::new(
        config.embedding.url.clone(),
        config.embedding.model.clone(),
        config.embedding.api_key.clone(),
    ));
    info!(
        model = embedder.model(),
        url = %config.embedding.url,
        "Embedding provider configured"
    );

    let store = Arc::new(VectorStore::new(
        config.storage.index_path.clone(),
        config.storage.metadata_path.clone(),
        embedder.clone(),
    ));
    store.load().await.context("Failed to load vector store")?;

    let chunker = TextChunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)
        .context("Invalid chunking configuration")?;
    let retriever = Retriever::new(store.clone(), embedder, chunker);

    match cli.command {
        Command::Ingest { path } => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let text = normalize_text(&raw);

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let file_id = generate_file_id(&name);

            let chunks = retriever
                .ingest_document(&text, &file_id, None)
                .await
                .context("Ingestion failed")?;
            println!("Indexed {} chunks from {} as {}", chunks, path.display(), file_id);
        }
        Command::Query { text, top_k } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            let hits = retriever
                .retrieve(&text, top_k)
                .await
                .context("Retrieval failed")?;
            if hits.is_empty() {
                println!("No results.");
            } else {
                info!(
                    hits = hits.len(),
                    avg_score = average_similarity(&hits),
                    "Query complete"
                );
                println!("{}", build_context(&hits));
            }
        }
        Command::Remove { file_id } => {
            let removed = retriever
                .remove_document(&file_id)
                .await
                .context("Removal failed")?;
            println!("Removed {} chunks for {}", removed, file_id);
        }
        Command::Stats => {
            let count = store.len().await;
            match store.dimensions().await {
                Some(dimensions) => {
                    println!("{} chunks indexed, {} dimensions", count, dimensions)
                }
                None => println!("Index is empty"),
            }
        }
    }

    Ok(())
}
