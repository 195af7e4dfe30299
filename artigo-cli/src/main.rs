use anyhow::{Context, Result};
use artigo_core::config::Config;
use artigo_core::pipeline::{Pipeline, PipelineError};
use artigo_core::provider::OllamaProvider;
use artigo_core::rag::{Embedder, Ingestor, QdrantStore, VectorStore};
use artigo_core::server::{self, RetrievalHandler};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "artigo")]
#[command(about = "Classify and review scientific articles against a local reference index", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "artigo.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze one article (URL, file path or raw text)")]
    Run {
        #[arg(help = "Article source: URL, path to a PDF/text file, or raw text")]
        source: String,

        #[arg(short, long, default_value = "output")]
        name: String,
    },

    #[command(about = "Rebuild the article index from the data directory")]
    Ingest {
        #[arg(long, help = "Override the configured data directory")]
        data_dir: Option<String>,
    },

    #[command(about = "Run the retrieval service on stdin/stdout")]
    Serve,

    #[command(about = "Show current configuration")]
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout is the protocol channel under `serve`; all logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Run { source, name } => run(config, &source, &name).await,
        Commands::Ingest { data_dir } => ingest(config, data_dir).await,
        Commands::Serve => serve(config).await,
        Commands::Config => show_config(&config),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

async fn run(config: Config, source: &str, name: &str) -> Result<()> {
    let provider = Arc::new(OllamaProvider::new(&config.llm.base_url));
    let output_dir = PathBuf::from(&config.pipeline.output_dir);
    let pipeline = Pipeline::new(provider, config);

    println!("{} Analyzing article...", "→".blue());

    let outcome = match pipeline.run(source).await {
        Ok(outcome) => outcome,
        Err(PipelineError::NoJson { raw }) => {
            eprintln!("{}", "Model output could not be parsed as JSON:".red().bold());
            eprintln!("{raw}");
            anyhow::bail!("run produced no structured result");
        }
        Err(e) => return Err(e.into()),
    };

    if outcome.repair.is_some() {
        eprintln!(
            "{} model output needed a repair pass to parse",
            "!".yellow().bold()
        );
    }

    let json = serde_json::to_string_pretty(&outcome.record)
        .context("Failed to serialize result")?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let json_path = output_dir.join(format!("{name}.json"));
    std::fs::write(&json_path, &json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let review_path = output_dir.join(format!("review_{name}.md"));
    std::fs::write(&review_path, &outcome.record.review_markdown)
        .with_context(|| format!("Failed to write {}", review_path.display()))?;

    println!("{json}");
    println!();
    println!(
        "{} Result written to {}",
        "✓".green().bold(),
        json_path.display().to_string().cyan()
    );
    println!(
        "{} Review written to {}",
        "✓".green().bold(),
        review_path.display().to_string().cyan()
    );

    Ok(())
}

async fn ingest(config: Config, data_dir: Option<String>) -> Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.ingest.data_dir.clone());

    let provider = Arc::new(OllamaProvider::new(&config.llm.base_url));
    let embedder = Embedder::new(provider, &config.embedding.model);
    let store: Arc<dyn VectorStore> =
        Arc::new(QdrantStore::connect(&config.storage, config.embedding.dimension)?);

    let ingestor = Ingestor::new(
        embedder,
        store,
        config.ingest.chunk_size,
        config.ingest.chunk_overlap,
    );

    println!("{} Rebuilding index from {}...", "→".blue(), data_dir.cyan());

    let report = ingestor.rebuild(Path::new(&data_dir)).await?;

    println!(
        "{} Indexed {} files ({} chunks), skipped {}",
        "✓".green().bold(),
        report.files_indexed.to_string().bold(),
        report.chunks_written,
        report.files_skipped,
    );

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let provider = Arc::new(OllamaProvider::new(&config.llm.base_url));
    let embedder = Embedder::new(provider, &config.embedding.model);
    let store: Arc<dyn VectorStore> =
        Arc::new(QdrantStore::connect(&config.storage, config.embedding.dimension)?);

    let handler = RetrievalHandler::new(store, embedder, config.storage.top_k);
    server::serve_stdio(handler).await
}

fn show_config(config: &Config) -> Result<()> {
    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "LLM:".bold());
    println!("  Model:       {}", config.llm.model.cyan());
    println!("  Base URL:    {}", config.llm.base_url);
    println!("  Temperature: {}", config.llm.temperature);
    println!();
    println!("{}", "Embedding:".bold());
    println!("  Model:     {}", config.embedding.model.cyan());
    println!("  Dimension: {}", config.embedding.dimension);
    println!();
    println!("{}", "Storage:".bold());
    println!("  Qdrant URL: {}", config.storage.url);
    println!("  Collection: {}", config.storage.collection_name.cyan());
    println!("  Top K:      {}", config.storage.top_k);
    println!();
    println!("{}", "Ingest:".bold());
    println!("  Data Dir:      {}", config.ingest.data_dir);
    println!("  Chunk Size:    {}", config.ingest.chunk_size);
    println!("  Chunk Overlap: {}", config.ingest.chunk_overlap);
    println!();
    println!("{}", "Pipeline:".bold());
    println!("  Max Iterations: {}", config.pipeline.max_iterations);
    println!("  Max Tool Calls: {}", config.pipeline.max_tool_calls);
    println!("  Output Dir:     {}", config.pipeline.output_dir);

    Ok(())
}
