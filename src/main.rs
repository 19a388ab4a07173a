use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use kwrank::api::{create_router, DEFAULT_LANGUAGE};
use kwrank::enrich::{collect_corpus, listing_ids, CatalogSource};
use kwrank::{Corpus, Document, KeywordEngine, PipelineConfig, StopWords, VideoListing};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Rank video keywords by relevance to a seed term",
    long_about = None
)]
struct Args {
    /// JSON config file (PipelineConfig)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Stopword list, one word per line; replaces the built-in list
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank keyword candidates against a seed keyword
    Rank {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, default_value = "")]
        seed: String,

        #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
    },
    /// Rank tags by the average reach of their videos
    Reach {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Video listing JSON (`{"items": [...]}`), optionally gzip-compressed
    #[arg(short, long)]
    input: PathBuf,

    /// Number of keywords to print
    #[arg(short, long)]
    top: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path),
        None => Ok(PipelineConfig::default()),
    }
}

// Load documents, dropping malformed records
async fn load_documents(path: &Path, engine: &KeywordEngine) -> Result<Vec<Document>> {
    let start = Instant::now();
    let listing = VideoListing::from_file(path)?;
    let ids = listing_ids(&listing);
    let source = Arc::new(CatalogSource::new(listing));
    let documents = collect_corpus(source, &ids, engine.config().fetch_timeout()).await;
    tracing::info!(
        "Loaded {} of {} documents in {:?}",
        documents.len(),
        ids.len(),
        start.elapsed()
    );
    Ok(documents)
}

fn build_engine(config: PipelineConfig, stopwords: Option<&Path>) -> Result<KeywordEngine> {
    let engine = KeywordEngine::new(config);
    match stopwords {
        Some(path) => {
            let stopwords = StopWords::from_file(path)?;
            tracing::info!("Loaded {} stopwords from {}", stopwords.len(), path.display());
            Ok(engine.with_stopwords(stopwords))
        }
        None => Ok(engine),
    }
}

async fn run_rank(
    engine: &KeywordEngine,
    input: &InputArgs,
    seed: String,
    lang: String,
) -> Result<()> {
    let documents = load_documents(&input.input, engine).await?;
    let corpus = Corpus::new(documents, seed, lang);

    let start = Instant::now();
    let top_n = input.top.unwrap_or(engine.config().top_n);
    let keywords = engine.rank_top(&corpus, top_n);
    tracing::info!("Ranked {} keywords in {:?}", keywords.len(), start.elapsed());

    if input.json {
        println!("{}", serde_json::to_string_pretty(&keywords)?);
        return Ok(());
    }

    if keywords.is_empty() {
        println!("No keywords found for \"{}\", try an alternative keyword.", corpus.seed);
        return Ok(());
    }
    println!("Top keywords for \"{}\" ({}):", corpus.seed, corpus.language);
    println!();
    for (rank, keyword) in keywords.iter().enumerate() {
        println!(
            "{:>3}. {:<24} score {:>9.3}  freq {:>4}  relevance {:.2}",
            rank + 1,
            keyword.text,
            keyword.score,
            keyword.frequency,
            keyword.relevance
        );
    }
    Ok(())
}

async fn run_reach(engine: &KeywordEngine, input: &InputArgs) -> Result<()> {
    let documents = load_documents(&input.input, engine).await?;
    let top_n = input.top.unwrap_or(engine.config().reach_top_n);
    let tags = engine.rank_by_reach_top(&documents, top_n);

    if input.json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    for (rank, tag) in tags.iter().enumerate() {
        println!(
            "{:>3}. {:<24} avg reach {:>12.1}  videos {:>3}",
            rank + 1,
            tag.keyword,
            tag.avg_reach,
            tag.frequency
        );
    }
    Ok(())
}

async fn serve(engine: KeywordEngine, addr: &str) -> Result<()> {
    let router = create_router(Arc::new(engine))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let engine = build_engine(config, args.stopwords.as_deref())?;

    match args.command {
        Command::Rank { input, seed, lang } => run_rank(&engine, &input, seed, lang).await,
        Command::Reach { input } => run_reach(&engine, &input).await,
        Command::Serve { addr } => serve(engine, &addr).await,
    }
}
