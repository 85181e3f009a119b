use anyhow::{Context, Result};
use chunkwise::{ChunkParams, EmbeddingConfig, EngineConfig, StrategyKind};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const SAMPLE_TEXT: &str = "Artificial intelligence (AI) is intelligence demonstrated by machines, in contrast to the natural intelligence displayed by humans and animals. Leading AI textbooks define the field as the study of \"intelligent agents\": any device that perceives its environment and takes actions that maximize its chance of successfully achieving its goals.

The term \"artificial intelligence\" was coined in 1956 by John McCarthy at the Dartmouth Conference. Since then, AI has experienced several waves of optimism and pessimism, with periods of rapid advancement followed by \"AI winters\" where funding and interest decreased dramatically.

Modern AI techniques include machine learning, deep learning, natural language processing, computer vision, and robotics. These technologies have found applications in numerous fields including healthcare, finance, transportation, and entertainment.

The future of AI remains both promising and uncertain. While AI systems continue to achieve remarkable breakthroughs in specific domains, the goal of artificial general intelligence (AGI) - AI that matches or exceeds human intelligence across all cognitive tasks - remains elusive.";

/// Run chunking strategies over a document and report what they produce.
#[derive(Parser)]
#[command(name = "chunkwise", version, about)]
struct Cli {
    /// Text file to chunk (default: built-in sample)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single strategy (fixed_length, sliding_window, sentence_based,
    /// paragraph_based, semantic_chunking)
    #[arg(short, long)]
    strategy: Option<StrategyKind>,

    /// Embedding server for semantic chunking (overrides the config)
    #[arg(long)]
    embed_endpoint: Option<String>,

    /// Print chunks as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "100")]
    chunk_size: usize,

    #[arg(long, default_value = "20")]
    overlap: usize,

    #[arg(long, default_value = "2")]
    sentences_per_chunk: usize,

    #[arg(long, default_value = "1")]
    paragraphs_per_chunk: usize,

    #[arg(long, default_value = "0.7")]
    similarity_threshold: f32,

    #[arg(long, default_value = "150")]
    max_chunk_size: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chunkwise=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(endpoint) = &cli.embed_endpoint {
        config.embedding = Some(EmbeddingConfig::new(endpoint.clone()));
    }

    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => SAMPLE_TEXT.to_string(),
    };

    let params = ChunkParams {
        chunk_size: Some(cli.chunk_size),
        overlap: Some(cli.overlap),
        sentences_per_chunk: Some(cli.sentences_per_chunk),
        paragraphs_per_chunk: Some(cli.paragraphs_per_chunk),
        similarity_threshold: Some(cli.similarity_threshold),
        max_chunk_size: Some(cli.max_chunk_size),
        ..ChunkParams::default()
    };

    let setup_start = Instant::now();
    let registry = config.build_registry().context("building chunking engine")?;
    let setup_duration = setup_start.elapsed();

    let kinds: Vec<StrategyKind> = match cli.strategy {
        Some(kind) => vec![kind],
        None => StrategyKind::ALL.to_vec(),
    };

    if cli.json {
        let mut report = serde_json::Map::new();
        for kind in kinds {
            let chunks = registry.chunk(kind, &text, &params);
            report.insert(kind.to_string(), serde_json::to_value(&chunks)?);
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== chunkwise: chunking strategy demo ===\n");
    println!(
        "Text: {} characters, {} tokens ({}) [{:.2}s setup]\n",
        text.chars().count(),
        registry.tokenizer().count_tokens(&text),
        registry.tokenizer().name(),
        setup_duration.as_secs_f64()
    );

    for kind in kinds {
        let Some(strategy) = registry.select(kind) else {
            continue;
        };
        let info = strategy.strategy_info();

        let step_start = Instant::now();
        let chunks = strategy.chunk(&text, &params);
        let step_duration = step_start.elapsed();

        println!("{} ({})", info.name, kind);
        println!("{}", "-".repeat(40));
        println!(
            "Generated {} chunks [{:.3}s]",
            chunks.len(),
            step_duration.as_secs_f64()
        );

        for chunk in chunks.iter().take(3) {
            let preview: String = chunk.content.chars().take(100).collect();
            println!("\n  Chunk {}:", chunk.metadata.chunk_id + 1);
            println!("    Tokens:   {}", chunk.metadata.token_count);
            println!("    Overlap:  {}", chunk.metadata.overlap);
            println!(
                "    Position: {}..{}",
                chunk.metadata.start_pos, chunk.metadata.end_pos
            );
            if let Some(group) = chunk.metadata.semantic_group {
                println!("    Group:    {}", group);
            }
            println!("    Content:  {}...", preview);
        }
        if chunks.len() > 3 {
            println!("\n  ... and {} more chunks", chunks.len() - 3);
        }
        println!();
    }

    Ok(())
}
