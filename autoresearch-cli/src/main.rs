//! AutoResearcher CLI - turn a topic into a short research paper

mod report;

use anyhow::{Context, Result};
use autoresearch_core::config::{HypothesisSource, LLMProvider as LLMProviderType, ResearchConfig};
use autoresearch_core::llm::{LLMProvider as _, LLMProviderFactory};
use autoresearch_core::pipeline::ResearchOrchestrator;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoresearch")]
#[command(about = "Four AI agents working together to write a research paper", long_about = None)]
#[command(version)]
struct Cli {
    /// Research topic (prompted for when omitted)
    #[arg(short, long)]
    topic: Option<String>,

    /// Configuration file (replaces autoresearch.toml)
    #[arg(short, long, env = "AUTORESEARCH_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Directory the paper is written into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// LLM provider (gemini or openai)
    #[arg(long)]
    provider: Option<LLMProviderType>,

    /// Run the hypotheses the Science agent designs instead of the placeholders
    #[arg(long)]
    designed_hypotheses: bool,

    /// Print the full run result as JSON instead of the report
    #[arg(long)]
    json: bool,

    /// Debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Diagnostics go to stderr so `--json` output stays clean
    let default_filter = if cli.verbose {
        "autoresearch=debug,autoresearch_core=debug,warn"
    } else {
        "autoresearch=info,autoresearch_core=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    let topic = match cli.topic.as_deref().map(str::trim) {
        Some(topic) if !topic.is_empty() => topic.to_string(),
        _ => prompt_topic(&config.default_topic)?,
    };
    if !cli.json {
        println!("Starting research on: {}", topic);
    }

    let provider = LLMProviderFactory::create(&config.llm).await?;
    tracing::info!(
        provider = %provider.model_info().provider,
        model = %provider.model_info().model_name,
        "Model connected"
    );

    let orchestrator = ResearchOrchestrator::new(&config, provider)?;
    match orchestrator.run(&topic).await {
        Ok(run) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                print!("{}", report::Report(&run));
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("\nError occurred: {}", err);
            if err.is_generation() {
                eprintln!(
                    "Make sure {} (or llm.api_key) holds a valid API key",
                    config.llm.provider.api_key_env_var()
                );
            }
            Err(err).context(format!("Research on \"{}\" failed", topic))
        }
    }
}

/// Layered config, then command-line overrides, then validation
fn load_config(cli: &Cli) -> Result<ResearchConfig> {
    let mut config = ResearchConfig::layered(cli.config.as_deref())?;

    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if cli.designed_hypotheses {
        config.science.hypothesis_source = HypothesisSource::Designed;
    }

    config.resolve_api_key();
    config.validate()?;
    Ok(config)
}

/// Ask for a topic on stdin, falling back to `default_topic` on an empty answer
fn prompt_topic(default_topic: &str) -> Result<String> {
    let mut stderr = std::io::stderr();
    writeln!(stderr, "What would you like to research today?")?;
    writeln!(stderr, "\nExamples:")?;
    for example in [
        "Artificial Intelligence in Education",
        "Climate Change Solutions",
        "Quantum Computing Applications",
        "Space Exploration Technologies",
    ] {
        writeln!(stderr, "  - {}", example)?;
    }
    write!(stderr, "\nEnter your research topic: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(report::choose_topic(&line, default_topic))
}
