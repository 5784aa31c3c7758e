//! CLI for the news sentiment / music timbre pipeline
//!
//! Each subcommand runs one stage; `all` runs them in order.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_timbre::config::{load_config, FailurePolicy, PipelineConfig};
use news_timbre::pipeline::{run_correlate, run_timbre, SentimentPipeline, WordPipeline};
use news_timbre::sentiment::LexiconScorer;

#[derive(Parser)]
#[command(name = "news_timbre")]
#[command(version, about = "Correlate yearly news sentiment with music timbre", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the per-year news partitions
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for derived tables
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// First year to process
    #[arg(long, global = true)]
    start_year: Option<i32>,

    /// Last year to process (inclusive)
    #[arg(long, global = true)]
    end_year: Option<i32>,

    /// Worker threads for per-year stages
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Skip failing years instead of aborting
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score news per year
    Sentiment,
    /// Average timbre features per year and decade
    Timbre,
    /// Correlate the yearly sentiment and timbre tables
    Correlate,
    /// Count words per year
    Words,
    /// Run every stage in order
    All,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.partition_store.dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(start) = self.start_year {
            config.year_range.start = start;
        }
        if let Some(end) = self.end_year {
            config.year_range.end = end;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if self.lenient {
            config.failure_policy = FailurePolicy::Lenient;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("news_timbre=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;

    match cli.command {
        Commands::Sentiment => sentiment(&config)?,
        Commands::Timbre => timbre(&config)?,
        Commands::Correlate => correlation(&config)?,
        Commands::Words => words(&config)?,
        Commands::All => {
            sentiment(&config)?;
            timbre(&config)?;
            correlation(&config)?;
            words(&config)?;
        }
    }

    Ok(())
}

fn sentiment(config: &PipelineConfig) -> Result<()> {
    let run = SentimentPipeline::from_config(config, LexiconScorer::new())
        .run_and_write(&config.output)
        .context("sentiment stage failed")?;

    println!(
        "Scored {} years ({} skipped) -> {}",
        run.table.len(),
        run.failed.len(),
        config.output.path(&config.output.sentiment_by_year).display()
    );
    for failure in &run.failed {
        println!("  skipped {}: {}", failure.year, failure.error);
    }
    Ok(())
}

fn timbre(config: &PipelineConfig) -> Result<()> {
    let run = run_timbre(config).context("timbre stage failed")?;

    println!(
        "Averaged timbre over {} years and {} decades",
        run.by_year.len(),
        run.by_decade.len()
    );
    Ok(())
}

fn correlation(config: &PipelineConfig) -> Result<()> {
    let run = run_correlate(config).context("correlation stage failed")?;

    println!("Correlated {} joined years\n", run.joined.len());
    print!("{:<10}", "");
    for feature in &run.matrix.features {
        print!(" {:>8}", feature.trim_start_matches("TimbreAvg"));
    }
    println!();
    for (category, row) in run.matrix.categories.iter().zip(run.matrix.values.rows()) {
        print!("{:<10}", category);
        for value in row {
            print!(" {:>8.2}", value);
        }
        println!();
    }
    Ok(())
}

fn words(config: &PipelineConfig) -> Result<()> {
    let run = WordPipeline::from_config(config)
        .run_and_write(&config.output)
        .context("word count stage failed")?;

    println!(
        "Counted words for {} years ({} skipped)",
        run.years.len(),
        run.failed.len()
    );
    Ok(())
}
