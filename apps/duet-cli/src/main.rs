//! CLI entry point: a `vocab` pass that derives a vocabulary from raw
//! input and a `run` pass that loads a corpus against that vocabulary and
//! fits the model.

mod config;
mod reporter;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use config::RunConfig;
use duet_core::hyper::Hyperparameters;
use duet_core::model::MAX_TOPICS;
use duet_io::{load_corpus, Vocabulary};
use duet_worker::Coordinator;
use reporter::TopWordReporter;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Collapsed Gibbs sampling for book themes and character roles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a vocabulary from the raw input and write `selectedvocab.txt`.
    Vocab {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value_t = config::DEFAULT_NUM_WORDS)]
        numwords: usize,

        #[arg(long)]
        maxlines: Option<usize>,

        #[arg(long, default_value = "selectedvocab.txt")]
        output: PathBuf,
    },
    /// Load a corpus against a prebuilt vocabulary and fit the model.
    Run(RunConfig),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Vocab {
            input,
            numwords,
            maxlines,
            output,
        } => run_vocab(&input, numwords, maxlines, &output),
        Commands::Run(config) => run_fit(config),
    }
}

fn run_vocab(input: &PathBuf, numwords: usize, maxlines: Option<usize>, output: &PathBuf) -> Result<()> {
    let vocab = Vocabulary::build(input, numwords, maxlines)
        .with_context(|| format!("building vocabulary from {}", input.display()))?;
    vocab
        .write_to(output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{}",
        format!("wrote {} words to {}", vocab.len(), output.display()).green()
    );
    Ok(())
}

fn run_fit(config: RunConfig) -> Result<()> {
    let config = config.with_file_overrides()?;

    if config.num_topics() > MAX_TOPICS {
        bail!(
            "numthemes + numroles = {} must not exceed {} to fit the 16-bit assignment array",
            config.num_topics(),
            MAX_TOPICS
        );
    }

    let vocab = Vocabulary::load(&config.vocab)
        .with_context(|| format!("loading vocabulary from {}", config.vocab.display()))?;

    let (books, tw) = load_corpus(
        &config.input,
        &vocab,
        config.numthemes,
        config.numroles,
        config.maxlines,
        config.seed,
    )
    .with_context(|| format!("loading corpus from {}", config.input.display()))?;

    println!(
        "{}",
        format!(
            "loaded {} books, vocabulary of {} words, {} topics",
            books.len(),
            vocab.len(),
            config.num_topics()
        )
        .green()
    );

    let hyper = Hyperparameters::new(config.num_topics(), config.alphamean, config.beta);
    let mut coordinator = Coordinator::new(books, tw, hyper, config.numthemes, config.numprocesses);
    let mut reporter = TopWordReporter::new(&vocab, config.numthemes, 12);

    coordinator
        .run(config.numiterations, &mut reporter)
        .context("fitting the model")?;

    Ok(())
}
