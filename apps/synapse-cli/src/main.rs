use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use synapse_core::ActivationKind;

#[derive(Debug, Parser)]
#[command(name = "synapse", version, about = "MNIST network trainer with a cuBLAS availability probe")]
struct Cli {
    /// Log level when RUST_LOG is unset (error|warn|info|debug|trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether cuBLAS can create a handle on this machine
    Probe {
        /// Print the full diagnostic report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Train a network on MNIST, report test accuracy, optionally save it
    Train(TrainArgs),

    /// Evaluate a saved network on the MNIST test set
    Evaluate {
        /// Saved network (defaults to ~/.local/share/Synapse/models/network.json)
        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Draw a test image as text, with its label and the model's guess
    Show {
        #[arg(long)]
        index: usize,

        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct TrainArgs {
    /// Directory with the four MNIST idx files (defaults to SYNAPSE_DATA_DIR or ~/.local/share/Synapse/datasets/mnist)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Input width followed by each layer size
    #[arg(long, value_delimiter = ',', default_value = "784,200,10")]
    layers: Vec<usize>,

    #[arg(long, default_value = "relu")]
    activation: ActivationKind,

    #[arg(long, default_value_t = 1)]
    epochs: usize,

    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    #[arg(long, default_value_t = 0.005)]
    learning_rate: f64,

    /// Shuffle the training set before every epoch
    #[arg(long)]
    shuffle: bool,

    /// Seed for weight init and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Use only the first N training images
    #[arg(long)]
    limit: Option<usize>,

    /// Where to save the trained network
    #[arg(long)]
    out: Option<PathBuf>,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Probe { json } => commands::probe::run(json),
        Command::Train(args) => commands::train::run(args).map(|_| ExitCode::SUCCESS),
        Command::Evaluate { model, data_dir } => {
            commands::evaluate::run(model, data_dir).map(|_| ExitCode::SUCCESS)
        }
        Command::Show {
            index,
            model,
            data_dir,
        } => commands::show::run(index, model, data_dir).map(|_| ExitCode::SUCCESS),
    }
}
