//! cogdiag CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cogdiag", version, about = "Concept mastery and item difficulty trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train mastery/difficulty parameters and emit report artifacts
    Train {
        /// Response table CSV (student_id,item_id,correct)
        #[arg(long)]
        responses: PathBuf,

        /// Q-matrix CSV (item_id plus one column per concept)
        #[arg(long)]
        q_matrix: PathBuf,

        /// Output directory for report artifacts
        #[arg(long, default_value = "./reports")]
        output: PathBuf,

        /// Number of training epochs
        #[arg(long, default_value = "10")]
        epochs: usize,

        /// Learning rate
        #[arg(long, default_value = "0.2")]
        learning_rate: f64,

        /// Seed for the initial mastery draw (omit for OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Clamp mastery values into [0, 1] after each update
        #[arg(long)]
        clamp_mastery: bool,

        /// Also save the full training report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Check input tables and report problems without training
    Validate {
        /// Response table CSV
        #[arg(long)]
        responses: PathBuf,

        /// Q-matrix CSV
        #[arg(long)]
        q_matrix: PathBuf,
    },

    /// Convert a response CSV into a JSON record array
    Convert {
        /// Response table CSV
        #[arg(long)]
        input: PathBuf,

        /// Output directory for responses.json
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cogdiag=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            responses,
            q_matrix,
            output,
            epochs,
            learning_rate,
            seed,
            clamp_mastery,
            json,
        } => commands::train::execute(
            responses,
            q_matrix,
            output,
            epochs,
            learning_rate,
            seed,
            clamp_mastery,
            json,
        ),
        Commands::Validate {
            responses,
            q_matrix,
        } => commands::validate::execute(responses, q_matrix),
        Commands::Convert { input, output } => commands::convert::execute(input, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
