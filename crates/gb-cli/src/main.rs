//! CLI player for Gamebook D20 adventures.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gamebook",
    about = "Gamebook - text adventures with D20 rules",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine detail (combat rounds, traps, treasure) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an adventure interactively
    Play {
        /// Adventure file (JSON)
        #[arg(required_unless_present = "sample", conflicts_with = "sample")]
        file: Option<PathBuf>,

        /// Play a bundled adventure: dark-tower (default) or goblin-cave
        #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "dark-tower")]
        sample: Option<String>,

        /// Character name
        #[arg(short, long, default_value = "Hero")]
        name: String,

        /// Character class: fighter, wizard, rogue, cleric
        #[arg(short, long, default_value = "fighter")]
        class: String,

        /// RNG seed for reproducible games
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Add found gold to the character's purse
        #[arg(long)]
        credit_gold: bool,

        /// Resume from a save file
        #[arg(long, value_name = "SAVE")]
        load: Option<PathBuf>,
    },

    /// Validate an adventure file and report errors and warnings
    Check {
        /// Adventure file (JSON)
        file: PathBuf,
    },

    /// Roll a dice formula such as 2d6+3
    Roll {
        /// Dice formula (NdS, NdS+M, NdS-M)
        formula: String,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// How many times to roll
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            file,
            sample,
            name,
            class,
            seed,
            credit_gold,
            load,
        } => commands::play::run(&commands::play::PlayOptions {
            file,
            sample,
            name,
            class,
            seed,
            credit_gold,
            load,
        }),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Roll {
            formula,
            seed,
            times,
        } => commands::roll::run(&formula, seed, times),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
