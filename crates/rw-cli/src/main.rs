//! CLI frontend for the Rollweaver dice engine.

mod commands;

use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rollweaver",
    about = "Rollweaver — dice notation parsing, rolling, and reconciliation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a dice expression and show its terms and constants
    Parse {
        /// Dice expression, e.g. "2d20kh1+1d4-3"
        expression: String,
    },

    /// Classify whether a roll needs local correction
    Classify {
        /// Dice expression, e.g. "2d20kh1+3"
        expression: String,
    },

    /// Roll an expression against the built-in roller
    Roll {
        /// Dice expression, e.g. "2d6ro<3+4"
        expression: String,

        /// RNG seed for deterministic rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Action label shown with the roll
        #[arg(short, long)]
        action: Option<String>,

        /// Roll type: "to hit", damage, save, check, heal, reroll
        #[arg(short = 't', long)]
        roll_type: Option<String>,

        /// Audience: self, everyone, dm
        #[arg(long)]
        send_to: Option<String>,

        /// Print the rewritten fulfilled event as wire JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a slash command end to end, e.g. "/hit 1d20+str Rapier"
    Command {
        /// The slash command line
        line: String,

        /// RNG seed for deterministic rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print the rewritten fulfilled event as wire JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { expression } => commands::parse::run(&expression),
        Commands::Classify { expression } => commands::classify::run(&expression),
        Commands::Roll {
            expression,
            seed,
            action,
            roll_type,
            send_to,
            json,
        } => commands::roll::run(
            &expression,
            seed,
            action.as_deref(),
            roll_type.as_deref(),
            send_to.as_deref(),
            json,
        ),
        Commands::Command { line, seed, json } => commands::command::run(&line, seed, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
