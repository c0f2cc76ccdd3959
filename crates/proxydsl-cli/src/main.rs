//! proxydsl CLI - Kotlin DSL generator for proxy configuration classes
//!
//! Commands:
//! - `proxydsl generate` - Generate one builder per configuration element
//! - `proxydsl check` - Validate a manifest and derive every builder without writing

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod generate;
mod logging;

#[derive(Parser)]
#[command(name = "proxydsl")]
#[command(author, version, about = "Kotlin DSL generator for proxy configuration classes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Kotlin builders from a schema manifest
    Generate {
        /// Path to the schema manifest (.toml or .json)
        #[arg(short, long, default_value = "proxydsl.toml")]
        manifest: PathBuf,

        /// Output directory, overriding [generator].output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Kotlin package, overriding [generator].package
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Validate a manifest and derive every builder without writing
    Check {
        /// Path to the schema manifest (.toml or .json)
        #[arg(short, long, default_value = "proxydsl.toml")]
        manifest: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate {
            manifest,
            output,
            package,
        } => {
            generate::run(&manifest, output, package)?;
        }
        Commands::Check { manifest } => {
            check::run(&manifest)?;
        }
    }

    Ok(())
}
