//! bodyfuzz - Structured-input mutation engine for web security scanners
//!
//! Command-line front end: inspects the leaves of a JSON body and prints the
//! mutants a session generates for a payload.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::commands;
use cli::commands::mutate::MutateArgs;
use cli::OutputFormat;

/// bodyfuzz - Mutate structured request bodies
#[derive(Parser)]
#[command(
    name = "bodyfuzz",
    version,
    about = "Structured-input mutation engine for web security scanners",
    long_about = "bodyfuzz generates attack variants of JSON request bodies.\n\n\
                  Strategies:\n\
                  • Value mutation of every mutable leaf\n\
                  • Extra-parameter injection\n\
                  • Parameter-name fuzzing"
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every leaf path and value of a JSON body
    Leaves {
        /// JSON file to read ("-" for stdin)
        file: PathBuf,
    },

    /// Generate mutants of a JSON body for one payload
    Mutate {
        /// JSON file to read ("-" for stdin)
        file: PathBuf,

        /// Payload to inject
        #[arg(short, long)]
        payload: String,

        /// Format variant to apply (repeatable, replaces configured formats)
        #[arg(long = "format-variant", value_name = "VARIANT")]
        format_variants: Vec<String>,

        /// Disable value mutation
        #[arg(long)]
        no_values: bool,

        /// Enable extra-parameter injection
        #[arg(long)]
        extra: bool,

        /// Enable parameter-name fuzzing
        #[arg(long)]
        names: bool,

        /// Path that must not be mutated, e.g. user.csrf (repeatable)
        #[arg(long, value_name = "PATH")]
        immutable: Vec<String>,

        /// Field name that must not be mutated at any depth (repeatable)
        #[arg(long, value_name = "NAME")]
        immutable_name: Vec<String>,

        /// Path to bodyfuzz config file (auto-detected if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many mutants
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbosity {
            0 => EnvFilter::new("bodyfuzz=info"),
            1 => EnvFilter::new("bodyfuzz=debug"),
            2 => EnvFilter::new("bodyfuzz=trace"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Leaves { file } => {
            commands::leaves::run(&file, cli.format)?;
        }
        Commands::Mutate {
            file,
            payload,
            format_variants,
            no_values,
            extra,
            names,
            immutable,
            immutable_name,
            config,
            limit,
        } => {
            commands::mutate::run(MutateArgs {
                file,
                payload,
                format_variants,
                no_values,
                extra,
                names,
                immutable,
                immutable_names: immutable_name,
                config,
                limit,
                format: cli.format,
                quiet: cli.quiet,
            })?;
        }
    }

    Ok(())
}
