//! Mutate command - Print the mutants of a body for one payload

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info};

use bodyfuzz::{Mutant, MutationConfig, MutationSession, MutationStrategy, Path};

use crate::cli::{read_input, OutputFormat};

/// Arguments for the mutate command
pub struct MutateArgs {
    /// Body to mutate
    pub file: PathBuf,
    /// Payload to inject
    pub payload: String,
    /// Format variants overriding the configured ones
    pub format_variants: Vec<String>,
    /// Disable value mutation
    pub no_values: bool,
    /// Enable extra-parameter injection
    pub extra: bool,
    /// Enable parameter-name fuzzing
    pub names: bool,
    /// Exact paths to protect
    pub immutable: Vec<String>,
    /// Field names to protect at any depth
    pub immutable_names: Vec<String>,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Maximum number of mutants to print
    pub limit: Option<usize>,
    /// Output format
    pub format: OutputFormat,
    /// Suppress the summary line
    pub quiet: bool,
}

impl MutateArgs {
    /// Resolve the effective configuration: file first, then flags
    pub fn resolve_config(&self) -> Result<MutationConfig> {
        let mut config = match &self.config {
            Some(path) => MutationConfig::load_from_file(Some(path.as_path()))
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MutationConfig::load_or_default(None),
        };

        let mut options = config.options;
        if !self.format_variants.is_empty() {
            options = options.with_formats(self.format_variants.iter().map(String::as_str));
        }
        if self.no_values {
            options = options.with_value_mutation(false);
        }
        if self.extra {
            options = options.with_extra_parameter(true);
        }
        if self.names {
            options = options.with_name_fuzzing(true);
        }
        config.options = options;

        let paths = self
            .immutable
            .iter()
            .map(|raw| {
                raw.parse::<Path>().map_err(|reason| {
                    anyhow::anyhow!("Invalid --immutable path '{}': {}", raw, reason)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        config.immutable.extend_paths(paths);
        config.immutable.extend_names(self.immutable_names.iter().cloned());

        Ok(config)
    }
}

/// Run the mutate command with the given arguments
pub fn run(args: MutateArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let input = read_input(&args.file)?;

    debug!(
        "Formats: {:?}, Strategies: {:?}, Limit: {:?}",
        config.options.formats,
        config.options.enabled_strategies(),
        args.limit
    );
    info!(
        "Mutating {} ({} leaves) with payload {:?}",
        args.file.display(),
        input.leaf_count(),
        args.payload
    );

    let session =
        MutationSession::new(config.options.clone()).with_immutability_filter(&config.immutable);
    let mut mutants = session.generate(&input, &args.payload);
    let limit = args.limit.unwrap_or(usize::MAX);

    let mut printed = 0;
    while printed < limit {
        let Some(mutant) = mutants.next() else {
            break;
        };
        let mutant = mutant.context("Mutation run aborted")?;
        printed += 1;

        match args.format {
            OutputFormat::Text => print_text(printed, &mutant),
            OutputFormat::Json => println!("{}", serde_json::to_string(&mutant)?),
        }
    }

    if args.format == OutputFormat::Text && !args.quiet {
        let stats = mutants.stats();
        println!();
        println!(
            "{} mutants ({} candidates, {} duplicates dropped)",
            printed.to_string().green().bold(),
            stats.candidates,
            stats.duplicates
        );
    }

    Ok(())
}

fn print_text(index: usize, mutant: &Mutant) {
    let label = match mutant.strategy {
        MutationStrategy::Value => mutant.describe().cyan(),
        MutationStrategy::Extra => mutant.describe().yellow(),
        MutationStrategy::Name => mutant.describe().magenta(),
    };
    println!("{} {}", format!("[{}]", index).dimmed(), label);
    println!("    {}", mutant.input.to_json());
}
