//! Leaves command - List the mutable surface of a body

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::cli::{read_input, OutputFormat};

/// Run the leaves command
pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    let input = read_input(file)?;
    tracing::debug!("Listing {} leaves of {}", input.leaf_count(), file.display());

    match format {
        OutputFormat::Text => {
            for (path, leaf) in input.leaves() {
                println!("{} = {}", path.to_string().cyan(), leaf);
            }
        }
        OutputFormat::Json => {
            for (path, leaf) in input.leaves() {
                println!("{}", json!({"path": path.to_string(), "value": leaf.to_json()}));
            }
        }
    }

    Ok(())
}
