//! CLI module - Command implementations

pub mod commands;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use bodyfuzz::InputSet;

/// Output format for CLI commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Read a JSON body from a file, or from stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<InputSet> {
    let raw = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    InputSet::from_json_slice(&raw)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))
}
