//! Mutation Configuration - Options and file-based settings
//!
//! `MutationOptions` controls one generation run. `MutationConfig` adds the
//! immutable field policy and can be loaded from a TOML file:
//!
//! ```toml
//! [mutation]
//! formats = ["straight", "append"]
//! enable_extra_parameter = true
//! immutable_paths = ["user.csrf"]
//! immutable_names = ["csrf_token"]
//! ```

use std::path::{Path as FsPath, PathBuf};

use serde::{Deserialize, Serialize};

use super::filters::ImmutableFields;
use super::mutation::format::FormatId;
use super::mutation::strategy::MutationStrategy;
use super::value::Path;
use crate::errors::ConfigLoadError;

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationOptions {
    /// Format variants, applied in order
    pub formats: Vec<FormatId>,
    /// Substitute payloads into leaf values
    pub enable_value_mutation: bool,
    /// Inject a reserved top-level parameter
    pub enable_extra_parameter: bool,
    /// Use the payload as a parameter name
    pub enable_name_fuzzing: bool,
    /// Reserved name for extra-parameter injection
    pub extra_param_name: String,
    /// Reserved name for the name-fuzzing slot
    pub fuzz_name: String,
    /// Value stored under a fuzzed name
    pub fuzz_name_value: String,
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            formats: vec![FormatId::straight()],
            enable_value_mutation: true,
            enable_extra_parameter: false,
            enable_name_fuzzing: false,
            extra_param_name: "__extra__".to_string(),
            fuzz_name: "__fuzz_name__".to_string(),
            fuzz_name_value: "1".to_string(),
        }
    }
}

impl MutationOptions {
    /// Options with every strategy enabled
    pub fn all_strategies() -> Self {
        Self::default()
            .with_extra_parameter(true)
            .with_name_fuzzing(true)
    }

    /// Set format variants; repeated ids keep their first position
    pub fn with_formats<I, F>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FormatId>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self.dedup_formats();
        self
    }

    pub fn with_value_mutation(mut self, enabled: bool) -> Self {
        self.enable_value_mutation = enabled;
        self
    }

    pub fn with_extra_parameter(mut self, enabled: bool) -> Self {
        self.enable_extra_parameter = enabled;
        self
    }

    pub fn with_name_fuzzing(mut self, enabled: bool) -> Self {
        self.enable_name_fuzzing = enabled;
        self
    }

    pub fn with_extra_param_name(mut self, name: impl Into<String>) -> Self {
        self.extra_param_name = name.into();
        self
    }

    pub fn with_fuzz_name(mut self, name: impl Into<String>) -> Self {
        self.fuzz_name = name.into();
        self
    }

    pub fn with_fuzz_name_value(mut self, value: impl Into<String>) -> Self {
        self.fuzz_name_value = value.into();
        self
    }

    /// Enabled strategies in execution order
    pub fn enabled_strategies(&self) -> Vec<MutationStrategy> {
        MutationStrategy::all()
            .into_iter()
            .filter(|strategy| match strategy {
                MutationStrategy::Value => self.enable_value_mutation,
                MutationStrategy::Extra => self.enable_extra_parameter,
                MutationStrategy::Name => self.enable_name_fuzzing,
            })
            .collect()
    }

    /// Format variants to apply, without repeats
    ///
    /// `formats` is public, so a struct literal can still carry a repeated id.
    pub fn format_variants(&self) -> Vec<&FormatId> {
        let mut seen = std::collections::HashSet::new();
        self.formats
            .iter()
            .filter(|format| seen.insert(*format))
            .collect()
    }

    fn dedup_formats(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.formats.retain(|format| seen.insert(format.clone()));
    }
}

/// Options plus the immutable field policy
#[derive(Debug, Clone, Default)]
pub struct MutationConfig {
    pub options: MutationOptions,
    pub immutable: ImmutableFields,
}

/// `[mutation]` table as written on disk
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mutation: MutationSection,
}

#[derive(Debug, Default, Deserialize)]
struct MutationSection {
    #[serde(flatten)]
    options: MutationOptions,
    #[serde(default)]
    immutable_paths: Vec<String>,
    #[serde(default)]
    immutable_names: Vec<String>,
}

impl MutationConfig {
    /// Load configuration from a TOML file
    ///
    /// Looks for config in:
    /// 1. Specified path (if provided)
    /// 2. .bodyfuzz.toml in current directory
    /// 3. bodyfuzz.toml in current directory
    /// 4. ~/.config/bodyfuzz/config.toml
    pub fn load_from_file(path: Option<&FsPath>) -> Result<Self, ConfigLoadError> {
        let config_paths = if let Some(p) = path {
            vec![p.to_path_buf()]
        } else {
            let mut paths = vec![
                PathBuf::from(".bodyfuzz.toml"),
                PathBuf::from("bodyfuzz.toml"),
            ];

            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("bodyfuzz").join("config.toml"));
            }

            paths
        };

        for config_path in &config_paths {
            if config_path.exists() {
                return Self::load_from_path(config_path);
            }
        }

        Err(ConfigLoadError::NotFound)
    }

    fn load_from_path(path: &FsPath) -> Result<Self, ConfigLoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from TOML content
    pub fn parse_toml(content: &str) -> Result<Self, ConfigLoadError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;
        let section = file.mutation;

        let mut immutable = ImmutableFields::new();
        for raw in &section.immutable_paths {
            let path: Path = raw.parse().map_err(|reason| ConfigLoadError::InvalidPath {
                path: raw.clone(),
                reason,
            })?;
            immutable.extend_paths([path]);
        }
        immutable.extend_names(section.immutable_names);

        let mut options = section.options;
        options.dedup_formats();

        Ok(Self { options, immutable })
    }

    /// Try to load from file, falling back to defaults
    pub fn load_or_default(path: Option<&FsPath>) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::debug!("Loaded mutation config from file");
                config
            }
            Err(ConfigLoadError::NotFound) => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }
}
