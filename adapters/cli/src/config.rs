use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use snake_puzzle_core::{GrowthRate, MIN_SIDE_LENGTH, MIN_SNAKE_LENGTH};

/// Defaults applied to levels created from the command line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Name given to new levels.
    pub(crate) name: String,
    /// Side length of new maps.
    pub(crate) side_length: u32,
    /// Initial snake length of new levels.
    pub(crate) length: u32,
    /// Growth rate of new levels.
    pub(crate) growth_rate: GrowthRate,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_owned(),
            side_length: MIN_SIDE_LENGTH,
            length: MIN_SNAKE_LENGTH,
            growth_rate: GrowthRate::ALWAYS,
        }
    }
}

impl CliConfig {
    /// Reads the configuration file at `path`, or the defaults when absent.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = CliConfig::load(None).expect("defaults");
        assert_eq!(config.name, "Untitled");
        assert_eq!(config.side_length, 15);
        assert_eq!(config.length, 1);
        assert_eq!(config.growth_rate, GrowthRate::ALWAYS);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config = CliConfig::parse("name = \"Spiral\"\ngrowth_rate = [3, 4]\n")
            .expect("valid config");
        assert_eq!(config.name, "Spiral");
        assert_eq!(config.side_length, 15);
        assert_eq!(
            config.growth_rate,
            GrowthRate::new(3, 4).expect("allowed rate")
        );
    }

    #[test]
    fn rejects_unknown_keys_and_bad_rates() {
        assert!(CliConfig::parse("speed = 3").is_err());
        assert!(CliConfig::parse("growth_rate = [2, 4]").is_err());
    }

    #[test]
    fn unreadable_paths_report_the_path() {
        let error = CliConfig::load(Some(Path::new("/definitely/not/here.toml")))
            .expect_err("missing file");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
