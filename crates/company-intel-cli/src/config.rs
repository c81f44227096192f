use serde::Deserialize;
use std::fs;

use crate::OutputFormat;

const DEFAULT_LOG_LEVEL: &str = "warn";
const VERBOSE_LOG_LEVEL: &str = "debug";

/// Defaults read from `--config <file.yaml>`. Command-line flags win.
///
/// ```yaml
/// input: data/companies.csv
/// output: table
/// log_level: info
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub input: Option<String>,
    pub output: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl CliConfig {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;
        Self::parse(&contents).map_err(|e| format!("Invalid config '{}': {}", path, e).into())
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// `--input` if given, else the configured input.
    pub fn input_path(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.input.clone())
    }

    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.output).unwrap_or(OutputFormat::Json)
    }

    /// `--verbose` forces debug; otherwise the configured level or warn.
    /// `RUST_LOG` still overrides whatever this returns.
    pub fn log_level(&self, verbose: bool) -> String {
        if verbose {
            return VERBOSE_LOG_LEVEL.to_string();
        }
        self.log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}
