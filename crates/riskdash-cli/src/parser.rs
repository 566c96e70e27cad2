use std::path::Path;

use anyhow::{Context, Result};
use riskdash_core::analytics::DEFAULT_TIMELINE_DAYS;
use riskdash_core::{ParserConfig, ParserConfigBuilder, StatsColumns, DEFAULT_PREVIEW_LIMIT};
use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
    pub preview: PreviewSection,
    pub columns: StatsColumns,
    pub mock: MockSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    pub delimiter: String,
    pub trim_values: bool,
    pub max_rows: Option<usize>,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            trim_values: false,
            max_rows: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewSection {
    pub limit: usize,
}

impl Default for PreviewSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MockSection {
    pub timeline_days: usize,
}

impl Default for MockSection {
    fn default() -> Self {
        Self {
            timeline_days: DEFAULT_TIMELINE_DAYS,
        }
    }
}

impl Config {
    pub fn parser_config(&self) -> Result<ParserConfig, ConfigError> {
        let delimiter = match self.parser.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => {
                return Err(ConfigError::InvalidDelimiter {
                    value: self.parser.delimiter.clone(),
                });
            }
        };
        let mut builder = ParserConfigBuilder::new()
            .with_delimiter(delimiter)
            .with_trim_values(self.parser.trim_values);
        if let Some(max) = self.parser.max_rows {
            builder = builder.with_max_rows(max);
        }
        Ok(builder.build())
    }

    pub fn preview_limit(&self) -> Result<usize, ConfigError> {
        if self.preview.limit == 0 {
            return Err(ConfigError::InvalidPreviewLimit);
        }
        Ok(self.preview.limit)
    }
}

/// Load the TOML config, or defaults when no path is given
pub fn parse_config(path: Option<&str>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let config_path = Path::new(path);
    if !config_path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_string(),
        }
        .into());
    }
    let config_str = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    Ok(config)
}
