use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Watch target '{path}' is not a directory")]
    NotADirectory { path: String },
    #[error("Command '{command}' does not support {format} output")]
    UnsupportedOutput { command: String, format: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error: config file not found: '{path}'")]
    FileNotFound { path: String },
    #[error("Parser delimiter must be a single ASCII character, got '{value}'")]
    InvalidDelimiter { value: String },
    #[error("Preview limit must be at least 1")]
    InvalidPreviewLimit,
}
