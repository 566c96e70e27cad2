use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The CSV parser reported one or more row errors
    #[error("{0}")]
    Parse(String),

    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Only `.csv` files are accepted for upload
    #[error("Unsupported file '{path}': only .csv files are accepted")]
    UnsupportedFile { path: String },

    /// A cell could not be converted to the requested type
    #[error("Cannot convert value '{value}' of column '{column}' to {target}")]
    FieldConversion {
        column: String,
        value: String,
        target: String,
    },

    /// The parse was cancelled before completion
    #[error("Parse cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
