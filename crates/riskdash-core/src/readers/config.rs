#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub delimiter: u8,
    pub trim_values: bool,
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_values: false,
            max_rows: None,
        }
    }
}

impl ParserConfig {
    /// Whether `rows_read` data rows already reach the configured cap
    pub fn row_limit_reached(&self, rows_read: usize) -> bool {
        self.max_rows.is_some_and(|max| rows_read >= max)
    }
}

pub struct ParserConfigBuilder {
    delimiter: u8,
    trim_values: bool,
    max_rows: Option<usize>,
}

impl Default for ParserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserConfigBuilder {
    /// Create a new [`ParserConfigBuilder`]
    pub fn new() -> Self {
        let config = ParserConfig::default();
        Self {
            delimiter: config.delimiter,
            trim_values: config.trim_values,
            max_rows: config.max_rows,
        }
    }

    /// Build a [`ParserConfig`]
    pub fn build(self) -> ParserConfig {
        ParserConfig {
            delimiter: self.delimiter,
            trim_values: self.trim_values,
            max_rows: self.max_rows,
        }
    }

    pub fn with_delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }

    pub fn with_trim_values(self, trim: bool) -> Self {
        Self {
            trim_values: trim,
            ..self
        }
    }

    pub fn with_max_rows(self, max: usize) -> Self {
        Self {
            max_rows: Some(max),
            ..self
        }
    }
}
