mod config;
pub mod csv_reader;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use csv_reader::{
    parse_async, parse_bytes, parse_file, parse_reader, spawn_parse, CancelToken, FileFormat,
    FileSource, ParseHandle, ERROR_SEPARATOR,
};
