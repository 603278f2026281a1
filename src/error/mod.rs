use thiserror::Error;

use crate::data::range::RangeError;
use crate::data::series::SchemaError;
use crate::phase::ConfigError;

/// Fatal errors that abort a trait computation before any donor is processed
#[derive(Error, Debug, Clone)]
pub enum TraitError {
    /// The phase-parameter table is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The input table has no recognizable time column or inconsistent columns
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    /// A range specification could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] RangeError),
    /// Reading or writing a CSV file failed
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for TraitError {
    fn from(e: csv::Error) -> Self {
        TraitError::Csv(e.to_string())
    }
}
