use thiserror::Error;

/// Errors raised while loading snapshots or fitting projections.
///
/// Query and aggregation code never returns these; bad rows are skipped
/// and empty selections come back as empty sequences.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("trend projection failed: {0}")]
    Trend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
