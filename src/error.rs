//! Error types for the graph generator

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the graph generator
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Sampling errors
    #[error("Insufficient population in {stage}: requested {needed} distinct entries, pool has {available}")]
    InsufficientPopulation {
        stage: &'static str,
        needed: usize,
        available: usize,
    },

    // Output table errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Check if this error is a sampling-pool exhaustion
    pub fn is_population_error(&self) -> bool {
        matches!(self, Error::InsufficientPopulation { .. })
    }
}

// Conversion from I/O errors raised while writing output tables
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_error_classification() {
        let err = Error::InsufficientPopulation {
            stage: "smurfing receivers",
            needed: 10,
            available: 4,
        };
        assert!(err.is_population_error());
        assert!(!Error::Config("bad range".into()).is_population_error());
    }

    #[test]
    fn test_population_error_message_names_stage() {
        let err = Error::InsufficientPopulation {
            stage: "aggregators",
            needed: 5,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("aggregators"));
        assert!(msg.contains('5'));
        assert!(msg.contains('2'));
    }
}
