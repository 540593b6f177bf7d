//! Error handling for Carteira
//!
//! The valuation engine never fails (it degrades silently); these errors
//! belong to the layers around it: the JSON store, configuration and the CLI.
//! Propagation uses anyhow for context chaining.

use thiserror::Error;

/// Typed failures of the record store and command layer
#[derive(Error, Debug)]
pub enum CarteiraError {
    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: u64 },
}

/// Result type alias for store and CLI operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = CarteiraError::Store("corrupted document".to_string());
        assert_eq!(err.to_string(), "store error: corrupted document");

        let missing = CarteiraError::NotFound {
            kind: "position",
            id: 7,
        };
        assert_eq!(missing.to_string(), "position #7 not found");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(anyhow::Error::new(CarteiraError::Validation(
            "principal is required".to_string(),
        )))
        .context("failed to add position");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to add position"));
        assert!(format!("{:?}", err).contains("principal is required"));
        assert!(err.downcast_ref::<CarteiraError>().is_some());
    }
}
