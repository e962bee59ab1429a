use crate::result::LeakReport;
use thiserror::Error;

/// Failure reported by a model collaborator (the mapping layer).
///
/// `StatementInvalid` is the only signal the leak finder interprets: it means
/// the model is mapped but no real table backs it.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Statement invalid: {0}")]
    StatementInvalid(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    pub(crate) fn into_source(self) -> anyhow::Error {
        match self {
            ModelError::Other(source) => source,
            invalid => anyhow::Error::new(invalid),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlumberError {
    #[error("{model} does not have a valid table definition")]
    InvalidModel { model: String },

    #[error("Model '{model}' failed: {source}")]
    Collaborator {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    /// `destroy_all` failed; `leaks` holds every leak found so far,
    /// including `model` with its pre-cleanup count.
    #[error("Cleanup of '{model}' failed: {source}")]
    Cleanup {
        model: String,
        leaks: LeakReport,
        #[source]
        source: anyhow::Error,
    },

    #[error("Report error: {0}")]
    Report(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, PlumberError>;

impl PlumberError {
    /// Classifies a collaborator failure for `model`.
    pub(crate) fn from_model(model: &str, err: ModelError) -> Self {
        match err {
            ModelError::StatementInvalid(_) => Self::InvalidModel {
                model: model.to_string(),
            },
            ModelError::Other(source) => Self::Collaborator {
                model: model.to_string(),
                source,
            },
        }
    }

    pub fn is_invalid_model(&self) -> bool {
        matches!(self, Self::InvalidModel { .. })
    }

    /// Leaks detected before a failed cleanup aborted the scan
    pub fn partial_leaks(&self) -> Option<&LeakReport> {
        match self {
            Self::Cleanup { leaks, .. } => Some(leaks),
            _ => None,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PlumberError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for PlumberError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_invalid_becomes_invalid_model() {
        let err = PlumberError::from_model("Orphan", ModelError::StatementInvalid("no such table".into()));
        assert!(err.is_invalid_model());
        assert_eq!(err.to_string(), "Orphan does not have a valid table definition");
    }

    #[test]
    fn test_other_failure_keeps_source() {
        let err = PlumberError::from_model(
            "User",
            ModelError::Other(anyhow::anyhow!("connection refused")),
        );
        assert!(!err.is_invalid_model());
        match err {
            PlumberError::Collaborator { model, source } => {
                assert_eq!(model, "User");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_partial_leaks_only_on_cleanup() {
        let leaks: LeakReport = [("Stuck", 3)].into_iter().collect();
        let err = PlumberError::Cleanup {
            model: "Stuck".into(),
            leaks: leaks.clone(),
            source: ModelError::StatementInvalid("gone".into()).into_source(),
        };
        assert_eq!(err.partial_leaks(), Some(&leaks));
        assert_eq!(err.to_string(), "Cleanup of 'Stuck' failed: Statement invalid: gone");

        let err = PlumberError::InvalidModel { model: "Stuck".into() };
        assert_eq!(err.partial_leaks(), None);
    }
}
