//! Typed error hierarchy for the scribe workflow.
//!
//! Four enums cover the subsystems:
//! - `StoreError`: artifact storage failures (`NotFound` is distinguishable)
//! - `StageError`: per-stage failures: missing upstream artifacts,
//!   generation failures, an aborted article review, storage failures
//! - `GenerationError`: generation service faults
//! - `EvaluatorError`: a single persona evaluation failing; always recovered
//!   locally by the aggregator

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;
use crate::store::Artifact;

/// Errors from the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Artifact {artifact} not found at {path}")]
    NotFound { artifact: Artifact, path: PathBuf },

    #[error("Failed to read artifact at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write artifact at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare topic directory {path}: {source}")]
    DirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan topic directory {path}: {message}")]
    ScanFailed { path: PathBuf, message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors from running a single pipeline stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("The {stage} stage needs the {artifact} artifact. Run the {run_first} stage first")]
    MissingDependency {
        stage: Stage,
        artifact: Artifact,
        run_first: Stage,
    },

    #[error("The {stage} stage failed to generate content: {message}")]
    GenerationFailure { stage: Stage, message: String },

    #[error("Review stopped: {message}")]
    ReviewAborted { message: String },

    #[error("Article revision {head} is the last index available; no further revision can be added")]
    RevisionLimit { head: u32 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Faults raised by a generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API key configured. Set SCRIBE_API_KEY (or PERPLEXITY_API_KEY)")]
    MissingApiKey,

    #[error("Generation request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Generation API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Generation API response had no message content")]
    EmptyResponse,
}

/// A single persona evaluation failing.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluator generation failed: {0}")]
    Generation(String),

    #[error("Evaluator response could not be parsed: {0}")]
    Unparsable(String),

    #[error("Evaluator returned score {score}, expected 1-5")]
    ScoreOutOfRange { score: i64 },

    #[error("Evaluator returned unknown reaction '{0}'")]
    UnknownReaction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_artifact_and_prior_stage() {
        let err = StageError::MissingDependency {
            stage: Stage::Plan,
            artifact: Artifact::Research,
            run_first: Stage::Research,
        };
        let message = err.to_string();
        assert!(message.contains("plan stage"));
        assert!(message.contains("research artifact"));
        assert!(message.contains("Run the research stage first"));
    }

    #[test]
    fn store_not_found_is_distinguishable() {
        let err = StoreError::NotFound {
            artifact: Artifact::Plan,
            path: PathBuf::from("/out/topic/02_plan.md"),
        };
        assert!(err.is_not_found());

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::ReadFailed {
            path: PathBuf::from("/out/topic/02_plan.md"),
            source: io_err,
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn stage_error_converts_from_store_error() {
        let inner = StoreError::ScanFailed {
            path: PathBuf::from("/out"),
            message: "bad pattern".into(),
        };
        let err: StageError = inner.into();
        match &err {
            StageError::Storage(StoreError::ScanFailed { message, .. }) => {
                assert_eq!(message, "bad pattern");
            }
            _ => panic!("Expected StageError::Storage(ScanFailed)"),
        }
    }

    #[test]
    fn evaluator_score_out_of_range_carries_score() {
        let err = EvaluatorError::ScoreOutOfRange { score: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&StoreError::ScanFailed {
            path: PathBuf::new(),
            message: String::new(),
        });
        assert_std_error(&StageError::GenerationFailure {
            stage: Stage::Research,
            message: "x".into(),
        });
        assert_std_error(&GenerationError::EmptyResponse);
        assert_std_error(&EvaluatorError::Unparsable("x".into()));
    }
}
