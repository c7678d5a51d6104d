//! Error types shared by the flow controllers and service clients.
//!
//! `ServiceError` is defined here rather than in `instructai-client` so the
//! controllers and the CLI can downcast an `anyhow::Error` coming out of an
//! [`AssessmentService`](crate::traits::AssessmentService) call and classify
//! it without string matching.

use thiserror::Error;

use crate::session::FlowState;

/// Failures talking to the generation/grading service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success HTTP status.
    #[error("service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request did not finish within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The request never reached the service or the connection broke.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered, but the body was not what the contract promises.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// HTTP status code of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input rejected before any service call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question count must be between {min} and {max}, got {got}")]
    QuestionCount { got: i64, min: u8, max: u8 },

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("unsupported programming language: {0}")]
    UnsupportedLanguage(String),

    #[error("unknown difficulty: {0} (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("unknown question type: {0} (expected mcq or subjective)")]
    UnknownQuestionType(String),

    #[error("'{input}' is not one of the {count} options")]
    UnknownOption { input: String, count: usize },
}

/// Errors returned by the flow controllers.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service call failed; the controller state was left as it was.
    #[error("service call failed: {0:#}")]
    Service(anyhow::Error),

    /// A generate or submit call is still outstanding on this controller.
    #[error("another request is already in flight ({0})")]
    Busy(FlowState),

    #[error("no questions have been generated yet")]
    NoSession,

    #[error("already at the last question")]
    AtLastQuestion,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: FlowState,
        action: &'static str,
    },
}

impl FlowError {
    /// The typed service error behind a `Service` failure, if there is one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            FlowError::Service(e) => e.downcast_ref::<ServiceError>(),
            _ => None,
        }
    }

    /// Returns `true` for input problems the caller can fix and retry.
    pub fn is_validation(&self) -> bool {
        matches!(self, FlowError::Validation(_))
    }
}
