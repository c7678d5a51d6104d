//! instructai-core — assessment data model, service trait, and flow controllers.
//!
//! This crate defines the quiz and coding data model, the
//! [`AssessmentService`](traits::AssessmentService) boundary to the remote
//! generation/grading service, and the state machines that walk a learner
//! through a generated question set.

pub mod coding;
pub mod error;
pub mod flow;
pub mod model;
pub mod session;
pub mod traits;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use coding::{CodingFlow, CodingSession};
pub use error::{FlowError, ServiceError, ValidationError};
pub use flow::{AssessmentFlow, QuizSession};
pub use session::{FlowState, Session};
